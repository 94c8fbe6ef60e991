pub mod mermaid;
pub mod traits;

use anyhow::Result;

use self::mermaid::MermaidPreprocessor;
use self::traits::Preprocessor;
use crate::config::MermaidConfig;

pub struct PreprocessorRegistry {
    preprocessors: Vec<Box<dyn Preprocessor>>,
}

impl PreprocessorRegistry {
    /// Registry containing the mermaid pass alone.
    pub fn standard(config: MermaidConfig) -> Self {
        Self {
            preprocessors: vec![Box::new(MermaidPreprocessor::new(config))],
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: Box<dyn Preprocessor>) -> Self {
        self.preprocessors.push(preprocessor);
        self
    }

    /// Fold the document lines through every preprocessor in registration order.
    pub fn run(&self, mut lines: Vec<String>) -> Result<Vec<String>> {
        for preprocessor in &self.preprocessors {
            log::debug!("running preprocessor {}", preprocessor.name());
            lines = preprocessor.run(lines)?;
        }
        Ok(lines)
    }
}
