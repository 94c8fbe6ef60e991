pub mod config;
pub mod plugins;

pub use config::{MermaidConfig, ScriptSource};
pub use plugins::PreprocessorRegistry;
pub use plugins::mermaid::{MermaidPreprocessor, rewrite_lines, rewrite_mermaid};
pub use plugins::traits::Preprocessor;

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use log::debug;

/// Read a document from the path given as the first argument (or stdin when
/// no argument is given), rewrite mermaid fences, and print the result.
pub fn run() -> Result<()> {
    let config = MermaidConfig::load();

    let input = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let lines: Vec<String> = input.lines().map(str::to_owned).collect();
    debug!("preprocessing {} lines", lines.len());

    let registry = PreprocessorRegistry::standard(config);
    let rewritten = registry.run(lines)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in &rewritten {
        writeln!(out, "{line}")?;
    }

    Ok(())
}
