use anyhow::Result;

/// A line-oriented pass run over a document before block-level parsing.
///
/// Preprocessors receive the full ordered line sequence and return a new
/// one; the host pipeline keeps parsing the returned lines as if they were
/// the original source.
pub trait Preprocessor: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, lines: Vec<String>) -> Result<Vec<String>>;
}
