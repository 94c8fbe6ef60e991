use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::Preprocessor;
use crate::config::{MermaidConfig, ScriptSource};

const DIV_OPEN: &str = r#"<div class="mermaid">"#;
const DIV_CLOSE: &str = "</div>";
const INIT_SCRIPT: &str = "<script>mermaid.initialize({startOnLoad:true});</script>";

/// Emitted when no script URL is configured: the page loads mermaid on its
/// own, so initialization has to wait until the document (and with it the
/// separately loaded script) is ready.
const DEFERRED_INIT: &str = r#"<script>
function initializeMermaid() {
    mermaid.initialize({startOnLoad:true})
}

if (document.readyState === "complete" || document.readyState === "interactive") {
    setTimeout(initializeMermaid, 1);
} else {
    document.addEventListener("DOMContentLoaded", initializeMermaid);
}
</script>"#;

// Opening fence: exactly three tildes or three backticks, the word
// "mermaid" in any letter case, nothing else but blank whitespace.
static OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ \t]*(?P<fence>~~~|```)[ \t]*mermaid[ \t]*$").expect("mermaid open fence")
});
static CLOSE_TILDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*~~~[ \t]*$").expect("tilde close fence"));
static CLOSE_BACKTICK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*```[ \t]*$").expect("backtick close fence"));

/// Glyph captured from the opening fence; a block only closes on three
/// repetitions of the same glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FenceGlyph {
    Tilde,
    Backtick,
}

impl FenceGlyph {
    fn from_fence(fence: &str) -> Self {
        if fence.starts_with('~') {
            Self::Tilde
        } else {
            Self::Backtick
        }
    }

    fn close_pattern(self) -> &'static Regex {
        match self {
            Self::Tilde => &CLOSE_TILDE,
            Self::Backtick => &CLOSE_BACKTICK,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside(FenceGlyph),
}

/// Rewrite fenced mermaid code blocks into `<div class="mermaid">` wrappers
/// so that the client-side mermaid script can render them, appending the
/// script/initialization markup once at the end when any block was found.
///
/// Lines inside a block are right-trimmed; everything outside passes
/// through untouched. A fence "closed" with the wrong glyph never closes,
/// and the block absorbs the rest of the document (kept for compatibility).
pub fn rewrite_lines(lines: &[String], config: &MermaidConfig) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + 8);
    let mut state = ScanState::Outside;
    let mut previous_line = "";
    let mut found_any = false;

    for line in lines {
        match state {
            ScanState::Outside => {
                if let Some(caps) = OPEN.captures(line) {
                    state = ScanState::Inside(FenceGlyph::from_fence(&caps["fence"]));
                    // Separate the div from preceding text so the host's
                    // block parser treats it as its own HTML block.
                    if !previous_line.trim().is_empty() {
                        out.push(String::new());
                    }
                    out.push(DIV_OPEN.to_string());
                    found_any = true;
                } else {
                    out.push(line.clone());
                }
            }
            ScanState::Inside(glyph) => {
                if glyph.close_pattern().is_match(line) {
                    state = ScanState::Outside;
                    out.push(DIV_CLOSE.to_string());
                    out.push(String::new());
                } else {
                    out.push(line.trim_end().to_string());
                }
            }
        }
        previous_line = line;
    }

    if found_any {
        out.push(String::new());
        match config.script_source() {
            ScriptSource::External(url) => {
                out.push(format!(r#"<script src="{url}"></script>"#));
                out.push(INIT_SCRIPT.to_string());
            }
            ScriptSource::Deferred => {
                out.extend(DEFERRED_INIT.lines().map(str::to_owned));
            }
        }
    }

    out
}

/// String-level convenience over [`rewrite_lines`]; every produced line is
/// newline-terminated, so the result ends with a newline unless the input
/// was empty.
pub fn rewrite_mermaid(input: &str, config: &MermaidConfig) -> String {
    let lines: Vec<String> = input.lines().map(str::to_owned).collect();
    let mut out = String::with_capacity(input.len() + 64);
    for line in rewrite_lines(&lines, config) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub struct MermaidPreprocessor {
    config: MermaidConfig,
}

impl MermaidPreprocessor {
    pub fn new(config: MermaidConfig) -> Self {
        Self { config }
    }
}

impl Preprocessor for MermaidPreprocessor {
    fn name(&self) -> &str {
        "mermaid"
    }

    fn run(&self, lines: Vec<String>) -> Result<Vec<String>> {
        Ok(rewrite_lines(&lines, &self.config))
    }
}
