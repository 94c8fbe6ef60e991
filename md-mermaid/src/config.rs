use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Unversioned distribution bundle, used when the version is "latest" or unset.
pub const DEFAULT_JS_URL: &str = "https://unpkg.com/mermaid/dist/mermaid.min.js";

/// Where the rendered document should fetch the mermaid script from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// Emit a `<script src=...>` include plus a synchronous initialize call.
    External(String),
    /// No script include; the page loads mermaid itself (e.g., a local copy),
    /// so initialization is deferred until the document is ready.
    Deferred,
}

/// Options for the mermaid preprocessor.
///
/// `mermaid_js_url` is tri-state: an empty string (the default) derives the
/// URL from `mermaid_version`, a non-empty string is used verbatim, and an
/// explicit `null` in YAML suppresses the script include entirely and
/// switches to deferred initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MermaidConfig {
    #[serde(default = "default_version")]
    pub mermaid_version: String,
    #[serde(default = "default_js_url")]
    pub mermaid_js_url: Option<String>,
}

fn default_version() -> String {
    "latest".into()
}

fn default_js_url() -> Option<String> {
    Some(String::new())
}

impl Default for MermaidConfig {
    fn default() -> Self {
        Self {
            mermaid_version: default_version(),
            mermaid_js_url: default_js_url(),
        }
    }
}

impl MermaidConfig {
    /// Load configuration from `mermaid.yml` (if present) and environment
    /// variables. Falls back to the compiled-in defaults when parsing fails.
    pub fn load() -> Self {
        Self::load_from(Path::new("mermaid.yml"))
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match std::fs::read_to_string(path)
                .map_err(anyhow::Error::from)
                .and_then(|s| serde_yaml::from_str(&s).map_err(anyhow::Error::from))
            {
                Ok(cfg) => cfg,
                Err(err) => {
                    log::warn!("Failed to load {}: {err}. Using defaults.", path.display());
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        if let Ok(version) = env::var("MERMAID_VERSION") {
            config.mermaid_version = version;
        }
        if let Ok(url) = env::var("MERMAID_JS_URL") {
            // The literal value "none" selects deferred initialization.
            config.mermaid_js_url = if url == "none" { None } else { Some(url) };
        }

        config
    }

    /// Resolve the script source for the trailing initialization markup.
    pub fn script_source(&self) -> ScriptSource {
        match self.mermaid_js_url.as_deref() {
            None => ScriptSource::Deferred,
            Some(url) if !url.is_empty() => ScriptSource::External(url.to_string()),
            Some(_) => {
                if self.mermaid_version.is_empty() || self.mermaid_version == "latest" {
                    ScriptSource::External(DEFAULT_JS_URL.to_string())
                } else {
                    ScriptSource::External(format!(
                        "https://unpkg.com/mermaid@{}/dist/mermaid.min.js",
                        self.mermaid_version
                    ))
                }
            }
        }
    }
}
