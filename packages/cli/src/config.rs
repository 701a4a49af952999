use pagebuilder_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagebuilder.config.json";

/// Page builder project file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Document JSON the commands read and write
    #[serde(default = "default_document")]
    pub document: String,

    /// Catalog JSON (`{categories, products}`) used by `preview`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_document() -> String {
    "document.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn document_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.document)
    }

    pub fn catalog_path(&self, cwd: &Path) -> Option<PathBuf> {
        self.catalog.as_ref().map(|path| cwd.join(path))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            catalog: None,
            editor: EditorConfig::default(),
        }
    }
}
