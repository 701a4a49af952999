use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::post_effects::CleanupPolicy;
use pagebuilder_document::Size;
use serde::{Deserialize, Serialize};

/// Editor settings, the `editor` section of `pagebuilder.config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept
    pub history_capacity: usize,

    /// What happens to connections whose element was deleted
    pub connection_cleanup: CleanupPolicy,

    /// Size given to elements dropped from the components panel
    pub default_element_size: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            connection_cleanup: CleanupPolicy::default(),
            default_element_size: Size::default(),
        }
    }
}
