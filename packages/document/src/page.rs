//! Pages: canvas settings, theme, and the element tree.

use crate::model::{Element, Spacing};
use crate::tree::ElementTree;
use pagebuilder_common::{now, IdGenerator, Timestamp};
use serde::{Deserialize, Serialize};

pub type PageId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub elements: ElementTree,
    #[serde(default)]
    pub settings: PageSettings,
    #[serde(default)]
    pub theme: Theme,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Empty page with default canvas settings and theme
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let created = now();
        Self {
            id: IdGenerator::page(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            elements: ElementTree::new(),
            settings: PageSettings::default(),
            theme: Theme::default(),
            created_at: created,
            updated_at: created,
        }
    }
}

/// Ready-made page offered by the template picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTemplate {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl PageTemplate {
    pub fn new(name: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }

    /// Lowercased name with anything outside `[a-z0-9]` turned into `-`
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    #[serde(default)]
    pub padding: Spacing,
    #[serde(default)]
    pub margin: Spacing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Breakpoints>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background_color: "#ffffff".to_string(),
            padding: Spacing::default(),
            margin: Spacing::default(),
            breakpoints: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 768,
            tablet: 1024,
            desktop: 1200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub colors: ThemeColors,
    pub typography: Typography,
    pub spacing: Scale,
    pub border_radius: Scale,
    #[serde(default)]
    pub shadows: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub font_size: FontSizes,
    pub line_height: LineHeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub small: String,
    pub medium: String,
    pub large: String,
    pub xlarge: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineHeights {
    pub tight: f64,
    pub normal: f64,
    pub relaxed: f64,
}

/// small / medium / large CSS lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl Scale {
    fn px(small: u32, medium: u32, large: u32) -> Self {
        Self {
            small: format!("{small}px"),
            medium: format!("{medium}px"),
            large: format!("{large}px"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ThemeColors {
                primary: "#3b82f6".to_string(),
                secondary: "#64748b".to_string(),
                accent: "#f59e0b".to_string(),
                background: "#ffffff".to_string(),
                text: "#1f2937".to_string(),
                success: None,
                warning: None,
                error: None,
                info: None,
            },
            typography: Typography {
                font_family: "Inter, sans-serif".to_string(),
                font_size: FontSizes {
                    small: "14px".to_string(),
                    medium: "16px".to_string(),
                    large: "18px".to_string(),
                    xlarge: "24px".to_string(),
                },
                line_height: LineHeights {
                    tight: 1.2,
                    normal: 1.5,
                    relaxed: 1.8,
                },
            },
            spacing: Scale::px(8, 16, 24),
            border_radius: Scale::px(4, 8, 12),
            shadows: vec![
                "0 1px 2px 0 rgb(0 0 0 / 0.05)".to_string(),
                "0 4px 6px -1px rgb(0 0 0 / 0.1)".to_string(),
                "0 10px 15px -3px rgb(0 0 0 / 0.1)".to_string(),
            ],
        }
    }
}
