//! Starting props and style for elements dropped onto a page.

use crate::model::{ElementType, Props, Spacing, Style};
use serde_json::json;

/// Default props for a freshly created element of `kind`
///
/// Types without specific defaults start with an empty map.
pub fn default_props(kind: &ElementType) -> Props {
    let value = match kind {
        ElementType::Text => json!({
            "content": "Text",
            "fontSize": 16,
            "color": "#1f2937",
            "fontWeight": "normal"
        }),
        ElementType::Heading => json!({
            "content": "Heading",
            "level": 1,
            "fontSize": 24,
            "color": "#1f2937",
            "fontWeight": "bold"
        }),
        ElementType::Image => json!({ "src": "", "alt": "Image", "width": 200, "height": 150 }),
        ElementType::Button => json!({ "text": "Button", "variant": "primary", "size": "medium" }),
        ElementType::Container
        | ElementType::Section
        | ElementType::Row
        | ElementType::Column
        | ElementType::Grid => json!({ "layout": "block", "gap": 0 }),
        ElementType::ProductConfigurator => json!({
            "categoryIds": [],
            "showFilters": true,
            "showGrid": true
        }),
        ElementType::ProductGrid => json!({
            "categoryIds": [],
            "limit": 12,
            "columns": 3,
            "showPrice": true
        }),
        ElementType::PriceCalculator => json!({ "categoryIds": [], "showBreakdown": true }),
        ElementType::Cart => json!({ "showItems": true, "showTotal": true }),
        ElementType::PropertyFilter => json!({
            "categoryIds": [],
            "propertyName": "",
            "displayStyle": "buttons"
        }),
        ElementType::FilteredProducts => json!({
            "categoryIds": [],
            "limit": 12,
            "layout": "grid"
        }),
        _ => return Props::new(),
    };

    match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    }
}

pub(crate) fn default_style() -> Style {
    Style {
        background_color: Some("transparent".to_string()),
        border_color: Some("transparent".to_string()),
        border_width: Some(0.0),
        border_radius: Some(0.0),
        padding: Some(Spacing::uniform(8.0)),
        margin: Some(Spacing::uniform(0.0)),
        ..Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let props = default_props(&ElementType::Text);
        assert_eq!(props["content"], "Text");
        assert_eq!(props["fontSize"], 16);
    }

    #[test]
    fn test_grid_defaults_include_limit() {
        let props = default_props(&ElementType::ProductGrid);
        assert_eq!(props["limit"], 12);
        assert!(props["categoryIds"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unlisted_type_has_empty_props() {
        assert!(default_props(&ElementType::Divider).is_empty());
    }
}
