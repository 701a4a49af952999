use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagebuilder_catalog::{
    CatalogService, CategoryNode, FetchSlot, FetchState, InMemoryCatalog, Product, ProductPage,
    ProductQuery, PropertyOption,
};
use pagebuilder_connections::FilterValue;
use pagebuilder_document::{ElementData, ElementType};
use pagebuilder_editor::EditSession;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Element to render catalog data for
    pub element: String,

    /// Active filter as `name=value`; `name=a,b` selects several values
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, FilterValue)>,

    /// Catalog JSON (overrides config)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

/// `{categories, products}` file served by the in-memory catalog
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<CategoryNode>,
    #[serde(default)]
    products: Vec<Product>,
}

/// What an element would show
#[derive(Debug)]
pub enum Preview {
    /// Filter widget options
    Options(Vec<PropertyOption>),
    /// Product list, plus how many connections its `productsLoaded` reached
    Products { page: ProductPage, announced: usize },
    /// Element has no category to show
    Empty,
}

pub fn preview(args: PreviewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = super::read_document(&config.document_path(cwd))?;
    let catalog_path = args
        .catalog
        .map(|p| cwd.join(p))
        .or_else(|| config.catalog_path(cwd))
        .ok_or_else(|| anyhow!("No catalog configured; pass --catalog"))?;
    let catalog = read_catalog(&catalog_path)?;

    let mut session = EditSession::with_config("preview", document, config.editor.clone());
    for (name, value) in args.filters {
        session.bus_mut().filters_mut().set_filter(name, value);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let preview = runtime.block_on(render(&mut session, &catalog, &args.element))?;

    println!("{} {}", "🔎 Preview of".bright_blue().bold(), args.element.bold());
    match preview {
        Preview::Options(options) => {
            for option in options {
                println!("  {} ({})", option.label, option.count);
            }
        }
        Preview::Products { page, announced } => {
            println!("  {} of {} products", page.products.len(), page.total);
            for product in &page.products {
                println!("  {} {:>10.2}  {}", "•".green(), product.base_price, product.name);
            }
            if announced > 0 {
                println!("  {} announced to {} connections", "✓".green(), announced);
            }
        }
        Preview::Empty => println!("  {}", "No categories selected, nothing to show".yellow()),
    }

    Ok(())
}

fn read_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read catalog {}", path.display()))?;
    let file: CatalogFile = serde_json::from_str(&source)
        .with_context(|| format!("Invalid catalog {}", path.display()))?;
    Ok(InMemoryCatalog::new(file.categories, file.products))
}

/// Fetch what `element_id` would display under the session's current filters
pub async fn render<C: CatalogService>(
    session: &mut EditSession,
    catalog: &C,
    element_id: &str,
) -> Result<Preview> {
    let (_, node) = session
        .document()
        .find_element(element_id)
        .ok_or_else(|| anyhow!("Unknown element: {}", element_id))?;
    let element = node.data.clone();
    let filters = session.filters();

    if element.kind == ElementType::PropertyFilter {
        let Some(property) = property_name(&element) else {
            return Ok(Preview::Empty);
        };
        let Some(query) = ProductQuery::from_element(&element, &filters) else {
            return Ok(Preview::Empty);
        };
        let options = catalog
            .property_values(&query.category_ids, &property, &filters)
            .await?;
        return Ok(Preview::Options(options));
    }

    let Some(query) = ProductQuery::from_element(&element, &filters) else {
        return Ok(Preview::Empty);
    };

    let mut slot: FetchSlot<ProductQuery, ProductPage> = FetchSlot::new();
    let Some(ticket) = slot.begin(query.clone()) else {
        return Ok(Preview::Empty);
    };
    let result = ticket
        .run(catalog.filtered_products(&query))
        .await
        .and_then(|result| result);
    slot.complete(&ticket, result);

    match slot.state() {
        FetchState::Ready(page) => {
            let page = page.clone();
            let report = session.publish(element_id, page.to_payload(&query.filters));
            Ok(Preview::Products {
                page,
                announced: report.edges,
            })
        }
        FetchState::Failed(message) => Err(anyhow!("Catalog request failed: {}", message)),
        FetchState::Idle | FetchState::Loading => Ok(Preview::Empty),
    }
}

fn property_name(element: &ElementData) -> Option<String> {
    element
        .props
        .get("propertyName")
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn parse_filter(raw: &str) -> Result<(String, FilterValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    if name.is_empty() {
        return Err(format!("missing filter name in `{raw}`"));
    }

    let values: Vec<String> = value.split(',').map(str::to_string).collect();
    let value = match values.len() {
        1 => FilterValue::One(value.to_string()),
        _ => FilterValue::Many(values),
    };
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_document;
    use serde_json::json;

    fn catalog() -> InMemoryCatalog {
        let file: CatalogFile = serde_json::from_value(json!({
            "categories": [{ "id": "doors", "name": "Doors", "subcategories": [
                { "id": "interior", "name": "Interior", "parent_id": "doors", "level": 1 }
            ]}],
            "products": [
                { "id": "p1", "name": "Oak", "base_price": 120.0, "category_id": "interior",
                  "properties": { "color": "oak" } },
                { "id": "p2", "name": "White", "base_price": 95.0, "category_id": "interior",
                  "properties": { "color": "white" } },
                { "id": "p3", "name": "Snow", "base_price": 99.0, "category_id": "doors",
                  "properties": { "color": "white" } }
            ]
        }))
        .unwrap();
        InMemoryCatalog::new(file.categories, file.products)
    }

    fn session() -> EditSession {
        let config = Config::default();
        EditSession::new("test", starter_document("Doors", &config).unwrap())
    }

    fn element_of(session: &EditSession, kind: ElementType) -> String {
        session
            .document()
            .first_page()
            .elements
            .iter()
            .find(|node| *node.kind() == kind)
            .map(|node| node.id().to_string())
            .unwrap()
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("color=white"),
            Ok(("color".to_string(), FilterValue::One("white".to_string())))
        );
        assert_eq!(
            parse_filter("color=white,oak"),
            Ok((
                "color".to_string(),
                FilterValue::Many(vec!["white".to_string(), "oak".to_string()])
            ))
        );
        assert!(parse_filter("color").is_err());
        assert!(parse_filter("=white").is_err());
    }

    #[tokio::test]
    async fn test_products_follow_active_filters() {
        let mut session = session();
        let products = element_of(&session, ElementType::FilteredProducts);
        session.bus_mut().filters_mut().set_filter("color", "white");

        let preview = render(&mut session, &catalog(), &products).await.unwrap();

        let Preview::Products { page, .. } = preview else {
            panic!("expected products, got {preview:?}");
        };
        assert_eq!(page.total, 2);
        assert!(page.products.iter().all(|p| p.properties["color"] == "white"));
    }

    #[tokio::test]
    async fn test_filter_options_ignore_own_selection() {
        let mut session = session();
        let filter = element_of(&session, ElementType::PropertyFilter);
        session.bus_mut().filters_mut().set_filter("color", "white");

        let preview = render(&mut session, &catalog(), &filter).await.unwrap();

        let Preview::Options(options) = preview else {
            panic!("expected options, got {preview:?}");
        };
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["oak", "white"]);
        assert_eq!(options[1].count, 2);
    }

    #[tokio::test]
    async fn test_element_without_categories_shows_nothing() {
        let mut session = session();
        let heading = element_of(&session, ElementType::Heading);

        let preview = render(&mut session, &catalog(), &heading).await.unwrap();
        assert!(matches!(preview, Preview::Empty));

        assert!(render(&mut session, &catalog(), "ghost").await.is_err());
    }
}
