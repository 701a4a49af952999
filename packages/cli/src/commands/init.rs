use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagebuilder_catalog::{CategoryNode, Product};
use pagebuilder_document::{
    default_props, ConnectionType, Document, ElementPatch, ElementType, NewConnection, Position,
};
use pagebuilder_editor::EditSession;
use serde_json::json;
use std::fs;
use std::path::Path;

const STARTER_CATALOG_NAME: &str = "catalog.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the starter document
    #[arg(short, long, default_value = "Catalog")]
    pub name: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing page builder project...".bright_blue().bold());

    let config = Config {
        catalog: Some(STARTER_CATALOG_NAME.to_string()),
        ..Config::default()
    };

    let document = starter_document(&args.name, &config)?;
    super::write_document(&config.document_path(cwd), &document)?;
    println!("  {} Created {}", "✓".green(), config.document);

    let catalog_path = cwd.join(STARTER_CATALOG_NAME);
    if !catalog_path.exists() {
        fs::write(&catalog_path, serde_json::to_string_pretty(&starter_catalog())?)?;
        println!("  {} Created {}", "✓".green(), STARTER_CATALOG_NAME);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagebuilder inspect");
    println!("  2. Run: pagebuilder preview <filtered-products-id> --filter color=white");
    println!("  3. Script edits with: pagebuilder apply <script.json>");

    Ok(())
}

/// Heading, a color filter and a product list wired to it
pub(crate) fn starter_document(name: &str, config: &Config) -> Result<Document> {
    let mut session = EditSession::with_config("init", Document::new(name), config.editor.clone());

    let heading = session.add_element(ElementType::Heading, Position::new(40.0, 40.0))?;
    let mut props = default_props(&ElementType::Heading);
    props.insert("content".to_string(), json!(name));
    session.update_element(&heading, ElementPatch::props(props))?;

    let filter = session.add_element(ElementType::PropertyFilter, Position::new(40.0, 160.0))?;
    let mut props = default_props(&ElementType::PropertyFilter);
    props.insert("categoryIds".to_string(), json!(["doors"]));
    props.insert("propertyName".to_string(), json!("color"));
    session.update_element(&filter, ElementPatch::props(props))?;

    let products = session.add_element(ElementType::FilteredProducts, Position::new(280.0, 160.0))?;
    let mut props = default_props(&ElementType::FilteredProducts);
    props.insert("categoryIds".to_string(), json!(["doors"]));
    session.update_element(&products, ElementPatch::props(props))?;

    let mut connection = NewConnection::new(filter, products, ConnectionType::Filter);
    connection.target_property = Some("color".to_string());
    session.add_connection(connection)?;

    Ok(session.document().clone())
}

fn starter_catalog() -> serde_json::Value {
    let categories = vec![CategoryNode::new("doors", "Doors")
        .with_child(CategoryNode::new("interior", "Interior doors"))
        .with_child(CategoryNode::new("entrance", "Entrance doors"))];

    let product = |id: &str, name: &str, price: f64, category: &str, color: &str| Product {
        id: id.to_string(),
        name: name.to_string(),
        base_price: price,
        category_id: category.to_string(),
        images: Vec::new(),
        properties: match json!({ "color": color }) {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        },
    };

    json!({
        "categories": categories,
        "products": [
            product("p1", "Oak interior door", 120.0, "interior", "oak"),
            product("p2", "White interior door", 95.0, "interior", "white"),
            product("p3", "Steel entrance door", 340.0, "entrance", "black"),
            product("p4", "White entrance door", 310.0, "entrance", "white"),
        ]
    })
}
