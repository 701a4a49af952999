use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagebuilder_connections::ConnectionGraph;
use pagebuilder_document::visitor::walk_element;
use pagebuilder_document::{Document, ElementNode, ElementTree, ElementVisitor, Page};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Document to inspect (overrides config)
    pub path: Option<PathBuf>,
}

pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = args
        .path
        .map(|p| cwd.join(p))
        .unwrap_or_else(|| config.document_path(cwd));
    let document = super::read_document(&path)?;

    println!(
        "{} {} ({} pages, {} elements)",
        "📄".bright_blue(),
        document.name.bold(),
        document.pages.len(),
        document.element_count()
    );

    let mut outline = Outline::default();
    outline.visit_document(&document);
    for line in &outline.lines {
        println!("{line}");
    }

    let report = ConnectionReport::new(&document);
    println!();
    println!("{} ({} active)", "Connections".bold(), report.active);
    for connection in &document.connections {
        let marker = if connection.is_active {
            "→".green()
        } else {
            "⇢".dimmed()
        };
        let property = connection
            .target_property
            .as_deref()
            .map(|p| format!(" [{p}]"))
            .unwrap_or_default();
        println!(
            "  {} {:?}: {} {} {}{}",
            connection.id.dimmed(),
            connection.connection_type,
            connection.source_element_id,
            marker,
            connection.target_element_id,
            property
        );
    }

    if !report.dangling.is_empty() {
        println!();
        for id in &report.dangling {
            println!(
                "{} connection {} points at a missing element",
                "⚠️".yellow(),
                id
            );
        }
    }

    Ok(())
}

/// Indented element tree, one line per page and per element
#[derive(Default)]
struct Outline {
    lines: Vec<String>,
}

impl ElementVisitor for Outline {
    fn visit_page(&mut self, page: &Page) {
        self.lines.push(format!(
            "  {} {} /{}",
            "▸".bright_blue(),
            page.name.bold(),
            page.slug
        ));
        pagebuilder_document::visitor::walk_page(self, page);
    }

    fn visit_element(&mut self, tree: &ElementTree, node: &ElementNode, depth: usize) {
        let hidden = if node.data.visible == Some(false) {
            " (hidden)"
        } else {
            ""
        };
        self.lines.push(format!(
            "    {}{} {}{}",
            "  ".repeat(depth),
            node.kind().as_str(),
            node.id().dimmed(),
            hidden
        ));
        walk_element(self, tree, node, depth);
    }
}

/// Active edge count and active edges whose endpoints no longer exist
struct ConnectionReport {
    active: usize,
    dangling: Vec<String>,
}

impl ConnectionReport {
    fn new(document: &Document) -> Self {
        let graph = ConnectionGraph::from_connections(&document.connections);
        let dangling = graph
            .dangling(|id| document.find_element(id).is_some())
            .into_iter()
            .map(|c| c.id.clone())
            .collect();

        Self {
            active: graph.edge_count(),
            dangling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_document::{ConnectionPatch, ConnectionType, Element, ElementType, NewConnection};

    fn document() -> Document {
        let doc = Document::new("Test");
        let page_id = doc.first_page().id.clone();
        let doc = doc
            .insert_element(
                &page_id,
                None,
                None,
                Element::new("row", ElementType::Row)
                    .with_children(vec![Element::new("filter", ElementType::PropertyFilter)]),
            )
            .unwrap();
        let (doc, _) = doc.add_connection(NewConnection::new("filter", "gone", ConnectionType::Filter));
        let (doc, inactive) = doc.add_connection(NewConnection::new("row", "lost", ConnectionType::Data));
        doc.update_connection(&inactive, &ConnectionPatch::active(false))
    }

    #[test]
    fn test_outline_indents_children() {
        colored::control::set_override(false);
        let mut outline = Outline::default();
        outline.visit_document(&document());

        assert_eq!(outline.lines.len(), 3);
        assert!(outline.lines[1].ends_with("row row"));
        assert!(outline.lines[2].starts_with("      propertyFilter filter"));
    }

    #[test]
    fn test_report_lists_only_active_dangling_edges() {
        let doc = document();
        let report = ConnectionReport::new(&doc);

        assert_eq!(report.active, 1);
        assert_eq!(report.dangling, vec![doc.connections[0].id.clone()]);
    }

    #[test]
    fn test_inspect_reads_configured_document() {
        let dir = tempfile::tempdir().unwrap();
        super::super::write_document(&dir.path().join("document.json"), &document()).unwrap();

        inspect(InspectArgs { path: None }, dir.path()).unwrap();
        assert!(inspect(
            InspectArgs {
                path: Some(PathBuf::from("missing.json"))
            },
            dir.path()
        )
        .is_err());
    }
}
