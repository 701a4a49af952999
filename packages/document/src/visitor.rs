use crate::connection::Connection;
use crate::document::Document;
use crate::page::Page;
use crate::tree::{ElementNode, ElementTree};

/// Visitor pattern for walking a document immutably
///
/// Default implementations walk the entire document: pages in order, each page's
/// elements depth-first pre-order, then the connections. Override specific
/// visit_* methods to act on nodes.
pub trait ElementVisitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_page(&mut self, page: &Page) {
        walk_page(self, page);
    }

    fn visit_element(&mut self, tree: &ElementTree, node: &ElementNode, depth: usize) {
        walk_element(self, tree, node, depth);
    }

    fn visit_connection(&mut self, _connection: &Connection) {
        // Leaf, nothing to walk
    }
}

pub fn walk_document<V: ElementVisitor>(visitor: &mut V, doc: &Document) {
    for page in &doc.pages {
        visitor.visit_page(page);
    }
    for connection in &doc.connections {
        visitor.visit_connection(connection);
    }
}

pub fn walk_page<V: ElementVisitor>(visitor: &mut V, page: &Page) {
    walk_tree(visitor, &page.elements);
}

pub fn walk_tree<V: ElementVisitor>(visitor: &mut V, tree: &ElementTree) {
    for root in tree.roots() {
        if let Some(node) = tree.find_by_id(root) {
            visitor.visit_element(tree, node, 0);
        }
    }
}

pub fn walk_element<V: ElementVisitor>(
    visitor: &mut V,
    tree: &ElementTree,
    node: &ElementNode,
    depth: usize,
) {
    for child in node.children() {
        if let Some(child) = tree.find_by_id(child) {
            visitor.visit_element(tree, child, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementType};
    use crate::connection::{ConnectionType, NewConnection};

    #[derive(Default)]
    struct Outline {
        lines: Vec<String>,
        connections: usize,
    }

    impl ElementVisitor for Outline {
        fn visit_element(&mut self, tree: &ElementTree, node: &ElementNode, depth: usize) {
            self.lines.push(format!("{}{}", "  ".repeat(depth), node.id()));
            walk_element(self, tree, node, depth);
        }

        fn visit_connection(&mut self, _connection: &Connection) {
            self.connections += 1;
        }
    }

    #[test]
    fn test_walks_pages_elements_and_connections() {
        let doc = Document::new("Catalog");
        let page_id = doc.first_page().id.clone();
        let doc = doc
            .insert_element(
                &page_id,
                None,
                None,
                Element::new("c1", ElementType::Container)
                    .with_children(vec![Element::new("e1", ElementType::Text)]),
            )
            .unwrap();
        let (doc, _) = doc.add_connection(NewConnection::new("c1", "e1", ConnectionType::Data));

        let mut outline = Outline::default();
        outline.visit_document(&doc);

        assert_eq!(outline.lines, vec!["c1", "  e1"]);
        assert_eq!(outline.connections, 1);
    }
}
