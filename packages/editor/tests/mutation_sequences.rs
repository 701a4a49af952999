//! Tests for longer command sequences
//!
//! This tests:
//! - Move + update + delete chains
//! - Undo/redo across structural edits
//! - Connection cleanup interacting with undo
//! - Document integrity after operations

use pagebuilder_connections::EventPayload;
use pagebuilder_document::{
    ConnectionType, Document, ElementPatch, ElementType, NewConnection, Position, Props,
};
use pagebuilder_editor::{CleanupPolicy, Command, EditSession, EditorConfig};
use serde_json::json;

fn props(value: serde_json::Value) -> Props {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    }
}

#[test]
fn test_move_then_delete_sequence() {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let section = session.add_element(ElementType::Section, Position::default()).unwrap();
    let row = session.add_element(ElementType::Row, Position::default()).unwrap();
    let text = session
        .add_element_to(Some(row.as_str()), ElementType::Text, Position::default())
        .unwrap();

    // Move the row (with its text) into the section
    assert!(session.move_element(&row, Some(section.as_str()), 0).unwrap());
    let tree = &session.selected_page().elements;
    assert_eq!(tree.roots(), &[section.clone()]);
    assert_eq!(tree.find_by_id(&text).unwrap().parent(), Some(row.as_str()));

    // Deleting the section takes the whole subtree
    assert!(session.delete_element(&section).unwrap());
    assert!(session.selected_page().elements.is_empty());

    // Undo restores all three
    assert!(session.undo());
    assert_eq!(session.selected_page().elements.len(), 3);
    assert_eq!(session.selected_page().elements.subtree_size(&section), 3);
}

#[test]
fn test_cycle_is_rejected_and_not_recorded() {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let outer = session.add_element(ElementType::Container, Position::default()).unwrap();
    let inner = session
        .add_element_to(Some(outer.as_str()), ElementType::Column, Position::default())
        .unwrap();
    let steps = session.history().len();

    assert!(session.move_element(&outer, Some(inner.as_str()), 0).is_err());

    assert_eq!(session.history().len(), steps);
    assert_eq!(session.selected_page().elements.roots(), &[outer]);
}

#[test]
fn test_update_replaces_props_and_undo_restores_them() {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let text = session.add_element(ElementType::Text, Position::default()).unwrap();
    session
        .update_element(&text, ElementPatch::props(props(json!({"content": "x", "color": "red"}))))
        .unwrap();

    session
        .update_element(&text, ElementPatch::props(props(json!({"content": "hi"}))))
        .unwrap();

    let node = session.selected_page().elements.find_by_id(&text).unwrap();
    assert_eq!(serde_json::Value::Object(node.data.props.clone()), json!({"content": "hi"}));

    session.undo();
    let node = session.selected_page().elements.find_by_id(&text).unwrap();
    assert_eq!(node.data.props["color"], "red");
}

#[test]
fn test_delete_cleans_connections_and_undo_brings_them_back() {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let filter = session.add_element(ElementType::PropertyFilter, Position::default()).unwrap();
    let grid = session.add_element(ElementType::FilteredProducts, Position::default()).unwrap();
    session
        .add_connection(NewConnection::new(filter.clone(), grid.clone(), ConnectionType::Filter))
        .unwrap();

    session.publish(&filter, EventPayload::filter("color", "white"));
    assert!(!session.filters().is_empty());

    assert!(session.delete_element(&filter).unwrap());
    assert!(session.document().connections.is_empty());
    assert_eq!(session.bus().graph().edge_count(), 0);
    // The removed filter's selection no longer narrows anything
    assert!(session.filters().is_empty());

    assert!(session.undo());
    assert_eq!(session.document().connections.len(), 1);
    assert_eq!(session.bus().graph().incoming(&grid).count(), 1);
}

#[test]
fn test_keep_policy_leaves_dangling_connection() {
    let config = EditorConfig {
        connection_cleanup: CleanupPolicy::Keep,
        ..EditorConfig::default()
    };
    let mut session = EditSession::with_config("local", Document::new("Shop"), config);
    let a = session.add_element(ElementType::Button, Position::default()).unwrap();
    let b = session.add_element(ElementType::Cart, Position::default()).unwrap();
    session
        .add_connection(NewConnection::new(a.clone(), b, ConnectionType::Cart))
        .unwrap();

    session.delete_element(&a).unwrap();

    let doc = session.document();
    let dangling = session
        .bus()
        .graph()
        .dangling(|id| doc.find_element(id).is_some());
    assert_eq!(dangling.len(), 1);
}

#[test]
fn test_commands_replay_from_json() {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let page_id = session.selected_page().id.clone();

    let script = json!([
        {"command": "addElement", "pageId": page_id, "element": {
            "id": "hero", "type": "section",
            "position": {"x": 0, "y": 0}, "size": {"width": 1200, "height": 400},
            "constraints": {"minWidth": 50, "minHeight": 50},
            "style": {}, "props": {},
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z",
            "children": []
        }},
        {"command": "updatePage", "pageId": page_id, "patch": {"name": "Landing"}},
        {"command": "duplicatePage", "pageId": page_id}
    ]);
    let commands: Vec<Command> = serde_json::from_value(script).unwrap();

    for command in commands {
        assert!(session.dispatch(command).unwrap().changed);
    }

    let doc = session.document();
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(doc.pages[0].name, "Landing");
    assert_eq!(doc.pages[1].name, "Landing (copy)");
    assert_eq!(doc.pages[1].elements.len(), 1);
    assert!(!doc.pages[1].elements.contains("hero"));
    assert_eq!(session.selected_page().id, doc.pages[1].id);
}
