//! Integration tests for editor crate

use pagebuilder_connections::{Delivery, EventPayload};
use pagebuilder_document::{
    ConnectionPatch, ConnectionType, Document, Element, ElementPatch, ElementType, NewConnection,
    PageTemplate, Position,
};
use pagebuilder_editor::{EditSession, EditorConfig};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_document_lifecycle() {
    let mut session = EditSession::new("local", Document::new("Door catalog"));

    // Check initial state
    assert_eq!(session.document().pages.len(), 1);
    assert!(!session.can_undo());

    // Build a small page
    let heading = session
        .add_element(ElementType::Heading, Position::new(40.0, 20.0))
        .unwrap();
    let grid = session
        .add_element(ElementType::ProductGrid, Position::new(40.0, 120.0))
        .unwrap();

    let node = session.selected_page().elements.find_by_id(&grid).unwrap();
    assert_eq!(node.data.props["limit"], 12);
    assert_eq!(node.data.size.width, 200.0);

    session
        .update_element(&heading, ElementPatch::position(Position::new(0.0, 0.0)))
        .unwrap();

    // Save and reopen
    let json = session.document().to_json_pretty().unwrap();
    let reopened = EditSession::open("local", &json, EditorConfig::default()).unwrap();
    assert_eq!(reopened.document(), session.document());
    assert!(!reopened.can_undo());
}

#[test]
fn test_connections_route_while_editing() {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let filter = session
        .add_element(ElementType::PropertyFilter, Position::default())
        .unwrap();
    let list = session
        .add_element(ElementType::FilteredProducts, Position::default())
        .unwrap();
    let connection = session
        .add_connection(NewConnection::new(filter.clone(), list.clone(), ConnectionType::Filter))
        .unwrap();

    let seen = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&seen);
    session.bus_mut().subscribe(list.clone(), move |_: &Delivery| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    session.publish(&filter, EventPayload::filter("color", "oak"));
    assert_eq!(*seen.borrow(), 1);
    assert_eq!(session.bus().filters_for(&list).as_map().len(), 1);

    // Deactivating the edge stops routing immediately
    session
        .update_connection(&connection, ConnectionPatch::active(false))
        .unwrap();
    session.publish(&filter, EventPayload::filter("color", "walnut"));
    assert_eq!(*seen.borrow(), 1);

    // Undo brings the active edge back
    session.undo();
    session.publish(&filter, EventPayload::filter("color", "white"));
    assert_eq!(*seen.borrow(), 2);
}

#[test]
fn test_custom_default_element_size() {
    let config: EditorConfig =
        serde_json::from_str(r#"{"defaultElementSize": {"width": 320, "height": 80}}"#).unwrap();
    let mut session = EditSession::with_config("local", Document::new("Shop"), config);

    let id = session
        .add_element(ElementType::Button, Position::default())
        .unwrap();

    let node = session.selected_page().elements.find_by_id(&id).unwrap();
    assert_eq!(node.data.size.width, 320.0);
    assert_eq!(node.data.size.height, 80.0);
}

#[test]
fn test_template_is_one_undo_step() -> anyhow::Result<()> {
    let mut session = EditSession::new("local", Document::new("Shop"));
    let filter = session.add_element(ElementType::PropertyFilter, Position::default())?;
    let list = session.add_element(ElementType::FilteredProducts, Position::default())?;
    session.add_connection(NewConnection::new(filter.clone(), list, ConnectionType::Filter))?;
    session.publish(&filter, EventPayload::filter("color", "oak"));
    let before = session.document().clone();
    let steps = session.history().len();

    let template = PageTemplate::new(
        "Door Landing",
        vec![Element::new("hero", ElementType::Hero), Element::new("grid", ElementType::ProductGrid)],
    );
    let page_id = session.apply_template(template)?;

    assert_eq!(session.history().len(), steps + 1);
    assert_eq!(session.history().undo_label(), Some("Apply template"));
    assert_eq!(session.document().pages.len(), 1);
    assert_eq!(session.selected_page().id, page_id);
    assert_eq!(session.selected_page().slug, "door-landing");
    assert!(session.selected_element().is_none());
    assert!(session.document().find_element("hero").is_none());
    assert!(session.document().connections.is_empty());
    assert!(session.filters().is_empty());

    assert!(session.undo());
    assert_eq!(session.document(), &before);
    Ok(())
}
