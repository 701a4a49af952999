//! Integration tests for filter-driven catalog fetches
//!
//! This tests:
//! - A property filter narrowing a filtered-products element over a connection
//! - Out-of-order responses: the older request never overwrites the newer one
//! - Announcing loaded products to data targets

use pagebuilder_catalog::{
    CatalogError, CatalogService, CategoryNode, FetchSlot, FetchState, InMemoryCatalog, Product,
    ProductPage, ProductQuery,
};
use pagebuilder_connections::{ConnectionBus, Delivery, EventPayload};
use pagebuilder_document::{ConnectionType, Document, Element, ElementType, NewConnection};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::oneshot;

fn catalog() -> InMemoryCatalog {
    let products = ["white", "white", "oak", "walnut"]
        .iter()
        .enumerate()
        .map(|(i, color)| {
            serde_json::from_value::<Product>(json!({
                "id": format!("door-{i}"),
                "name": format!("Door {i}"),
                "category_id": "doors",
                "properties": {"color": color}
            }))
            .unwrap()
        })
        .collect();
    InMemoryCatalog::new(vec![CategoryNode::new("doors", "Doors")], products)
}

fn filtered_products() -> Element {
    let serde_json::Value::Object(props) = json!({"categoryIds": ["doors"], "limit": 10}) else {
        unreachable!()
    };
    Element::new("list", ElementType::FilteredProducts).with_props(props)
}

#[tokio::test]
async fn test_filter_selection_narrows_products() -> anyhow::Result<()> {
    let doc = Document::new("Shop");
    let (doc, _) = doc.add_connection(NewConnection::new("color-filter", "list", ConnectionType::Filter));
    let (doc, _) = doc.add_connection(NewConnection::new("list", "summary", ConnectionType::Data));

    let mut bus = ConnectionBus::new();
    bus.sync_connections(&doc.connections);

    let announced = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&announced);
    bus.subscribe("summary", move |delivery: &Delivery| {
        if let EventPayload::ProductsLoaded { total, .. } = &delivery.payload {
            *sink.borrow_mut() = Some(*total);
        }
        Ok(())
    });

    let service = catalog();
    let element = filtered_products();
    let mut slot: FetchSlot<ProductQuery, ProductPage> = FetchSlot::new();

    // Nothing selected yet: every door
    let query = ProductQuery::from_element(&element.data, &bus.filters_for("list")).unwrap();
    let ticket = slot.begin(query.clone()).unwrap();
    let page = ticket.run(service.filtered_products(&query)).await?;
    assert!(slot.complete(&ticket, page));
    assert_eq!(slot.state().value().map(|p| p.total), Some(4));

    // Re-render without changes: no new request
    let query = ProductQuery::from_element(&element.data, &bus.filters_for("list")).unwrap();
    assert!(slot.begin(query).is_none());

    bus.publish("color-filter", EventPayload::filter("color", "white"));

    let query = ProductQuery::from_element(&element.data, &bus.filters_for("list")).unwrap();
    let ticket = slot.begin(query.clone()).unwrap();
    let page = ticket.run(service.filtered_products(&query)).await?;
    assert!(slot.complete(&ticket, page));

    let page = slot.state().value().unwrap();
    assert_eq!(page.total, 2);

    bus.publish("list", page.to_payload(&query.filters));
    assert_eq!(*announced.borrow(), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_late_response_for_old_filter_is_dropped() {
    let service = catalog();
    let mut slot: FetchSlot<ProductQuery, ProductPage> = FetchSlot::new();

    let oak = ProductQuery::new(vec!["doors".to_string()])
        .with_filters([("color".to_string(), "oak".into())].into_iter().collect());
    let walnut = ProductQuery::new(vec!["doors".to_string()])
        .with_filters([("color".to_string(), "walnut".into())].into_iter().collect());

    // The oak request is slow; walnut is issued after it and answers first
    let (release_oak, oak_gate) = oneshot::channel::<()>();
    let oak_ticket = slot.begin(oak.clone()).unwrap();
    let oak_service = service.clone();
    let oak_request = tokio::spawn(async move {
        let _ = oak_gate.await;
        oak_service.filtered_products(&oak).await
    });

    let walnut_ticket = slot.begin(walnut.clone()).unwrap();
    let walnut_page = walnut_ticket.run(service.filtered_products(&walnut)).await.unwrap();
    assert!(slot.complete(&walnut_ticket, walnut_page));

    let _ = release_oak.send(());
    let late = oak_request.await.unwrap();
    assert!(!slot.complete(&oak_ticket, late));

    match slot.state() {
        FetchState::Ready(page) => assert_eq!(page.products[0].properties["color"], "walnut"),
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn test_catalog_failure_is_local_to_the_element() {
    let service = catalog();
    let mut slot: FetchSlot<ProductQuery, ProductPage> = FetchSlot::new();

    let query = ProductQuery::new(vec!["sofas".to_string()]);
    let ticket = slot.begin(query.clone()).unwrap();
    let result = ticket.run(service.filtered_products(&query)).await.unwrap();
    assert_eq!(result, Err(CatalogError::UnknownCategory("sofas".to_string())));

    slot.complete(&ticket, result);
    assert_eq!(slot.state().error(), Some("Unknown category: sofas"));
}
