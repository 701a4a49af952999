use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagebuilder_document::{Element, ElementPatch, ElementTree, ElementType, Position};

/// `sections` containers with `per_section` leaves each
fn build_tree(sections: usize, per_section: usize) -> ElementTree {
    let elements = (0..sections)
        .map(|s| {
            let children = (0..per_section)
                .map(|i| Element::new(format!("leaf-{s}-{i}"), ElementType::Text))
                .collect();
            Element::new(format!("section-{s}"), ElementType::Section).with_children(children)
        })
        .collect();

    ElementTree::try_from(elements).unwrap()
}

fn update_leaf(c: &mut Criterion) {
    let tree = build_tree(20, 10);
    let patch = ElementPatch::position(Position::new(12.0, 24.0));

    c.bench_function("update_by_id_200_nodes", |b| {
        b.iter(|| tree.update_by_id(black_box("leaf-19-9"), black_box(&patch)))
    });
}

fn remove_section(c: &mut Criterion) {
    let tree = build_tree(20, 10);

    c.bench_function("remove_by_id_section", |b| {
        b.iter(|| tree.remove_by_id(black_box("section-10")))
    });
}

fn round_trip_nested(c: &mut Criterion) {
    let tree = build_tree(20, 10);

    c.bench_function("to_nested_and_back", |b| {
        b.iter(|| ElementTree::try_from(black_box(&tree).to_nested()).unwrap())
    });
}

criterion_group!(benches, update_leaf, remove_section, round_trip_nested);
criterion_main!(benches);
