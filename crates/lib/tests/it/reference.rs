//! Reference transparency and cross-backend composition.

use hdata::node::Node;
use hdata::value::ValueType;

#[test]
fn test_reference_transparency_both_ways() {
    let a = Node::new();
    let b = Node::new();
    a.set_reference(&b);

    // Mutating through the alias is visible through the target.
    a.insert("via_a").unwrap().set(1);
    assert_eq!(b.get("via_a").unwrap().get_as::<i32>().unwrap(), 1);

    // Mutating the target is visible through the alias.
    b.insert("via_b").unwrap().set(2);
    assert_eq!(a.get("via_b").unwrap().get_as::<i32>().unwrap(), 2);

    assert_eq!(a.count(), b.count());
    assert_eq!(a.value_type(), ValueType::Object);
}

#[test]
fn test_reference_write_through_scalars() {
    let target = Node::with(1);
    let alias = Node::new();
    alias.set_reference(&target);

    alias.set(42);
    assert_eq!(target.get_as::<i32>().unwrap(), 42);

    // The alias cell still holds the redirection.
    assert!(alias.is_reference());
    assert_eq!(alias.get_as::<i32>().unwrap(), 42);
}

#[test]
fn test_cyclic_reference_is_rejected() {
    let a = Node::new();
    let b = Node::new();
    a.set_reference(&b);
    b.set_reference(&a);

    let err = a.as_object().unwrap_err();
    assert!(err.is_cycle_error());
    let err = a.get_path("x/y").unwrap_err();
    assert!(err.is_cycle_error());
}

#[test]
fn test_alias_inside_one_tree() {
    // A node that is "really" stored elsewhere in the same tree.
    let root = Node::new();
    root.insert_path("storage/temperature").unwrap().set(300.5);

    let alias = root.insert_path("views/t").unwrap();
    alias.set_reference(&root.get_path("storage/temperature").unwrap());

    assert_eq!(root.get_path("views/t").unwrap().get_as::<f64>().unwrap(), 300.5);

    // Updating the physical location updates the view.
    root.insert_path("storage/temperature").unwrap().set(301.0);
    assert_eq!(root.get_path("views/t").unwrap().get_as::<f64>().unwrap(), 301.0);
}

#[test]
fn test_logical_document_over_physical_store() {
    // A mapping document synthesizes a logical schema over values that
    // physically live in a separate tree, the way an external experiment
    // database is federated behind the node API.
    let physical = Node::new();
    physical
        .insert_path("raw/shot_1024/ip")
        .unwrap()
        .set(2.3e6);
    physical
        .insert_path("raw/shot_1024/label")
        .unwrap()
        .set("discharge");

    let logical = Node::new();
    logical
        .insert_path("equilibrium/current")
        .unwrap()
        .set_reference(&physical.get_path("raw/shot_1024/ip").unwrap());
    logical
        .insert_path("annotations/label")
        .unwrap()
        .set_reference(&physical.get_path("raw/shot_1024/label").unwrap());

    assert_eq!(
        logical
            .get_path("equilibrium/current")
            .unwrap()
            .get_as::<f64>()
            .unwrap(),
        2.3e6
    );
    assert_eq!(
        logical
            .get_path("annotations/label")
            .unwrap()
            .get_as::<String>()
            .unwrap(),
        "discharge"
    );

    // Write-through into the physical store.
    logical.get_path("equilibrium/current").unwrap().set(2.4e6);
    assert_eq!(
        physical
            .get_path("raw/shot_1024/ip")
            .unwrap()
            .get_as::<f64>()
            .unwrap(),
        2.4e6
    );
}

#[test]
fn test_reference_chain_through_containers() {
    let terminal = Node::new();
    terminal.insert("k").unwrap().set("v");

    let middle = Node::new();
    middle.set_reference(&terminal);
    let outer = Node::new();
    outer.set_reference(&middle);

    // Chains resolve transitively to the non-reference terminal.
    assert_eq!(outer.get("k").unwrap().get_as::<String>().unwrap(), "v");
    assert!(Node::ptr_eq(&outer.resolve().unwrap(), &terminal));
}
