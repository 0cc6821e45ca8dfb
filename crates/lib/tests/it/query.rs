//! Path queries, bulk ranges, and merge/fetch/update semantics.

use hdata::node::{ArrayMergePolicy, MergeOptions, Node};
use hdata::path::Path;

fn sample_tree() -> Node {
    Node::from_json(&serde_json::json!({
        "equilibrium": {
            "time_slice": [
                {"ip": 1.0e6, "ok": true},
                {"ip": 2.0e6, "ok": false},
                {"ip": 3.0e6, "ok": true},
            ],
        },
        "summary": {"shot": 1024},
    }))
}

#[test]
fn test_get_path_with_indices() {
    let root = sample_tree();
    let path = Path::new()
        .key("equilibrium")
        .key("time_slice")
        .index(1)
        .key("ip");
    assert_eq!(root.get_path(path).unwrap().get_as::<f64>().unwrap(), 2.0e6);

    // Numeric literal segments address indices of an existing array.
    assert_eq!(
        root.get_path("equilibrium/time_slice/2/ip")
            .unwrap()
            .get_as::<f64>()
            .unwrap(),
        3.0e6
    );

    // Negative read indices count from the end.
    let last = Path::new().key("equilibrium").key("time_slice").index(-1);
    assert!(root.get_path(last).unwrap().get("ok").unwrap().get_as::<bool>().unwrap());
}

#[test]
fn test_get_path_with_slice() {
    let root = sample_tree();
    let path = Path::new()
        .key("equilibrium")
        .key("time_slice")
        .slice(0, 3, 2);
    let selected = root.get_path(path).unwrap();
    assert_eq!(selected.count(), 2);
    assert_eq!(
        selected.at(0).unwrap().get("ip").unwrap().get_as::<f64>().unwrap(),
        1.0e6
    );
    assert_eq!(
        selected.at(1).unwrap().get("ip").unwrap().get_as::<f64>().unwrap(),
        3.0e6
    );
}

#[test]
fn test_find_predicate_over_subtree() {
    let root = sample_tree();

    let flagged: Vec<Node> = root
        .find(|node| {
            node.contains("ok") && node.get("ok").unwrap().get_as::<bool>().unwrap_or(false)
        })
        .collect();
    assert_eq!(flagged.len(), 2);
    for slice in &flagged {
        assert!(slice.contains("ip"));
    }
}

#[test]
fn test_bulk_update_reports_successes() {
    let root = sample_tree();

    let range = root.find(|node| node.contains("ok"));
    let updated = Node::update_range(range, &Node::with("patched"));
    assert_eq!(updated, 3);

    assert_eq!(
        root.get_path("equilibrium/time_slice/0")
            .unwrap()
            .get_as::<String>()
            .unwrap(),
        "patched"
    );
}

#[test]
fn test_bulk_remove_clears_in_place() {
    let root = sample_tree();

    let range = root.find(|node| node.get_as::<f64>().is_ok());
    let removed = Node::remove_range(range);
    // Three ip floats plus the shot integer read as f64.
    assert_eq!(removed, 4);
    assert!(root.get_path("summary/shot").unwrap().is_null());

    // Structure survives, only the matched leaves were reset.
    assert_eq!(root.get_path("equilibrium/time_slice").unwrap().count(), 3);
}

#[test]
fn test_merge_at_path() {
    let root = sample_tree();

    let patch = Node::from_json(&serde_json::json!({
        "shot": 1025,
        "operator": "night shift",
    }));

    root.merge("summary", &patch, &MergeOptions::default()).unwrap();
    assert_eq!(
        root.get_path("summary/shot").unwrap().get_as::<i64>().unwrap(),
        1025
    );
    assert_eq!(
        root.get_path("summary/operator")
            .unwrap()
            .get_as::<String>()
            .unwrap(),
        "night shift"
    );
}

#[test]
fn test_merge_creates_missing_target() {
    let root = Node::new();
    let patch = Node::from_json(&serde_json::json!({"a": 1}));

    let merged = root
        .merge("fresh/spot", &patch, &MergeOptions::default())
        .unwrap();
    assert_eq!(merged.get("a").unwrap().get_as::<i64>().unwrap(), 1);
    assert_eq!(root.get_path("fresh/spot/a").unwrap().get_as::<i64>().unwrap(), 1);
}

#[test]
fn test_merge_array_append_vs_overwrite() {
    let root = Node::from_json(&serde_json::json!({"xs": [1, 2, 3]}));
    let patch = Node::from_json(&serde_json::json!([10]));

    root.merge("xs", &patch, &MergeOptions::default()).unwrap();
    assert_eq!(root.get("xs").unwrap().count(), 4);

    root.merge(
        "xs",
        &patch,
        &MergeOptions {
            array_policy: ArrayMergePolicy::OverwriteByIndex,
        },
    )
    .unwrap();
    let xs = root.get("xs").unwrap();
    assert_eq!(xs.count(), 4);
    assert_eq!(xs.at(0).unwrap().get_as::<i64>().unwrap(), 10);
    assert_eq!(xs.at(1).unwrap().get_as::<i64>().unwrap(), 2);
}

#[test]
fn test_fetch_projection_avoids_materializing() {
    let root = sample_tree();

    let projection = Node::from_json(&serde_json::json!({"summary": {"shot": null}}));
    let fetched = root.fetch(Path::new(), &projection).unwrap();

    assert_eq!(fetched.count(), 1);
    assert_eq!(
        fetched.get_path("summary/shot").unwrap().get_as::<i64>().unwrap(),
        1024
    );
    assert!(fetched.get("equilibrium").unwrap_err().is_not_found());
}

#[test]
fn test_update_at_path_is_independent_copy() {
    let root = Node::new();
    let patch = Node::from_json(&serde_json::json!({"nested": [1, 2]}));

    root.update("slot", &patch).unwrap();
    patch.insert_path("nested").unwrap().clear();

    assert_eq!(root.get_path("slot/nested").unwrap().count(), 2);
}

#[test]
fn test_partial_failure_does_not_roll_back() {
    let root = Node::from_json(&serde_json::json!({"a": 1, "b": 2}));

    // A range where one member is made unresolvable mid-run: the cyclic
    // node fails its update, the others still apply.
    let poisoned = root.insert("c").unwrap();
    let other = Node::new();
    poisoned.set_reference(&other);
    other.set_reference(&poisoned);

    let range = root.find(|node| node.is_reference() || node.get_as::<i64>().is_ok());
    let updated = Node::update_range(range, &Node::with(0));
    assert_eq!(updated, 2);
    assert_eq!(root.get("a").unwrap().get_as::<i64>().unwrap(), 0);
    assert_eq!(root.get("b").unwrap().get_as::<i64>().unwrap(), 0);
}
