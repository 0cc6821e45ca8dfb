//! End-to-end tree building scenarios over the node API.

use hdata::node::Node;
use hdata::value::{Complex64, ValueType};

#[test]
fn test_object_scenario() {
    // Build {"B": {"b": 1, "c": "hello world"}} and read it back.
    let entry = Node::from_json(&serde_json::json!({
        "B": {"b": 1, "c": "hello world"}
    }));

    assert_eq!(entry.get_path("B/b").unwrap().get_as::<i64>().unwrap(), 1);
    assert_eq!(
        entry.get_path("B/c").unwrap().get_as::<String>().unwrap(),
        "hello world"
    );
    assert_eq!(entry.value_type(), ValueType::Object);
    assert_eq!(entry.count(), 1);

    // Overwriting an existing entry and adding a sibling.
    entry.insert("A").unwrap().set("1234");
    entry.insert("B").unwrap().set("5678");
    assert_eq!(entry.count(), 2);
    assert_eq!(entry.get("B").unwrap().get_as::<String>().unwrap(), "5678");
}

#[test]
fn test_path_literal_scenario() {
    let entry = Node::new();
    let message = "hello world!";

    entry.insert_path("D/E/F").unwrap().set(message);

    assert_eq!(
        entry
            .get("D")
            .unwrap()
            .get("E")
            .unwrap()
            .get("F")
            .unwrap()
            .get_as::<String>()
            .unwrap(),
        message
    );

    // Exactly two intermediate objects were created.
    assert_eq!(entry.count(), 1);
    assert_eq!(entry.get("D").unwrap().count(), 1);
    assert_eq!(entry.get_path("D/E").unwrap().count(), 1);
    assert_eq!(entry.get_path("D/E/F").unwrap().count(), 1);
}

#[test]
fn test_array_scenario() {
    let entry = Node::new();

    entry.insert("C").unwrap().resize(4).unwrap();
    assert_eq!(entry.get("C").unwrap().count(), 4);
    assert_eq!(entry.get("C").unwrap().value_type(), ValueType::Array);

    let c = entry.get("C").unwrap();
    c.at(2).unwrap().set(12344.56);
    c.at(3).unwrap().set(Complex64::new(6.0, 4.0));

    c.push_back().unwrap().set(135);
    c.push_back().unwrap().set(6.0f32);
    c.push_back().unwrap().set("3.1415926");

    assert_eq!(c.count(), 7);
    assert_eq!(c.at(2).unwrap().get_as::<f64>().unwrap(), 12344.56);
    assert_eq!(c.at(4).unwrap().get_as::<String>().unwrap(), "135");
    assert_eq!(c.at(6).unwrap().get_as::<f64>().unwrap(), 3.1415926);
}

#[test]
fn test_resize_then_push_back() {
    let entry = Node::new();
    entry.insert("C").unwrap().resize(4).unwrap();
    entry
        .get("C")
        .unwrap()
        .push_back()
        .unwrap()
        .set(135);

    assert_eq!(entry.get("C").unwrap().count(), 5);
    assert_eq!(
        entry
            .get("C")
            .unwrap()
            .at(4)
            .unwrap()
            .get_as::<String>()
            .unwrap(),
        "135"
    );
}

#[test]
fn test_negative_index_append_convention() {
    let entry = Node::new();
    let c = entry.insert("C").unwrap();

    c.at(-1).unwrap().set(5);
    c.at(-1).unwrap().set(6.0);

    assert_eq!(c.count(), 2);
    assert_eq!(c.at(0).unwrap().get_as::<i32>().unwrap(), 5);
    assert_eq!(c.at(1).unwrap().get_as::<f64>().unwrap(), 6.0);
}

#[test]
fn test_pop_back_and_empty_error() {
    let entry = Node::new();
    let arr = entry.insert("xs").unwrap();
    arr.push_back().unwrap().set(1);

    let popped = arr.pop_back().unwrap();
    assert_eq!(popped.get_as::<i32>().unwrap(), 1);

    let err = arr.pop_back().unwrap_err();
    assert!(matches!(
        err,
        hdata::Error::Node(hdata::node::NodeError::EmptyContainer { .. })
    ));
}

#[test]
fn test_children_cursor_over_containers() {
    let entry = Node::new();
    let arr = entry.insert("xs").unwrap();
    for i in 0..5 {
        arr.push_back().unwrap().set(i);
    }

    // Lazy mapped traversal without materializing the values.
    let doubled: Vec<i64> = arr
        .children()
        .map(|node| node.get_as::<i64>().unwrap() * 2)
        .collect();
    assert_eq!(doubled, vec![0, 2, 4, 6, 8]);

    let mut kv = entry.kv_items();
    let (key, value) = kv.advance().unwrap();
    assert_eq!(key, "xs");
    assert_eq!(value.count(), 5);
    assert!(kv.done());
}

#[test]
fn test_display_is_indented() {
    let entry = Node::from_json(&serde_json::json!({
        "B": {"b": 1},
        "C": [1, 2],
    }));

    let rendered = entry.to_string();
    assert!(rendered.contains("\"b\": 1"));
    // Nested entries are indented deeper than top-level ones.
    let b_indent = rendered
        .lines()
        .find(|line| line.contains("\"b\""))
        .unwrap()
        .chars()
        .take_while(|c| *c == ' ')
        .count();
    let top_indent = rendered
        .lines()
        .find(|line| line.contains("\"B\""))
        .unwrap()
        .chars()
        .take_while(|c| *c == ' ')
        .count();
    assert!(b_indent > top_indent);
}
