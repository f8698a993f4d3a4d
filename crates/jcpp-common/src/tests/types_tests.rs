use crate::types::*;

#[test]
fn classify_primitives_text_and_arrays() {
    assert_eq!(classify_type("int", &[]), ValueCategory::Primitive);
    assert_eq!(classify_type("boolean", &[]), ValueCategory::Primitive);
    assert_eq!(classify_type("String", &[]), ValueCategory::Text);
    assert_eq!(classify_type("int[]", &[]), ValueCategory::Array);
    assert_eq!(classify_type("String[][]", &[]), ValueCategory::Array);
    assert_eq!(classify_type("Object...", &[]), ValueCategory::Array);
}

#[test]
fn classify_containers_by_generic_base() {
    assert_eq!(classify_type("ArrayList<String>", &[]), ValueCategory::Container);
    assert_eq!(
        classify_type("HashMap<String, List<Integer>>", &[]),
        ValueCategory::Container
    );
    assert_eq!(classify_type("Widget", &[]), ValueCategory::OwnedValue);
}

#[test]
fn extra_container_names_are_honoured() {
    let extra = vec!["Deque".to_string()];
    assert_eq!(classify_type("Deque<Foo>", &extra), ValueCategory::Container);
    assert_eq!(classify_type("Deque<Foo>", &[]), ValueCategory::OwnedValue);
}

#[test]
fn generic_arguments_split_at_depth_one() {
    assert_eq!(
        generic_arguments("Map<String, List<Foo>>"),
        vec!["String", "List<Foo>"]
    );
    assert!(generic_arguments("Foo").is_empty());
}

#[test]
fn strip_array_counts_dimensions() {
    assert_eq!(strip_array("int[][]"), ("int", 2));
    assert_eq!(strip_array("int [ ]"), ("int", 1));
    assert_eq!(strip_array("Foo"), ("Foo", 0));
}

#[test]
fn target_primitive_mapping() {
    assert_eq!(target_primitive("long"), Some("int64_t"));
    assert_eq!(target_primitive("boolean"), Some("bool"));
    assert_eq!(target_primitive("byte"), Some("char"));
    assert_eq!(target_primitive("Foo"), None);
}

#[test]
fn literal_tokens_classify_without_lookup() {
    assert_eq!(literal_category("\"a\""), Some(ValueCategory::Text));
    assert_eq!(literal_category("'c'"), Some(ValueCategory::Primitive));
    assert_eq!(literal_category("42"), Some(ValueCategory::Primitive));
    assert_eq!(literal_category("-1.5f"), Some(ValueCategory::Primitive));
    assert_eq!(literal_category("true"), Some(ValueCategory::Primitive));
    assert_eq!(literal_category("this"), Some(ValueCategory::ThisReference));
    assert_eq!(literal_category("count"), None);
}

#[test]
fn reportable_types_skip_builtins() {
    assert!(is_reportable_type("Widget"));
    assert!(is_reportable_type("List<Widget>"));
    assert!(!is_reportable_type("int[]"));
    assert!(!is_reportable_type("String"));
    assert!(!is_reportable_type("void"));
}

#[test]
fn pointer_like_categories() {
    assert!(ValueCategory::ThisReference.is_pointer_like());
    assert!(ValueCategory::OwnedValue.is_pointer_like());
    assert!(!ValueCategory::Container.is_pointer_like());
    assert!(ValueCategory::Text.is_value_collection());
}
