//! Value categories and scope lookups against the method context.

use jcpp_common::{TranslateOptions, ValueCategory};
use jcpp_parser::{
    ClassSignature, CodeBody, MethodContext, NodeIndex, NodeKind, Statement, VariableFlags,
    parse_body,
};

fn context() -> MethodContext {
    MethodContext::named("update")
        .with_parameter("shape", "Shape")
        .with_parameter("name", "String")
        .with_parameter("values", "int[]")
        .with_parameter("items", "String[]")
        .with_parameter("list", "ArrayList<Shape>")
        .with_class(
            ClassSignature::new("Inner")
                .with_field("label", "String")
                .with_method("getName", "String", 0)
                .with_method("size", "int", 0),
        )
        .with_class(ClassSignature::new("Outer").with_field("count", "int").with_field("parent", "Outer"))
}

/// Category of `expr` as the right side of an assignment.
fn category(expr: &str) -> ValueCategory {
    let line = format!("x = {expr};");
    let body = parse_body(context(), TranslateOptions::default(), [line.as_str()]).unwrap();
    let value = assigned_value(&body);
    body.value_category(value)
}

fn assigned_value(body: &CodeBody) -> NodeIndex {
    let Statement::Expression(stmt) = body.paragraph(body.root()).items[0] else {
        panic!("expected a statement");
    };
    match &body.node(stmt).kind {
        NodeKind::Assignment(data) => data.value,
        other => panic!("expected assignment, got {}", other.name()),
    }
}

#[test]
fn literals() {
    assert_eq!(category("\"text\""), ValueCategory::Text);
    assert_eq!(category("'c'"), ValueCategory::Primitive);
    assert_eq!(category("42"), ValueCategory::Primitive);
    assert_eq!(category("true"), ValueCategory::Primitive);
    assert_eq!(category("null"), ValueCategory::CommonExpression);
    assert_eq!(category("this"), ValueCategory::ThisReference);
}

#[test]
fn variables_and_fields() {
    assert_eq!(category("shape"), ValueCategory::OwnedValue);
    assert_eq!(category("name"), ValueCategory::Text);
    assert_eq!(category("values"), ValueCategory::Array);
    assert_eq!(category("list"), ValueCategory::Container);
    assert_eq!(category("count"), ValueCategory::Primitive);
    assert_eq!(category("Math"), ValueCategory::None);
}

#[test]
fn operators() {
    assert_eq!(category("\"a\" + count"), ValueCategory::Text);
    assert_eq!(category("count + 1"), ValueCategory::Primitive);
    assert_eq!(category("count == 1"), ValueCategory::Primitive);
    assert_eq!(category("shape instanceof Circle"), ValueCategory::Primitive);
    assert_eq!(category("count > 0 ? name : label"), ValueCategory::Text);
    assert_eq!(category("(name)"), ValueCategory::Text);
}

#[test]
fn constructions_and_casts() {
    assert_eq!(category("new Circle(1)"), ValueCategory::RawPointer);
    assert_eq!(category("new int[4]"), ValueCategory::Array);
    assert_eq!(category("(String) shape"), ValueCategory::Text);
    assert_eq!(category("(int) 2.5"), ValueCategory::Primitive);
}

#[test]
fn member_access_through_class_signatures() {
    assert_eq!(category("this.label"), ValueCategory::Text);
    assert_eq!(category("getName()"), ValueCategory::Text);
    assert_eq!(category("this.size()"), ValueCategory::Primitive);
    assert_eq!(category("Outer.this.count"), ValueCategory::Primitive);
    assert_eq!(category("parent.count"), ValueCategory::Primitive);
}

#[test]
fn member_access_through_known_apis() {
    assert_eq!(category("values.length"), ValueCategory::Primitive);
    assert_eq!(category("name.trim()"), ValueCategory::Text);
    assert_eq!(category("name.length()"), ValueCategory::Primitive);
    assert_eq!(category("list.size()"), ValueCategory::Primitive);
    assert_eq!(category("list.get(0)"), ValueCategory::CommonExpression);
    assert_eq!(category("shape.toString()"), ValueCategory::Text);
    assert_eq!(category("String.valueOf(count)"), ValueCategory::Text);
}

#[test]
fn indexing_yields_element_category() {
    assert_eq!(category("items[0]"), ValueCategory::Text);
    assert_eq!(category("values[count]"), ValueCategory::Primitive);
}

#[test]
fn field_lookup_flags() {
    let body = parse_body(context(), TranslateOptions::default(), ["x = 1;"]).unwrap();
    let label = body.lookup(body.root(), "label").unwrap();
    assert!(label.flags.contains(VariableFlags::FIELD | VariableFlags::OUTSIDE_BLOCK));
    assert!(!label.is_outer_field());
    let count = body.lookup(body.root(), "count").unwrap();
    assert!(count.is_outer_field());
    assert!(body.lookup(body.root(), "missing").is_none());
    // cached misses stay misses
    assert!(body.lookup(body.root(), "missing").is_none());
}

#[test]
fn locals_shadow_fields() {
    let body = parse_body(context(), TranslateOptions::default(), ["Shape label = shape;", "x = label;"]).unwrap();
    let label = body.lookup(body.root(), "label").unwrap();
    assert_eq!(label.category, ValueCategory::OwnedValue);
    assert!(!label.flags.contains(VariableFlags::FIELD));
}

#[test]
fn declared_types() {
    let body = parse_body(context(), TranslateOptions::default(), ["x = items[0];"]).unwrap();
    let value = assigned_value(&body);
    assert_eq!(body.declared_type(value).as_deref(), Some("String"));
}

#[test]
fn return_of_owned_value_is_flagged() {
    let body = parse_body(context(), TranslateOptions::default(), ["return shape;"]).unwrap();
    assert!(body.returns_smart_handle());
    let body = parse_body(context(), TranslateOptions::default(), ["return count;"]).unwrap();
    assert!(!body.returns_smart_handle());
}

#[test]
fn later_locals_do_not_shadow_earlier_uses() {
    let body = parse_body(context(), TranslateOptions::default(), ["x = label;", "int label = 3;", "y = label;"])
        .unwrap();
    let values: Vec<NodeIndex> = body
        .paragraph(body.root())
        .items
        .iter()
        .filter_map(|item| match item {
            Statement::Expression(node) => match &body.node(*node).kind {
                NodeKind::Assignment(data) => Some(data.value),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(body.value_category(values[0]), ValueCategory::Text);
    assert_eq!(body.value_category(values[1]), ValueCategory::Primitive);
    assert_eq!(body.value_category(values[2]), ValueCategory::Primitive);
    let earlier = body.lookup_at(values[0], "label").unwrap();
    assert!(earlier.flags.contains(VariableFlags::FIELD));
}

#[test]
fn comma_declarations_see_each_other() {
    let body = parse_body(context(), TranslateOptions::default(), ["String a = name, b, c = b;"]).unwrap();
    let Statement::Expression(stmt) = body.paragraph(body.root()).items[0] else {
        panic!("expected a statement");
    };
    let last = *body.arena().children(stmt).last().unwrap();
    let NodeKind::Assignment(data) = &body.node(last).kind else {
        panic!("expected the last comma item to be an assignment");
    };
    assert_eq!(body.value_category(data.value), ValueCategory::Text);
}
