//! Anonymous class bodies lifted into named types.

use jcpp_common::{TranslateOptions, ValueCategory};
use jcpp_parser::{CodeBody, LiftedId, MethodContext, NodeKind, parse_body};

fn parse(lines: &[&str]) -> CodeBody {
    parse_body(MethodContext::named("start"), TranslateOptions::default(), lines).unwrap()
}

#[test]
fn anonymous_class_is_lifted_with_captures() {
    let body = parse(&[
        "final int limit = 3;",
        "final String tag = \"t\";",
        "int other = 1;",
        "Runnable r = new Runnable() {",
        "    public void run() { use(limit, other); }",
        "};",
    ]);
    let lifted = body.lifted_types();
    assert_eq!(lifted.len(), 1);
    let lifted_type = &lifted[0];
    assert_eq!(lifted_type.name, "Anonymous_Runnable");
    assert_eq!(lifted_type.base_type, "Runnable");
    assert!(lifted_type.body.starts_with('{') && lifted_type.body.ends_with('}'));
    let captured: Vec<&str> = lifted_type.captures.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(captured, vec!["limit"]);
    assert_eq!(lifted_type.captures[0].category, ValueCategory::Primitive);

    let NodeKind::MethodCall(call) = &body.node(lifted_type.site).kind else {
        panic!("site is not a call");
    };
    assert_eq!(call.lifted, Some(LiftedId(0)));
    assert_eq!(body.node(call.callee).construction_type(), Some("Runnable"));
}

#[test]
fn repeated_base_types_get_numbered_names() {
    let body = parse(&[
        "a = new Listener() { void on() {} };",
        "b = new Listener() { void on() {} };",
    ]);
    let names: Vec<&str> = body.lifted_types().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Anonymous_Listener", "Anonymous_Listener_2"]);
}

#[test]
fn generic_and_qualified_bases_are_flattened() {
    let body = parse(&["c = new java.util.Comparator<String>() { public int compare(String a, String b) { return 0; } };"]);
    assert_eq!(body.lifted_types()[0].name, "Anonymous_java_util_Comparator");
}

#[test]
fn captures_are_ordered_outermost_first() {
    let body = parse(&[
        "final int a = 1;",
        "{",
        "final int b = 2;",
        "task = new Task() { void run() { f(b, a); } };",
        "}",
    ]);
    let captured: Vec<&str> = body.lifted_types()[0]
        .captures
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(captured, vec!["a", "b"]);
}

#[test]
fn anonymous_class_as_argument() {
    let body = parse(&["button.setListener(new Listener() {", "void on() { }", "});"]);
    assert_eq!(body.lifted_types().len(), 1);
    assert_eq!(body.anonymous_sites().len(), 1);
    assert_eq!(body.anonymous_sites()[0].base_type, "Listener");
}
