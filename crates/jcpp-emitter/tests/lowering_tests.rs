//! Rewrites recorded by the lowering pass, observed through rendering.

use jcpp_common::TranslateOptions;
use jcpp_emitter::{TransformDirective, TranslationUnit, TypeCollector, UnseenTypeSet};
use jcpp_parser::{ClassSignature, CodeBody, MethodContext, Statement, parse_body};

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
                .with_method("getName", "String", 0),
        )
        .with_class(
            ClassSignature::new("Outer")
                .with_field("count", "int")
                .with_field("parent", "Outer"),
        )
}

fn parse(lines: &[&str]) -> CodeBody {
    parse_body(context(), TranslateOptions::default(), lines).unwrap()
}

/// Rendered body after an explicit translate.
fn render(lines: &[&str]) -> String {
    let body = parse(lines);
    let mut unit = TranslationUnit::new(&body);
    unit.translate(&mut UnseenTypeSet::new());
    unit.render(0)
}

fn reported(lines: &[&str]) -> Vec<String> {
    let body = parse(lines);
    let mut unit = TranslationUnit::new(&body);
    let mut types = UnseenTypeSet::new();
    unit.translate(&mut types);
    types.into_vec()
}

#[test]
fn null_comparison_on_container_is_an_emptiness_test() {
    let out = render(&["if (list == null) {", "return;", "}"]);
    assert_eq!(out, "if (list.size() == 0) {\n    return;\n}\n");
}

#[test]
fn negated_null_comparison_on_array() {
    assert_eq!(render(&["ok = values != null;"]), "ok = values.size() > 0;\n");
    assert_eq!(render(&["ok = null == list;"]), "ok = list.size() == 0;\n");
}

#[test]
fn null_comparison_on_object_stays_an_identity_test() {
    assert_eq!(render(&["ok = shape == null;"]), "ok = shape == nullptr;\n");
}

#[test]
fn primitive_concatenated_with_text_is_converted() {
    let out = render(&["int n = 3;", "String s = \"n=\" + n;"]);
    assert_eq!(out, "int n = 3;\nString s = \"n=\" + String::valueOf(n);\n");
    assert_eq!(render(&["name += 1;"]), "name += String::valueOf(1);\n");
    assert_eq!(
        render(&["String t = ready ? \"yes\" : 0;"]),
        "String t = ready ? \"yes\" : String::valueOf(0);\n"
    );
}

#[test]
fn type_test_helper_depends_on_operand() {
    assert_eq!(
        render(&["ok = shape instanceof Circle;"]),
        "ok = objIsType<Circle>(shape);\n"
    );
    assert_eq!(
        render(&["ok = this instanceof Circle;"]),
        "ok = ptrIsType<Circle>(this);\n"
    );
}

#[test]
fn null_and_empty_constructions_clear_values() {
    assert_eq!(render(&["list = null;"]), "list.clear();\n");
    assert_eq!(render(&["list = new ArrayList<Shape>();"]), "list.clear();\n");
    assert_eq!(render(&["name = null;"]), "name = \"\";\n");
    assert_eq!(render(&["name = new String();"]), "name = \"\";\n");
    assert_eq!(
        render(&["Map<String, Shape> index = new HashMap<String, Shape>();"]),
        "Map<String, Shape> index;\n"
    );
    assert_eq!(
        render(&["List<Shape> sized = new ArrayList<Shape>(10);"]),
        "List<Shape> sized;\n"
    );
}

#[test]
fn container_copy_becomes_bulk_copy() {
    assert_eq!(
        render(&["List<Shape> copy = new ArrayList<Shape>(list);"]),
        "List<Shape> copy; copy.addAll(list);\n"
    );
    assert_eq!(
        render(&["Map<String, Shape> m = new HashMap<String, Shape>(other);"]),
        "Map<String, Shape> m; m.putAll(other) /* manual review */;\n"
    );
    assert_eq!(
        render(&["list = new ArrayList<Shape>(other);"]),
        "list.clear(); list.addAll(other) /* manual review */;\n"
    );
}

#[test]
fn text_constructed_from_arguments() {
    assert_eq!(render(&["String s = new String(chars);"]), "String s(chars);\n");
    assert_eq!(render(&["name = new String(chars);"]), "name = String(chars);\n");
}

#[test]
fn array_constructions() {
    assert_eq!(
        render(&["int n = 4;", "int[] buf = new int[n];"]),
        "int n = 4;\nArray<int> buf(n);\n"
    );
    assert_eq!(
        render(&["int[][] grid = new int[3][4];"]),
        "Array<Array<int>> grid(3, 4);\n"
    );
    assert_eq!(
        render(&["int[] xs = new int[] {1, 2};"]),
        "Array<int> xs = {1, 2};\n"
    );
    assert_eq!(
        render(&["values = new int[8];"]),
        "/* auto generated */ Array<int> tempArray1(8);\nvalues = tempArray1;\n"
    );
}

#[test]
fn member_access_operator_follows_the_subject() {
    assert_eq!(render(&["shape.draw();"]), "shape->draw();\n");
    assert_eq!(render(&["n = name.length();"]), "n = name.length();\n");
    assert_eq!(render(&["this.count = 1;"]), "this->count = 1;\n");
    assert_eq!(render(&["m = Math.max(a, b);"]), "m = Math::max(a, b);\n");
}

#[test]
fn smart_handles_are_unwrapped_except_for_containers() {
    assert_eq!(render(&["paint(shape);"]), "paint(shape.get());\n");
    assert_eq!(render(&["canvas.paint(shape);"]), "canvas->paint(shape.get());\n");
    assert_eq!(render(&["list.add(shape);"]), "list.add(shape);\n");
}

#[test]
fn smart_handle_unwrapping_can_be_disabled() {
    let options = TranslateOptions {
        smart_handle_get: false,
        ..TranslateOptions::default()
    };
    let body = parse_body(context(), options, ["paint(shape);"]).unwrap();
    let unit = TranslationUnit::new(&body);
    assert_eq!(unit.render(0), "paint(shape);\n");
}

#[test]
fn outer_fields_are_marked() {
    assert_eq!(
        render(&["count = count + 1;"]),
        "/* outer */ count = /* outer */ count + 1;\n"
    );
    assert_eq!(render(&["label = \"x\";"]), "label = \"x\";\n");
}

#[test]
fn null_literal_spelling_comes_from_options() {
    assert_eq!(render(&["shape = null;"]), "shape = nullptr;\n");
    let options = TranslateOptions {
        null_literal: "NULL".to_string(),
        ..TranslateOptions::default()
    };
    let body = parse_body(context(), options, ["shape = null;"]).unwrap();
    assert_eq!(TranslationUnit::new(&body).render(0), "shape = NULL;\n");
}

#[test]
fn throw_rethrows_by_value() {
    assert_eq!(
        render(&["throw new IllegalStateException(\"bad\");"]),
        "throw IllegalStateException(\"bad\");\n"
    );
}

#[test]
fn casts_use_target_spelling() {
    assert_eq!(
        render(&["int k = (int) ratio;"]),
        "int k = static_cast<int>(ratio);\n"
    );
}

#[test]
fn referenced_types_are_reported_once() {
    let types = reported(&[
        "Circle c = (Circle) shape;",
        "Map<String, Widget> m = new HashMap<String, Widget>();",
        "Outer o = null;",
        "ok = shape instanceof Circle;",
        "m2 = Math.max(a, b);",
        "try {",
        "open();",
        "} catch (IOException e) {",
        "fail();",
        "}",
    ]);
    assert_eq!(types, vec!["Circle", "Widget", "Math", "IOException"]);
}

#[test]
fn lifted_type_names_are_not_reported() {
    let types = reported(&[
        "final int limit = 3;",
        "Runnable r = new Runnable() {",
        "public void run() { use(limit); }",
        "};",
    ]);
    assert_eq!(types, vec!["Runnable"]);
}

#[test]
fn collector_deduplicates() {
    let mut types = UnseenTypeSet::new();
    types.report_type("Widget");
    types.report_type("Gadget");
    types.report_type("Widget");
    assert_eq!(types.len(), 2);
    assert!(types.contains("Gadget"));
    assert_eq!(types.iter().collect::<Vec<_>>(), vec!["Widget", "Gadget"]);
}

#[test]
fn translate_is_idempotent() {
    let body = parse(&[
        "List<Shape> copy = new ArrayList<Shape>(list);",
        "values = new int[8];",
        "if (list == null) {",
        "paint(shape);",
        "}",
    ]);
    let mut unit = TranslationUnit::new(&body);
    let mut types = UnseenTypeSet::new();
    unit.translate(&mut types);
    let first = unit.render(0);
    let reported = types.len();
    unit.translate(&mut types);
    assert_eq!(unit.render(0), first);
    assert_eq!(unit.render(0), first);
    assert_eq!(types.len(), reported);
}

#[test]
fn emptiness_directive_is_recorded_on_the_comparison() {
    let body = parse(&["ok = list == null;"]);
    let mut unit = TranslationUnit::new(&body);
    unit.translate(&mut UnseenTypeSet::new());
    let Statement::Expression(stmt) = body.paragraph(body.root()).items[0] else {
        panic!("expected a statement");
    };
    let jcpp_parser::NodeKind::Assignment(assignment) = &body.node(stmt).kind else {
        panic!("expected an assignment");
    };
    let transforms = unit.transforms().unwrap();
    assert!(matches!(
        transforms.get(assignment.value),
        [TransformDirective::EmptinessTest { negated: false, .. }]
    ));
}

#[test]
fn unstructured_text_is_flagged_for_review() {
    let body = parse(&["x = (a) b;"]);
    let out = TranslationUnit::new(&body).render(0);
    assert!(out.contains("/* manual review */"), "{out}");
}

fn render_mixed(lines: &[&str]) -> (String, Vec<String>) {
    let context = MethodContext::named("mix")
        .with_parameter("s", "String")
        .with_parameter("a", "int")
        .with_parameter("b", "int");
    let body = parse_body(context, TranslateOptions::default(), lines).unwrap();
    let mut unit = TranslationUnit::new(&body);
    let mut types = UnseenTypeSet::new();
    unit.translate(&mut types);
    (unit.render(0), types.into_vec())
}

#[test]
fn xor_keeps_operands_and_scope_intact() {
    let (out, types) = render_mixed(&["h = a ^ b;", "s = s + b;"]);
    assert_eq!(out, "h = a ^ b;\ns = s + String::valueOf(b);\n");
    assert!(types.is_empty(), "{types:?}");
}

#[test]
fn shifts_render_as_target_operators() {
    let (out, _) = render_mixed(&["h = a << 2;", "h = a >> b;", "a <<= 1;"]);
    assert_eq!(out, "h = a << 2;\nh = a >> b;\na <<= 1;\n");
}

#[test]
fn unsigned_shift_is_left_for_review() {
    let (out, _) = render_mixed(&["h = a >>> 2;", "a >>>= b;"]);
    assert_eq!(
        out,
        "h = /* manual review */ a >>> 2;\n/* manual review */ a >>>= b;\n"
    );
}

#[test]
fn foreign_operand_sequence_is_marked_not_declared() {
    let (out, types) = render_mixed(&["h = a ~ b;", "s = s + b;"]);
    assert!(out.starts_with("h = /* manual review */ a ~ b;\n"), "{out}");
    assert!(out.ends_with("s = s + String::valueOf(b);\n"), "{out}");
    assert!(types.is_empty(), "{types:?}");
}

#[test]
fn array_construction_as_a_value_is_built_inline() {
    assert_eq!(
        render(&["g(new Shape[] {shape, shape});"]),
        "g(Array<sp<Shape>>({shape, shape}));\n"
    );
    assert_eq!(render(&["n = new int[4].length;"]), "n = Array<int>(4).length;\n");
}

#[test]
fn container_copied_from_itself_is_not_cleared() {
    let out = render(&["list = new ArrayList<Shape>(list);"]);
    assert_eq!(out, "/* manual review */ list = new ArrayList<Shape>(list);\n");
    assert!(!out.contains("clear()"));
}
