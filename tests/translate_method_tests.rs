//! End-to-end translation of whole method bodies.

use jcpp::tracing_config::{LogFormat, init_tracing};
use jcpp::{
    ClassSignature, MethodContext, TranslateError, TranslateOptions, ValueCategory,
    translate_from_json, translate_method_body,
};
use std::io::Write;

fn context() -> MethodContext {
    MethodContext::named("refresh")
        .with_parameter("items", "ArrayList<Shape>")
        .with_parameter("title", "String")
        .with_class(ClassSignature::new("Panel").with_field("count", "int"))
}

#[test]
fn translates_a_method_body() {
    let lines = [
        "int total = 0;",
        "for (Shape s : items) {",
        "    if (s == null) continue;",
        "    total += s.area();",
        "}",
        "if (items == null) {",
        "    title = \"empty\";",
        "} else {",
        "    title = \"total: \" + total;",
        "}",
        "Widget w = new Widget(title);",
        "return w;",
    ];
    let translation = translate_method_body(context(), lines, TranslateOptions::default()).unwrap();
    assert_eq!(
        translation.code,
        concat!(
            "int total = 0;\n",
            "for (auto& s : items) {\n",
            "    if (s == nullptr) {\n",
            "        continue;\n",
            "    }\n",
            "    total += s->area();\n",
            "}\n",
            "if (items.size() == 0) {\n",
            "    title = \"empty\";\n",
            "} else {\n",
            "    title = \"total: \" + String::valueOf(total);\n",
            "}\n",
            "sp<Widget> w = new Widget(title);\n",
            "return w;\n",
        )
    );
    assert_eq!(translation.unseen_types, vec!["Shape", "Widget"]);
    assert!(translation.returns_smart_handle);
    assert!(translation.lifted_types.is_empty());
    assert!(
        translation
            .categories
            .contains(&("w".to_string(), ValueCategory::OwnedValue))
    );
}

#[test]
fn errors_name_the_method() {
    let err = translate_method_body(
        context(),
        ["if (ready) {", "go();"],
        TranslateOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("refresh"), "{err}");
    assert!(matches!(
        err.downcast_ref::<TranslateError>(),
        Some(TranslateError::UnterminatedInput { .. })
    ));
}

#[test]
fn malformed_statement_is_fatal() {
    let err = translate_method_body(context(), ["x = (a + b;"], TranslateOptions::default())
        .unwrap_err();
    let cause = err.downcast_ref::<TranslateError>().unwrap();
    assert!(cause.is_fatal());
}

#[test]
fn lifted_types_are_rendered_alongside() {
    let lines = [
        "final int limit = 2;",
        "Runnable r = new Runnable() {",
        "    public void run() { check(limit); }",
        "};",
    ];
    let translation = translate_method_body(context(), lines, TranslateOptions::default()).unwrap();
    assert_eq!(translation.lifted_types.len(), 1);
    assert!(translation.lifted_types[0].starts_with("class Anonymous_Runnable : public Runnable {"));
    assert!(translation.code.contains("new Anonymous_Runnable(limit)"));
}

#[test]
fn json_inputs() {
    let context = r#"{
        "name": "apply",
        "parameters": [{ "name": "names", "typeName": "List<String>" }],
        "classes": []
    }"#;
    let options = r#"{ "indentWidth": 2, "markOuterFields": "false" }"#;
    let translation =
        translate_from_json(context, "if (names != null) {\nnames.clear();\n}", Some(options)).unwrap();
    assert_eq!(translation.code, "if (names.size() > 0) {\n  names.clear();\n}\n");

    let json = translation.to_json().unwrap();
    assert!(json.contains("\"returnsSmartHandle\": false"), "{json}");

    let err = translate_from_json("{ not json", "", None).unwrap_err();
    assert!(err.to_string().contains("method context"), "{err}");
}

#[test]
fn options_load_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "nullLiteral": "NULL", "toTextHelper": "toText" }}"#).unwrap();
    let options = TranslateOptions::from_path(file.path()).unwrap();
    let translation = translate_method_body(
        context(),
        ["Shape s = null;", "title = title + 1;"],
        options,
    )
    .unwrap();
    assert_eq!(translation.code, "sp<Shape> s = NULL;\ntitle = title + toText(1);\n");
}

#[test]
fn log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::parse("fancy"), LogFormat::Text);
}

#[test]
fn tracing_is_off_without_environment() {
    if std::env::var_os("JCPP_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        assert!(!init_tracing());
    }
}
