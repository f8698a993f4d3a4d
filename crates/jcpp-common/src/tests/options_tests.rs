use crate::options::TranslateOptions;
use std::io::Write;

#[test]
fn empty_document_yields_defaults() {
    let options = TranslateOptions::from_json_str("{}").unwrap();
    assert_eq!(options, TranslateOptions::default());
    assert_eq!(options.indent_unit(), "    ");
}

#[test]
fn camel_case_keys_and_string_booleans() {
    let options = TranslateOptions::from_json_str(
        r#"{ "indentWidth": 2, "markOuterFields": "false", "extraContainerTypes": ["Deque"] }"#,
    )
    .unwrap();
    assert_eq!(options.indent_width, 2);
    assert!(!options.mark_outer_fields);
    assert_eq!(options.extra_container_types, vec!["Deque".to_string()]);
    assert_eq!(options.null_literal, "nullptr");
}

#[test]
fn invalid_boolean_is_rejected() {
    let err = TranslateOptions::from_json_str(r#"{ "smartHandleGet": "maybe" }"#).unwrap_err();
    assert!(err.to_string().contains("invalid boolean value"));
}

#[test]
fn options_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "nullLiteral": "NULL" }}"#).unwrap();
    let options = TranslateOptions::from_path(file.path()).unwrap();
    assert_eq!(options.null_literal, "NULL");
}
