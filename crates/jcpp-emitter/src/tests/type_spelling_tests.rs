use crate::source_writer::SourceWriter;
use crate::transform_context::{TransformContext, TransformDirective};
use crate::type_spelling::{spell_plain, spell_type};
use jcpp_parser::NodeIndex;

#[test]
fn primitives_map_to_target_names() {
    assert_eq!(spell_type("boolean", &[]), "bool");
    assert_eq!(spell_type("long", &[]), "int64_t");
    assert_eq!(spell_type("byte", &[]), "char");
    assert_eq!(spell_type("int", &[]), "int");
}

#[test]
fn arrays_wrap_per_dimension() {
    assert_eq!(spell_type("int[]", &[]), "Array<int>");
    assert_eq!(spell_type("String[][]", &[]), "Array<Array<String>>");
    assert_eq!(spell_type("Shape[]", &[]), "Array<sp<Shape>>");
}

#[test]
fn objects_become_smart_handles() {
    assert_eq!(spell_type("Shape", &[]), "sp<Shape>");
    assert_eq!(spell_type("Map.Entry<K, V>", &[]), "sp<Map::Entry<K, V>>");
}

#[test]
fn containers_and_text_keep_their_spelling() {
    assert_eq!(spell_type("String", &[]), "String");
    assert_eq!(spell_type("ArrayList<Shape>", &[]), "ArrayList<Shape>");
    let extra = vec!["Bag".to_string()];
    assert_eq!(spell_type("Bag<Shape>", &extra), "Bag<Shape>");
    assert_eq!(spell_type("Bag<Shape>", &[]), "sp<Bag<Shape>>");
}

#[test]
fn plain_spelling_has_no_handle() {
    assert_eq!(spell_plain("Shape"), "Shape");
    assert_eq!(spell_plain("java.io.IOException"), "java::io::IOException");
    assert_eq!(spell_plain("long"), "int64_t");
}

#[test]
fn writer_indents_at_line_start_only() {
    let mut writer = SourceWriter::new("  ", 1);
    writer.write("a");
    writer.write("b");
    writer.write_line();
    writer.increase_indent();
    writer.line("c;");
    writer.decrease_indent();
    writer.decrease_indent();
    writer.decrease_indent();
    writer.line("}");
    assert_eq!(writer.indent_level(), 0);
    assert_eq!(writer.finish(), "  ab\n    c;\n}\n");
}

#[test]
fn context_keeps_insertion_order_without_duplicates() {
    let mut context = TransformContext::new();
    let node = NodeIndex(3);
    context.insert(node, TransformDirective::OuterField);
    context.insert(node, TransformDirective::SmartHandleGet);
    context.insert(node, TransformDirective::OuterField);
    assert_eq!(
        context.get(node),
        &[TransformDirective::OuterField, TransformDirective::SmartHandleGet]
    );
    assert!(context.get(NodeIndex(4)).is_empty());
    assert_eq!(context.len(), 1);
    context.clear();
    assert!(context.is_empty());
}
