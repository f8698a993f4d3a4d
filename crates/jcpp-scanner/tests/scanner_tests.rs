//! Position scanner behavior on whole statements.

use jcpp_scanner::{Ledger, OPERATORS, OpKind, Tag, scan};

fn operators(ledger: &Ledger) -> Vec<(usize, OpKind)> {
    ledger.operator_heads(0, ledger.len()).collect()
}

fn kinds(text: &str) -> Vec<OpKind> {
    operators(&scan(text)).into_iter().map(|(_, k)| k).collect()
}

#[test]
fn table_index_matches_kind() {
    for (idx, info) in OPERATORS.iter().enumerate() {
        assert_eq!(info.kind as usize, idx, "entry {}", info.text);
    }
}

#[test]
fn quoted_brackets_are_not_operators() {
    let text = r#"log("(unbalanced [" + x + ')' + "\")")"#;
    let ledger = scan(text);
    let ops = operators(&ledger);
    let kinds: Vec<OpKind> = ops.iter().map(|(_, k)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            OpKind::OpenParen,
            OpKind::Plus,
            OpKind::Plus,
            OpKind::Plus,
            OpKind::CloseParen
        ]
    );
    let quoted_space = text.find(" [").unwrap();
    assert_eq!(ledger.tag(quoted_space), Tag::Unresolved);
}

#[test]
fn double_equals_is_equality() {
    assert_eq!(kinds("a == b"), vec![OpKind::EqEq]);
    assert_eq!(kinds("a = b"), vec![OpKind::Assign]);
    assert_eq!(kinds("a <= b != c"), vec![OpKind::LtEq, OpKind::NotEq]);
    let ledger = scan("a == b");
    assert_eq!(ledger.tag(3), Tag::OperatorTail(OpKind::EqEq));
}

#[test]
fn type_arguments_become_name_text() {
    let text = "ArrayList<String> names = new ArrayList<String>();";
    assert_eq!(
        kinds(text),
        vec![OpKind::Assign, OpKind::OpenParen, OpKind::CloseParen]
    );
}

#[test]
fn nested_type_arguments_with_commas() {
    let text = "Map<String, List<Integer>> m = x";
    assert_eq!(kinds(text), vec![OpKind::Assign]);
}

#[test]
fn shifts_outside_type_arguments_stay_shifts() {
    assert_eq!(kinds("a >> b"), vec![OpKind::Shr]);
    assert_eq!(kinds("x = a >>> 2"), vec![OpKind::Assign, OpKind::UShr]);
    assert_eq!(kinds("x <<= a ^ b"), vec![OpKind::ShlAssign, OpKind::Caret]);
}

#[test]
fn lowercase_name_before_angle_is_a_comparison() {
    assert_eq!(
        kinds("ok = a < b || c > n"),
        vec![OpKind::Assign, OpKind::Lt, OpKind::BarBar, OpKind::Gt]
    );
}

#[test]
fn relational_pair_with_logic_between_stays_relational() {
    assert_eq!(
        kinds("a < b && c > d"),
        vec![OpKind::Lt, OpKind::AmpAmp, OpKind::Gt]
    );
}

#[test]
fn instanceof_needs_surrounding_spaces() {
    assert_eq!(kinds("x instanceof Foo"), vec![OpKind::Instanceof]);
    assert!(kinds("instanceofCount").is_empty());
}

#[test]
fn signs_and_decimal_points_stay_in_literals() {
    assert_eq!(kinds("x = -1"), vec![OpKind::Assign]);
    assert_eq!(kinds("x - 1"), vec![OpKind::Minus]);
    assert_eq!(kinds("x-1"), vec![OpKind::Minus]);
    assert_eq!(kinds("f(-2.5)"), vec![OpKind::OpenParen, OpKind::CloseParen]);
    assert_eq!(kinds("d = 1e-5"), vec![OpKind::Assign]);
    assert_eq!(kinds("a &1"), vec![OpKind::Amp]);
}

#[test]
fn empty_brackets_are_type_text_unless_initialized() {
    assert_eq!(kinds("int[] a"), Vec::<OpKind>::new());
    assert_eq!(
        kinds("new int[] {1, 2}"),
        vec![
            OpKind::OpenBracket,
            OpKind::CloseBracket,
            OpKind::OpenBrace,
            OpKind::Comma,
            OpKind::CloseBrace
        ]
    );
}

#[test]
fn compound_operators_prefer_longest_table_entry() {
    assert_eq!(
        kinds("i++ + --j"),
        vec![OpKind::Increment, OpKind::Plus, OpKind::Decrement]
    );
    assert_eq!(kinds("a += b"), vec![OpKind::PlusAssign]);
    assert_eq!(kinds("a || b | c"), vec![OpKind::BarBar, OpKind::Bar]);
}

#[test]
fn spaces_outside_literals_are_space() {
    let ledger = scan("a + b");
    assert_eq!(ledger.tag(1), Tag::Space);
    assert_eq!(ledger.trim(0, 5).len(), 5);
    assert_eq!(ledger.trim(1, 3).start, 2);
}
