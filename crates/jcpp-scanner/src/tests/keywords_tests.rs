use crate::keywords::*;

#[test]
fn keywords_need_a_word_boundary() {
    assert_eq!(leading_keyword("if (a)"), Some(Keyword::If));
    assert_eq!(leading_keyword("if(a)"), Some(Keyword::If));
    assert_eq!(leading_keyword("iffy = 1;"), None);
    assert_eq!(leading_keyword("do {"), Some(Keyword::Do));
    assert_eq!(leading_keyword("double d;"), None);
    assert_eq!(leading_keyword("return;"), Some(Keyword::Return));
}

#[test]
fn labels_are_recognized() {
    assert_eq!(leading_label("outer: for (;;)"), Some(("outer", 6)));
    assert_eq!(leading_label("outer : while (x)"), Some(("outer", 7)));
    assert_eq!(leading_label("default:"), None);
    assert_eq!(leading_label("a ? b : c;"), None);
    assert_eq!(leading_label("Foo::bar"), None);
}

#[test]
fn starts_with_word_checks_boundary() {
    assert!(starts_with_word("else {", "else"));
    assert!(!starts_with_word("elsewhere", "else"));
    assert!(starts_with_word("else", "else"));
}
