//! Precedence resolution of single statements.

use jcpp_common::{TranslateError, TranslateOptions, ValueCategory};
use jcpp_parser::{CodeBody, MethodContext, NodeIndex, NodeKind, Statement, parse_body};

fn parse(lines: &[&str]) -> CodeBody {
    parse_body(MethodContext::named("test"), TranslateOptions::default(), lines).unwrap()
}

fn parse_err(lines: &[&str]) -> TranslateError {
    match parse_body(MethodContext::named("test"), TranslateOptions::default(), lines) {
        Ok(_) => panic!("expected an error for {lines:?}"),
        Err(err) => err,
    }
}

fn statement(body: &CodeBody, idx: usize) -> NodeIndex {
    match body.paragraph(body.root()).items[idx] {
        Statement::Expression(node) => node,
        other => panic!("statement {idx} is {other:?}"),
    }
}

fn describe(line: &str) -> String {
    let body = parse(&[line]);
    body.describe(statement(&body, 0))
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(describe("x = a + b * c;"), "=(x, +(a, *(b, c)))");
}

#[test]
fn same_level_operators_associate_left() {
    assert_eq!(describe("r = a - b - c;"), "=(r, -(-(a, b), c))");
    assert_eq!(describe("r = a / b * c;"), "=(r, *(/(a, b), c))");
}

#[test]
fn logical_and_binds_tighter_than_or() {
    assert_eq!(describe("ok = a && b || c;"), "=(ok, ||(&&(a, b), c))");
    assert_eq!(describe("ok = a || b && c;"), "=(ok, ||(a, &&(b, c)))");
}

#[test]
fn prefix_minus_is_unary() {
    assert_eq!(describe("y = -x * 2;"), "=(y, *(-(x), 2))");
}

#[test]
fn negative_literal_stays_a_literal() {
    assert_eq!(describe("y = x - -1;"), "=(y, -(x, -1))");
}

#[test]
fn postfix_and_negation() {
    assert_eq!(describe("i++;"), "post++(i)");
    assert_eq!(describe("done = !ready;"), "=(done, !(ready))");
}

#[test]
fn conditional_pairs_branches() {
    assert_eq!(describe("v = a > b ? a : b;"), "=(v, ?(>(a, b), :(a, b)))");
}

#[test]
fn nested_conditionals_pair_inner_first() {
    assert_eq!(
        describe("v = a ? b ? 1 : 2 : 3;"),
        "=(v, ?(a, :(?(b, :(1, 2)), 3)))"
    );
}

#[test]
fn method_call_arguments_are_flattened() {
    assert_eq!(describe("foo(a, b + 1);"), "call(foo, a, +(b, 1))");
    assert_eq!(describe("foo();"), "call(foo)");
}

#[test]
fn member_call_is_an_invocation() {
    assert_eq!(describe("list.add(x);"), ".(list, call(add, x))");
    assert_eq!(describe("a.b.c = 1;"), "=(.(.(a, b), c), 1)");
}

#[test]
fn instanceof_takes_a_type_name() {
    assert_eq!(
        describe("ok = shape instanceof Circle;"),
        "=(ok, instanceof(shape, Circle))"
    );
}

#[test]
fn cast_extends_over_index() {
    assert_eq!(
        describe("Foo f = (Foo) items[0];"),
        "=(decl(Foo f), cast<Foo>(index(items, 0)))"
    );
}

#[test]
fn cast_extends_over_member_chain() {
    assert_eq!(
        describe("n = (Node) holder.next;"),
        "=(n, cast<Node>(.(holder, next)))"
    );
}

#[test]
fn lowercase_parenthesized_expression_is_grouping() {
    assert_eq!(describe("y = (a + b) * c;"), "=(y, *(paren(+(a, b)), c))");
}

#[test]
fn array_construction_collects_dimensions() {
    assert_eq!(
        describe("int[][] grid = new int[3][4];"),
        "=(decl(int[][] grid), index(new int, 3, 4))"
    );
}

#[test]
fn array_initializer_is_attached() {
    assert_eq!(
        describe("int[] xs = new int[] {1, 2};"),
        "=(decl(int[] xs), index(new int, _, brace(1, 2)))"
    );
}

#[test]
fn generic_declaration_registers_a_container() {
    let body = parse(&["List<String> names = new ArrayList<String>();"]);
    let stmt = statement(&body, 0);
    assert_eq!(
        body.describe(stmt),
        "=(decl(List<String> names), call(new ArrayList<String>))"
    );
    let names: Vec<_> = body.declarations().collect();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].name, "names");
    assert_eq!(names[0].category, ValueCategory::Container);
    assert_eq!(body.value_category(stmt), ValueCategory::Container);
}

#[test]
fn qualified_declaration_type() {
    let body = parse(&["Map.Entry<String, Integer> e = null;"]);
    let variable = body.declarations().next().unwrap();
    assert_eq!(variable.name, "e");
    assert_eq!(variable.type_name, "Map.Entry<String, Integer>");
    assert_eq!(variable.category, ValueCategory::OwnedValue);
}

#[test]
fn modifiers_and_array_suffix_on_name() {
    let body = parse(&["final String parts[] = split(line);"]);
    let variable = body.declarations().next().unwrap();
    assert_eq!(variable.type_name, "String[]");
    assert!(variable.is_final());
    assert_eq!(variable.category, ValueCategory::Array);
}

#[test]
fn comma_declarations_share_the_type() {
    let body = parse(&["int a = 1, b, c = 2;"]);
    let declared: Vec<(String, String)> = body
        .declarations()
        .map(|v| (v.name.clone(), v.type_name.clone()))
        .collect();
    assert_eq!(
        declared,
        vec![
            ("a".to_string(), "int".to_string()),
            ("b".to_string(), "int".to_string()),
            ("c".to_string(), "int".to_string()),
        ]
    );
}

#[test]
fn multi_line_statement_resolves_like_one_line() {
    let split = parse(&["foo(a,", "b);"]);
    let joined = parse(&["foo(a, b);"]);
    let split_stmt = statement(&split, 0);
    let joined_stmt = statement(&joined, 0);
    assert_eq!(split.describe(split_stmt), joined.describe(joined_stmt));
    let (NodeKind::MethodCall(a), NodeKind::MethodCall(b)) =
        (&split.node(split_stmt).kind, &joined.node(joined_stmt).kind)
    else {
        panic!("expected method calls");
    };
    assert_eq!(a.args.len(), b.args.len());
    assert_eq!(a.args.len(), 2);
}

#[test]
fn deep_parenthesis_nesting() {
    let depth = 300;
    let line = format!("x = {}a{};", "(".repeat(depth), ")".repeat(depth));
    let body = parse(&[line.as_str()]);
    let stmt = statement(&body, 0);
    let NodeKind::Assignment(assignment) = &body.node(stmt).kind else {
        panic!("expected assignment");
    };
    let mut levels = 0;
    let mut current = assignment.value;
    while let NodeKind::Bracket(data) = &body.node(current).kind {
        levels += 1;
        current = data.items[0];
    }
    assert_eq!(levels, depth);
    assert_eq!(body.node(current).text, "a");
    assert!(body.stats().max_depth >= 2);
}

#[test]
fn missing_colon_is_reported() {
    assert!(matches!(
        parse_err(&["x = a ? b;"]),
        TranslateError::MissingClause { keyword: "?", .. }
    ));
}

#[test]
fn malformed_declaration_is_reported() {
    assert!(matches!(
        parse_err(&["int 5x;"]),
        TranslateError::MalformedDeclaration { .. }
    ));
}

#[test]
fn stray_close_is_reported() {
    assert!(matches!(
        parse_err(&["x = a + b);"]),
        TranslateError::UnexpectedToken { .. }
    ));
}

#[test]
fn stats_count_statements() {
    let mut body = parse(&["a = 1;", "b = 2;"]);
    assert_eq!(body.stats().statements, 2);
    body.reset_stats();
    assert_eq!(body.stats().statements, 0);
}

#[test]
fn xor_sits_between_or_and_and() {
    assert_eq!(describe("h = a ^ b & c | d;"), "=(h, |(^(a, &(b, c)), d))");
    let body = parse(&["h = a ^ b;"]);
    assert_eq!(body.declarations().count(), 0);
}

#[test]
fn shifts_bind_between_relational_and_additive() {
    assert_eq!(describe("x = a << 2 + b;"), "=(x, <<(a, +(2, b)))");
    assert_eq!(describe("ok = a >> 1 < b;"), "=(ok, <(>>(a, 1), b))");
    assert_eq!(describe("x = a >>> n;"), "=(x, >>>(a, n))");
}

#[test]
fn shift_and_xor_assignments() {
    assert_eq!(describe("x >>>= 3;"), ">>>=(x, 3)");
    assert_eq!(describe("x >>= 3;"), ">>=(x, 3)");
    assert_eq!(describe("x <<= k;"), "<<=(x, k)");
    assert_eq!(describe("x ^= mask;"), "^=(x, mask)");
}

#[test]
fn nested_type_arguments_close_with_one_token() {
    assert_eq!(
        describe("Map<String, List<Integer>> m = build(n >> 1);"),
        "=(decl(Map<String, List<Integer>> m), call(build, >>(n, 1)))"
    );
}

#[test]
fn lowercase_comparisons_are_not_type_arguments() {
    let body = parse(&["foo(a < b, c > n);"]);
    assert_eq!(body.describe(statement(&body, 0)), "call(foo, <(a, b), >(c, n))");
    assert_eq!(body.declarations().count(), 0);
}

#[test]
fn operand_sequence_with_foreign_symbols_is_verbatim() {
    let body = parse(&["h = a ~ b;", "s = b;"]);
    assert_eq!(body.describe(statement(&body, 0)), "=(h, verbatim(a ~ b))");
    assert_eq!(body.declarations().count(), 0);
}
