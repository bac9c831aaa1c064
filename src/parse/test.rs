use pretty_assertions::assert_eq;

use crate::datetime::{Date, Offset, Time};
use crate::error::ErrorKind;
use crate::lex::Span;
use crate::value::{Table, Value};

fn check(input: &str, expected: Table) {
    match crate::parse(input) {
        Ok(table) => assert_eq!(table, expected, "input: {input:?}"),
        Err(e) => panic!("unexpected error parsing {input:?}: {e}"),
    }
}

fn parse_error(input: &str) -> ErrorKind {
    match crate::parse(input) {
        Ok(table) => panic!("expected error parsing {input:?}, got {table:?}"),
        Err(e) => e.kind,
    }
}

fn table<const N: usize>(pairs: [(&str, Value); N]) -> Table {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn tbl<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    Value::Table(table(pairs))
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn int(i: i64) -> Value {
    Value::Integer(i)
}

#[test]
fn empty_documents() {
    check("", table([]));
    check("\n\n", table([]));
    check("# comment only", table([]));
    check("   # comment\n\t\n", table([]));
}

#[test]
fn minimal_key_value() {
    check("x = 1\n", table([("x", int(1))]));
    check("x = 1", table([("x", int(1))]));
}

#[test]
fn scalar_values() {
    check(
        "a = \"str\"\nb = -17\nc = 3.5\nd = true\ne = 1979-05-27\n",
        table([
            ("a", string("str")),
            ("b", int(-17)),
            ("c", Value::Float(3.5)),
            ("d", Value::Bool(true)),
            ("e", Value::LocalDate(Date::new(1979, 5, 27))),
        ]),
    );
}

#[test]
fn offset_date_time_value() {
    check(
        "t = 1979-05-27T07:32:00-08:00\n",
        table([(
            "t",
            Value::OffsetDateTime(
                Date::new(1979, 5, 27),
                Time::new(7, 32, 0, 0),
                Offset::Custom(-480),
            ),
        )]),
    );
}

#[test]
fn dotted_key_creates_tables() {
    check(
        "a.b.c = true\n",
        table([("a", tbl([("b", tbl([("c", Value::Bool(true))]))]))]),
    );
}

#[test]
fn dotted_keys_extend_within_a_section() {
    check(
        "a.b = 1\na.c = 2\n",
        table([("a", tbl([("b", int(1)), ("c", int(2))]))]),
    );
    check(
        "[t]\na.b = 1\na.c = 2\n",
        table([("t", tbl([("a", tbl([("b", int(1)), ("c", int(2))]))]))]),
    );
}

#[test]
fn quoted_keys() {
    check("\"a b\" = 1\n", table([("a b", int(1))]));
    check("'lit eral' = 1\n", table([("lit eral", int(1))]));
    check("\"\" = 1\n", table([("", int(1))]));
    // Escapes in basic-string keys are translated.
    check("\"\\u0041\" = 1\n", table([("A", int(1))]));
    check(
        "site.\"google.com\" = true\n",
        table([("site", tbl([("google.com", Value::Bool(true))]))]),
    );
}

#[test]
fn key_equality_is_textual() {
    // A bare key and its quoted spelling collide.
    assert!(matches!(
        parse_error("a = 1\n\"a\" = 2\n"),
        ErrorKind::DuplicateKey { .. }
    ));
}

#[test]
fn standard_table_headers() {
    check("[t]\n", table([("t", tbl([]))]));
    check(
        "[t]\nks = [1, 2, 3]\n",
        table([(
            "t",
            tbl([("ks", Value::Array(vec![int(1), int(2), int(3)]))]),
        )]),
    );
    check(
        "[a.b]\nx = 1\n",
        table([("a", tbl([("b", tbl([("x", int(1))]))]))]),
    );
}

#[test]
fn out_of_order_super_table() {
    check(
        "[a.b]\nx = 1\n[a]\ny = 2\n",
        table([("a", tbl([("b", tbl([("x", int(1))])), ("y", int(2))]))]),
    );
    check(
        "[a]\ny = 2\n[a.b]\nx = 1\n",
        table([("a", tbl([("y", int(2)), ("b", tbl([("x", int(1))]))]))]),
    );
}

#[test]
fn header_through_dotted_ancestor() {
    // Sub-tables may be added below dotted-created tables.
    check(
        "[a]\nb.c = 1\n[a.b.d]\nx = 2\n",
        table([(
            "a",
            tbl([(
                "b",
                tbl([("c", int(1)), ("d", tbl([("x", int(2))]))]),
            )]),
        )]),
    );
}

#[test]
fn array_of_tables() {
    check(
        "[[a]]\nx = 1\n[[a]]\nx = 2\n",
        table([(
            "a",
            Value::Array(vec![tbl([("x", int(1))]), tbl([("x", int(2))])]),
        )]),
    );
    check("[[a]]\n", table([("a", Value::Array(vec![tbl([])]))]));
}

#[test]
fn array_of_tables_sub_tables() {
    check(
        "[[a]]\nx = 1\n[a.b]\ny = 2\n",
        table([(
            "a",
            Value::Array(vec![tbl([("x", int(1)), ("b", tbl([("y", int(2))]))])]),
        )]),
    );
    // Key/value lines and sub-headers land in the most recent element.
    check(
        "[[a]]\nx = 1\n[[a]]\nx = 2\n[a.b]\ny = 3\n",
        table([(
            "a",
            Value::Array(vec![
                tbl([("x", int(1))]),
                tbl([("x", int(2)), ("b", tbl([("y", int(3))]))]),
            ]),
        )]),
    );
}

#[test]
fn nested_arrays_of_tables() {
    check(
        "[[a]]\n[[a.b]]\nx = 1\n[[a]]\n[[a.b]]\nx = 2\n",
        table([(
            "a",
            Value::Array(vec![
                tbl([("b", Value::Array(vec![tbl([("x", int(1))])]))]),
                tbl([("b", Value::Array(vec![tbl([("x", int(2))])]))]),
            ]),
        )]),
    );
}

#[test]
fn inline_tables() {
    check(
        "p = { x = 1, y = 2 }\n",
        table([("p", tbl([("x", int(1)), ("y", int(2))]))]),
    );
    check("e = {}\n", table([("e", tbl([]))]));
    check(
        "nest = { a = { b = 1 } }\n",
        table([("nest", tbl([("a", tbl([("b", int(1))]))]))]),
    );
}

#[test]
fn inline_table_dotted_keys() {
    check(
        "t = { a.b = 1, a.c = 2 }\n",
        table([("t", tbl([("a", tbl([("b", int(1)), ("c", int(2))]))]))]),
    );
}

#[test]
fn inline_arrays() {
    check(
        "a = [1, \"two\", 3.0]\n",
        table([(
            "a",
            Value::Array(vec![int(1), string("two"), Value::Float(3.0)]),
        )]),
    );
    // Trailing commas and newlines are fine inside arrays.
    check(
        "a = [\n  1,\n  2,\n]\n",
        table([("a", Value::Array(vec![int(1), int(2)]))]),
    );
    check("a = []\n", table([("a", Value::Array(vec![]))]));
    check(
        "a = [[1], [2, 3]]\n",
        table([(
            "a",
            Value::Array(vec![
                Value::Array(vec![int(1)]),
                Value::Array(vec![int(2), int(3)]),
            ]),
        )]),
    );
    check(
        "a = [{ x = 1 }]\n",
        table([("a", Value::Array(vec![tbl([("x", int(1))])]))]),
    );
}

#[test]
fn multiline_basic_strings() {
    check(
        "s = \"\"\"one \\\n   two\"\"\"\n",
        table([("s", string("one two"))]),
    );
    // The newline right after the opening quotes is trimmed.
    check(
        "s = \"\"\"\nfirst\nsecond\"\"\"\n",
        table([("s", string("first\nsecond"))]),
    );
    // A line-ending backslash may be followed by whitespace.
    check(
        "s = \"\"\"one \\  \n  two\"\"\"\n",
        table([("s", string("one two"))]),
    );
}

#[test]
fn escape_translation() {
    check(
        "s = \"tab\\there\\nand\\u00E9\\U0001F600\"\n",
        table([("s", string("tab\there\nand\u{e9}\u{1F600}"))]),
    );
    check("s = \"q\\\"q\"\n", table([("s", string("q\"q"))]));
}

#[test]
fn literal_strings_are_verbatim() {
    check(
        "p = 'C:\\Users\\nodejs'\n",
        table([("p", string("C:\\Users\\nodejs"))]),
    );
    check(
        "re = '''\\d{2} apps'''\n",
        table([("re", string("\\d{2} apps"))]),
    );
}

#[test]
fn crlf_documents() {
    check(
        "a = 1\r\nb = 2\r\n",
        table([("a", int(1)), ("b", int(2))]),
    );
    // CRLF inside multi-line strings becomes a line feed.
    check(
        "s = \"\"\"a\r\nb\"\"\"\r\n",
        table([("s", string("a\nb"))]),
    );
    check(
        "s = '''a\r\nb'''\n",
        table([("s", string("a\nb"))]),
    );
}

#[test]
fn deep_dotted_section_interleaving_is_permitted() {
    // The key/value line resolves against the current table `a.b`, so the
    // dotted segments create fresh tables inside it.
    check(
        "[a]\n[a.b]\na.b.c = 1\n",
        table([(
            "a",
            tbl([(
                "b",
                tbl([("a", tbl([("b", tbl([("c", int(1))]))]))]),
            )]),
        )]),
    );
}

#[test]
fn duplicate_keys() {
    assert!(matches!(
        parse_error("a = 1\na = 2\n"),
        ErrorKind::DuplicateKey { .. }
    ));
    assert!(matches!(
        parse_error("[t]\na = 1\na = 2\n"),
        ErrorKind::DuplicateKey { .. }
    ));
    assert!(matches!(
        parse_error("a.b = 1\na.b = 2\n"),
        ErrorKind::DuplicateKey { .. }
    ));
}

#[test]
fn duplicate_key_reports_original_span() {
    let err = match crate::parse("a = 1\na = 2\n") {
        Err(e) => e,
        Ok(_) => panic!("expected error"),
    };
    match err.kind {
        ErrorKind::DuplicateKey { key, orig } => {
            assert_eq!(key, "a");
            assert_eq!(orig.start.line, 0);
            assert_eq!(orig.start.char, 0);
        }
        other => panic!("wrong kind: {other:?}"),
    }
    assert_eq!(err.span.start.line, 1);
}

#[test]
fn redefined_tables() {
    assert!(matches!(
        parse_error("[a]\n[a]\n"),
        ErrorKind::RedefinedTable { .. }
    ));
    assert!(matches!(
        parse_error("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n"),
        ErrorKind::RedefinedTable { .. }
    ));
    // A table created by a dotted key cannot be named by a header.
    assert!(matches!(
        parse_error("a.b = 1\n[a]\n"),
        ErrorKind::RedefinedTable { .. }
    ));
    assert!(matches!(
        parse_error("[fruit]\napple.color = \"red\"\n[fruit.apple]\n"),
        ErrorKind::RedefinedTable { .. }
    ));
    // A scalar cannot be redefined as a table.
    assert!(matches!(
        parse_error("a = 1\n[a]\n"),
        ErrorKind::DuplicateKey { .. }
    ));
}

#[test]
fn dotted_keys_cannot_reach_into_header_tables() {
    assert!(matches!(
        parse_error("[a.b.c]\nz = 9\n[a]\nb.c.t = 9\n"),
        ErrorKind::DottedKeyExtendsTable { .. }
    ));
    // Implicit ancestors of a header count as well.
    assert!(matches!(
        parse_error("[a.b.c.d]\nz = 9\n[a]\nb.c.t = 9\n"),
        ErrorKind::DottedKeyExtendsTable { .. }
    ));
    assert!(matches!(
        parse_error("[a.b]\n[a]\nb.c = 1\n"),
        ErrorKind::DottedKeyExtendsTable { .. }
    ));
}

#[test]
fn dotted_keys_descend_into_arrays_of_tables() {
    // Like header paths, a dotted key passing through an array of tables
    // lands in its most recently added element.
    check(
        "[[a.b]]\n[a]\nb.x = 1\n",
        table([(
            "a",
            tbl([("b", Value::Array(vec![tbl([("x", int(1))])]))]),
        )]),
    );
    check(
        "[[t.b]]\nx = 1\n[[t.b]]\nx = 2\n[t]\nb.y = 3\n",
        table([(
            "t",
            tbl([(
                "b",
                Value::Array(vec![
                    tbl([("x", int(1))]),
                    tbl([("x", int(2)), ("y", int(3))]),
                ]),
            )]),
        )]),
    );
}

#[test]
fn inline_tables_are_sealed() {
    assert!(matches!(
        parse_error("a = { x = 1 }\na.y = 2\n"),
        ErrorKind::ExtendInlineTable { .. }
    ));
    assert!(matches!(
        parse_error("a = { x = 1 }\n[a]\n"),
        ErrorKind::RedefinedTable { .. }
    ));
    assert!(matches!(
        parse_error("a = { x = 1 }\n[a.b]\n"),
        ErrorKind::ExtendInlineTable { .. }
    ));
    // Sub-tables an inline table created for itself are sealed with it.
    assert!(matches!(
        parse_error("t = { a.b = 1 }\nt.a.c = 2\n"),
        ErrorKind::ExtendInlineTable { .. }
    ));
}

#[test]
fn inline_arrays_are_sealed() {
    assert!(matches!(
        parse_error("a = [1]\n[[a]]\n"),
        ErrorKind::ExtendInlineArray { .. }
    ));
    assert!(matches!(
        parse_error("a = []\na.b = 1\n"),
        ErrorKind::ExtendInlineArray { .. }
    ));
    assert!(matches!(
        parse_error("a = [{ x = 1 }]\n[a.b]\n"),
        ErrorKind::ExtendInlineArray { .. }
    ));
}

#[test]
fn array_of_tables_name_clashes() {
    assert!(matches!(
        parse_error("[a]\n[[a]]\n"),
        ErrorKind::NotArrayOfTables { .. }
    ));
    assert!(matches!(
        parse_error("[[a]]\n[a]\n"),
        ErrorKind::RedefinedTable { .. }
    ));
    assert!(matches!(
        parse_error("a = 1\n[[a]]\n"),
        ErrorKind::DuplicateKey { .. }
    ));
}

#[test]
fn inline_table_duplicate_dotted_keys() {
    assert!(matches!(
        parse_error("t = { a.b = 1, a.b = 2 }\n"),
        ErrorKind::DuplicateKey { .. }
    ));
    assert!(matches!(
        parse_error("t = { a = 1, a.b = 2 }\n"),
        ErrorKind::DuplicateKey { .. }
    ));
    assert!(matches!(
        parse_error("t = { a.b = 1, a = 2 }\n"),
        ErrorKind::DuplicateKey { .. }
    ));
    // An inline table given as a value is complete; even keys inside the
    // same braces cannot reopen it.
    assert!(matches!(
        parse_error("t = { a = {}, a.b = 1 }\n"),
        ErrorKind::ExtendInlineTable { .. }
    ));
}

#[test]
fn inline_table_syntax_restrictions() {
    assert_eq!(
        parse_error("t = { a = 1,\n}\n"),
        ErrorKind::NewlineInInlineTable
    );
    assert_eq!(parse_error("t = {\n}\n"), ErrorKind::NewlineInInlineTable);
    assert_eq!(
        parse_error("t = { a = 1, }\n"),
        ErrorKind::InlineTableTrailingComma
    );
}

#[test]
fn syntax_errors() {
    assert!(matches!(parse_error("a\n"), ErrorKind::ExpectedEq(_)));
    assert!(matches!(parse_error("a =\n"), ErrorKind::ExpectedValue(_)));
    assert!(matches!(parse_error("= 1\n"), ErrorKind::ExpectedKey(_)));
    assert!(matches!(parse_error("[a\n"), ErrorKind::ExpectedRightSquare(_)));
    assert!(matches!(
        parse_error("[[a]\n"),
        ErrorKind::ExpectedDoubleRightSquare(_)
    ));
    assert!(matches!(parse_error("[a.]\n"), ErrorKind::ExpectedKey(_)));
    assert!(matches!(
        parse_error("[a] b = 1\n"),
        ErrorKind::ExpectedNewline(_)
    ));
    assert!(matches!(
        parse_error("a = 1 b = 2\n"),
        ErrorKind::ExpectedNewline(_)
    ));
    assert!(matches!(
        parse_error("a = [1 2]\n"),
        ErrorKind::ExpectedCommaOrRightSquare(_)
    ));
    assert!(matches!(
        parse_error("a = [1, 2\n"),
        ErrorKind::ExpectedCommaOrRightSquare(_)
    ));
}

#[test]
fn multiline_strings_cannot_be_keys() {
    assert_eq!(
        parse_error("\"\"\"k\"\"\" = 1\n"),
        ErrorKind::MultilineStringKey
    );
    assert_eq!(parse_error("'''k''' = 1\n"), ErrorKind::MultilineStringKey);
}

#[test]
fn invalid_escapes() {
    assert_eq!(parse_error("s = \"a\\qb\"\n"), ErrorKind::InvalidEscapeChar('q'));
    assert_eq!(
        parse_error("s = \"a\\ b\"\n"),
        ErrorKind::InvalidEscapeChar(' ')
    );
    assert_eq!(
        parse_error("s = \"\\uD800\"\n"),
        ErrorKind::InvalidUnicodeCodepoint(0xd800)
    );
    assert_eq!(
        parse_error("s = \"\\U00110000\"\n"),
        ErrorKind::InvalidUnicodeCodepoint(0x110000)
    );
    assert_eq!(
        parse_error("s = \"\\uZZZZ\"\n"),
        ErrorKind::InvalidUnicodeEscapeChar('Z')
    );
}

#[test]
fn invalid_escape_positions_point_into_the_string() {
    let err = match crate::parse("s = \"ab\\qc\"\n") {
        Err(e) => e,
        Ok(_) => panic!("expected error"),
    };
    assert_eq!(err.kind, ErrorKind::InvalidEscapeChar('q'));
    // `q` sits at column 9 (0-based char 8).
    assert_eq!(err.span, Span::pos(crate::Pos::new(0, 8)));
}

#[test]
fn recursion_limit() {
    let mut input = String::from("a = ");
    for _ in 0..300 {
        input.push('[');
    }
    assert_eq!(parse_error(&input), ErrorKind::RecursionLimit);
}

#[test]
fn deeply_nested_but_within_limit() {
    let mut input = String::from("a = ");
    for _ in 0..40 {
        input.push('[');
    }
    for _ in 0..40 {
        input.push(']');
    }
    input.push('\n');
    assert!(crate::parse(&input).is_ok());
}
