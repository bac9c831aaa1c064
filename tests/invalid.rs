use toml_decode::{parse, parse_bytes, parse_with_diagnostics, Category, Error, ErrorKind};

fn fail(input: &str) -> Error {
    match parse(input) {
        Ok(table) => panic!("expected {input:?} to fail, got {table:?}"),
        Err(e) => e,
    }
}

#[test]
fn duplicate_key() {
    let err = fail("a = 1\na = 2\n");
    assert!(matches!(err.kind, ErrorKind::DuplicateKey { .. }));
    assert_eq!(err.kind.category(), Category::Semantic);
    assert_eq!(err.span.start.line, 1);
}

#[test]
fn semantic_failures() {
    for input in [
        "[a]\n[a]\n",
        "a.b = 1\n[a]\n",
        "a = { x = 1 }\na.y = 2\n",
        "a = [1]\n[[a]]\n",
        "[a]\n[[a]]\n",
        "[a.b.c]\nz = 9\n[a]\nb.c.t = 9\n",
        "t = { a.b = 1, a.b = 2 }\n",
    ] {
        let err = fail(input);
        assert_eq!(err.kind.category(), Category::Semantic, "input: {input:?}");
    }
}

#[test]
fn syntactic_failures() {
    for input in [
        "a\n",
        "= 1\n",
        "a =\n",
        "[a\n",
        "[[a]\n",
        "[a] x = 1\n",
        "a = 1 b = 2\n",
        "t = { a = 1, }\n",
        "t = {\n}\n",
        "a = [1 2]\n",
    ] {
        let err = fail(input);
        assert_eq!(err.kind.category(), Category::Syntactic, "input: {input:?}");
    }
}

#[test]
fn lexical_failures() {
    for input in [
        "a = \"unterminated\n",
        "a = \"bad \\q escape\"\n",
        "a = \"\\uD800\"\n",
        "a = 01\n",
        "a = 1__2\n",
        "a = 1979-13-01\n",
        "a = 2021-02-29\n",
        "a = 07:32:00Z\n",
        "a = \u{1}\n",
        "a = \"\"\"x\"\"\"\"\"\"\n",
    ] {
        let err = fail(input);
        assert_eq!(err.kind.category(), Category::Lexical, "input: {input:?}");
    }
}

#[test]
fn numeric_failures() {
    let err = fail("a = 9223372036854775808\n");
    assert_eq!(err.kind, ErrorKind::IntOverflow);
    assert_eq!(err.kind.category(), Category::Numeric);
}

#[test]
fn encoding_failure() {
    let err = match parse_bytes(b"a = 1\n\xff\xfe") {
        Ok(_) => panic!("expected invalid UTF-8 to fail"),
        Err(e) => e,
    };
    assert_eq!(err.kind, ErrorKind::InvalidUtf8);
    assert_eq!(err.kind.category(), Category::Encoding);
    assert_eq!(err.span.start.line, 1);
    assert_eq!(err.span.start.char, 0);
}

#[test]
fn overlong_and_surrogate_encodings_are_rejected() {
    // Overlong encoding of `/`.
    assert!(parse_bytes(b"a = \"\xc0\xaf\"\n").is_err());
    // UTF-8 encoded surrogate half.
    assert!(parse_bytes(b"a = \"\xed\xa0\x80\"\n").is_err());
    // Out of range code point.
    assert!(parse_bytes(b"a = \"\xf4\x90\x80\x80\"\n").is_err());
}

#[test]
fn first_error_wins() {
    // Both lines are bad; the reported error is the first.
    let err = fail("a = 01\nb = 02\n");
    assert_eq!(err.span.start.line, 0);
}

#[test]
fn diagnostics_format() {
    let diag = match parse_with_diagnostics("x = 1\nyy = @\n") {
        Ok(_) => panic!("expected error"),
        Err(d) => d,
    };
    assert_eq!(diag.line, 2);
    assert_eq!(diag.column, 6);
    assert_eq!(diag.snippet, "yy = @");
    assert!(!diag.message.is_empty());
    assert_eq!(
        diag.to_string(),
        "error parsing TOML document on line 2, column 6\nyy = @\n     ^"
    );
}

#[test]
fn diagnostics_trim_crlf_snippets() {
    let diag = match parse_with_diagnostics("ok = 1\r\nbad = @\r\n") {
        Ok(_) => panic!("expected error"),
        Err(d) => d,
    };
    assert_eq!(diag.line, 2);
    assert_eq!(diag.snippet, "bad = @");
}

#[test]
fn error_positions_are_one_based_in_display() {
    let err = fail("x = @\n");
    let rendered = err.to_string();
    assert!(rendered.contains("line 1"), "{rendered}");
    assert!(rendered.contains("column 5"), "{rendered}");
}
