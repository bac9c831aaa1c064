use bumpalo::collections::String as BString;
use bumpalo::collections::Vec as BVec;
use bumpalo::Bump;

use crate::datetime::DateTime;
use crate::error::{Error, ErrorKind};
use crate::lex::{Lexer, Pos, Quote, Span, Token, TokenType};

#[cfg(test)]
mod test;

/// Inline values nested deeper than this are rejected rather than risking
/// the stack.
const MAX_RECURSION_DEPTH: u16 = 256;

/// A value of the intermediate tree, allocated in the scratch arena.
///
/// Tables and arrays carry the provenance flags that drive TOML's
/// duplication and extension rules; see [`TableNode`] and [`ArrayNode`].
#[derive(Debug)]
pub(crate) enum Node<'a> {
    Table(TableNode<'a>),
    Array(ArrayNode<'a>),
    String(&'a str),
    Integer(i64),
    Float(f64),
    Bool(bool),
    DateTime(DateTime),
}

#[derive(Debug)]
pub(crate) struct TableNode<'a> {
    pub entries: BVec<'a, TableEntry<'a>>,
    /// Created by `{ … }` syntax (or contained in an inline value); sealed
    /// against any later extension.
    pub inlined: bool,
    /// Created by a `[name]`/`[[name]]` header, or implicitly as an ancestor
    /// of one.
    pub standard: bool,
    /// The exact path was directly named by a header or by the final key of
    /// a dotted assignment.
    pub explicit: bool,
}

impl<'a> TableNode<'a> {
    pub(crate) fn new_in(bump: &'a Bump) -> Self {
        Self {
            entries: BVec::new_in(bump),
            inlined: false,
            standard: false,
            explicit: false,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }
}

#[derive(Debug)]
pub(crate) struct TableEntry<'a> {
    pub key: &'a str,
    pub key_span: Span,
    pub node: Node<'a>,
}

#[derive(Debug)]
pub(crate) struct ArrayNode<'a> {
    pub elems: BVec<'a, Node<'a>>,
    /// `[ … ]` literal; false for arrays of tables.
    pub inlined: bool,
}

#[derive(Clone, Copy, Debug)]
struct KeyPart<'a> {
    text: &'a str,
    span: Span,
}

/// Where a dotted key is being resolved. Dotted keys inside inline table
/// braces may extend the sub-tables they created themselves, while top-level
/// dotted keys must not reach into tables a header defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyCtx {
    TopLevel,
    InlineTable,
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    bump: &'a Bump,
}

pub(crate) fn parse_document<'a>(bump: &'a Bump, input: &'a str) -> Result<TableNode<'a>, Error> {
    let mut parser = Parser {
        lexer: Lexer::new(input),
        bump,
    };
    let mut root = TableNode::new_in(bump);
    // Path of the current `[header]`, re-walked from the root for every
    // key/value line.
    let mut header: Vec<&'a str> = Vec::new();

    loop {
        let token = parser.lexer.next_key_token()?;
        match token.ty {
            TokenType::Newline => continue,
            TokenType::Eof => break,
            TokenType::SquareLeft => {
                header = parser.standard_header(&mut root)?;
            }
            TokenType::DoubleSquareLeft => {
                header = parser.array_header(&mut root)?;
            }
            TokenType::String { .. } | TokenType::Literal(_) => {
                parser.keyval(&mut root, &header, token)?;
            }
            other => {
                return Err(Error::new(ErrorKind::ExpectedKey(other.describe()), token.span));
            }
        }
    }

    Ok(root)
}

impl<'a> Parser<'a> {
    fn standard_header(&mut self, root: &mut TableNode<'a>) -> Result<Vec<&'a str>, Error> {
        let first = self.lexer.next_key_token()?;
        let path = self.key_path(first)?;
        let close = self.lexer.next_key_token()?;
        if close.ty != TokenType::SquareRight {
            return Err(Error::new(
                ErrorKind::ExpectedRightSquare(close.ty.describe()),
                close.span,
            ));
        }

        let Some((last, ancestors)) = path.split_last() else {
            unreachable!()
        };
        let mut cur = root;
        for part in ancestors {
            cur = descend_header(self.bump, cur, part)?;
        }
        open_standard(self.bump, cur, last)?;

        self.expect_line_end()?;
        Ok(path.iter().map(|p| p.text).collect())
    }

    fn array_header(&mut self, root: &mut TableNode<'a>) -> Result<Vec<&'a str>, Error> {
        let first = self.lexer.next_key_token()?;
        let path = self.key_path(first)?;
        let close = self.lexer.next_key_token()?;
        if close.ty != TokenType::DoubleSquareRight {
            return Err(Error::new(
                ErrorKind::ExpectedDoubleRightSquare(close.ty.describe()),
                close.span,
            ));
        }

        let Some((last, ancestors)) = path.split_last() else {
            unreachable!()
        };
        let mut cur = root;
        for part in ancestors {
            cur = descend_header(self.bump, cur, part)?;
        }
        open_array(self.bump, cur, last)?;

        self.expect_line_end()?;
        Ok(path.iter().map(|p| p.text).collect())
    }

    fn keyval(
        &mut self,
        root: &mut TableNode<'a>,
        header: &[&'a str],
        first: Token<'a>,
    ) -> Result<(), Error> {
        let path = self.key_path(first)?;
        let eq = self.lexer.next_key_token()?;
        if eq.ty != TokenType::Equal {
            return Err(Error::new(ErrorKind::ExpectedEq(eq.ty.describe()), eq.span));
        }
        let token = self.lexer.next_value_token()?;
        let node = self.value(token, 0)?;

        let table = current_table(root, header);
        insert_dotted(self.bump, table, &path, node, KeyCtx::TopLevel)?;
        self.expect_line_end()
    }

    fn expect_line_end(&mut self) -> Result<(), Error> {
        let token = self.lexer.next_key_token()?;
        match token.ty {
            TokenType::Newline | TokenType::Eof => Ok(()),
            other => Err(Error::new(
                ErrorKind::ExpectedNewline(other.describe()),
                token.span,
            )),
        }
    }

    fn key_path(&mut self, first: Token<'a>) -> Result<Vec<KeyPart<'a>>, Error> {
        let mut parts = vec![self.key_part(first)?];
        loop {
            // Look past the key part for a `.`, backing the cursor off if
            // there is none.
            let state = self.lexer.save();
            let token = self.lexer.next_key_token()?;
            if token.ty != TokenType::Dot {
                self.lexer.restore(state);
                return Ok(parts);
            }
            let part = self.lexer.next_key_token()?;
            parts.push(self.key_part(part)?);
        }
    }

    fn key_part(&mut self, token: Token<'a>) -> Result<KeyPart<'a>, Error> {
        match token.ty {
            TokenType::Literal(lit) => Ok(KeyPart {
                text: lit,
                span: token.span,
            }),
            TokenType::String { quote, lit } => {
                let text = match quote {
                    Quote::Basic => {
                        normalize_basic(self.bump, lit, false, token.span.start.plus(1))?
                    }
                    Quote::Literal => lit,
                    Quote::BasicMultiline | Quote::LiteralMultiline => {
                        return Err(Error::new(ErrorKind::MultilineStringKey, token.span));
                    }
                };
                Ok(KeyPart {
                    text,
                    span: token.span,
                })
            }
            other => Err(Error::new(ErrorKind::ExpectedKey(other.describe()), token.span)),
        }
    }

    fn value(&mut self, token: Token<'a>, depth: u16) -> Result<Node<'a>, Error> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::new(ErrorKind::RecursionLimit, token.span));
        }
        match token.ty {
            TokenType::String { quote, lit } => {
                let text = self.string_text(quote, lit, token.span)?;
                Ok(Node::String(text))
            }
            TokenType::Integer(v) => Ok(Node::Integer(v)),
            TokenType::Float(v) => Ok(Node::Float(v)),
            TokenType::Bool(v) => Ok(Node::Bool(v)),
            TokenType::OffsetDateTime(date, time, offset) => {
                Ok(Node::DateTime(DateTime::OffsetDateTime(date, time, offset)))
            }
            TokenType::LocalDateTime(date, time) => {
                Ok(Node::DateTime(DateTime::LocalDateTime(date, time)))
            }
            TokenType::LocalDate(date) => Ok(Node::DateTime(DateTime::LocalDate(date))),
            TokenType::LocalTime(time) => Ok(Node::DateTime(DateTime::LocalTime(time))),
            TokenType::SquareLeft => self.inline_array(depth),
            TokenType::CurlyLeft => self.inline_table(depth),
            other => Err(Error::new(
                ErrorKind::ExpectedValue(other.describe()),
                token.span,
            )),
        }
    }

    fn string_text(&mut self, quote: Quote, lit: &'a str, span: Span) -> Result<&'a str, Error> {
        let base = span.start.plus(quote.len());
        match quote {
            Quote::Basic => normalize_basic(self.bump, lit, false, base),
            Quote::BasicMultiline => normalize_basic(self.bump, lit, true, base),
            Quote::Literal => Ok(lit),
            Quote::LiteralMultiline => Ok(normalize_multiline_literal(self.bump, lit)),
        }
    }

    fn inline_array(&mut self, depth: u16) -> Result<Node<'a>, Error> {
        let mut elems = BVec::new_in(self.bump);
        loop {
            // Line breaks are permitted between elements.
            let token = self.skip_newlines()?;
            if token.ty == TokenType::SquareRight {
                // This also permits a trailing comma.
                break;
            }
            elems.push(self.value(token, depth + 1)?);

            let sep = self.skip_newlines()?;
            match sep.ty {
                TokenType::Comma => (),
                TokenType::SquareRight => break,
                other => {
                    return Err(Error::new(
                        ErrorKind::ExpectedCommaOrRightSquare(other.describe()),
                        sep.span,
                    ));
                }
            }
        }
        Ok(Node::Array(ArrayNode {
            elems,
            inlined: true,
        }))
    }

    fn skip_newlines(&mut self) -> Result<Token<'a>, Error> {
        loop {
            let token = self.lexer.next_value_token()?;
            if token.ty != TokenType::Newline {
                return Ok(token);
            }
        }
    }

    fn inline_table(&mut self, depth: u16) -> Result<Node<'a>, Error> {
        let mut table = TableNode::new_in(self.bump);
        table.explicit = true;

        let mut token = self.lexer.next_key_token()?;
        if token.ty != TokenType::CurlyRight {
            loop {
                if token.ty == TokenType::Newline {
                    return Err(Error::new(ErrorKind::NewlineInInlineTable, token.span));
                }
                let path = self.key_path(token)?;
                let eq = self.lexer.next_key_token()?;
                match eq.ty {
                    TokenType::Equal => (),
                    TokenType::Newline => {
                        return Err(Error::new(ErrorKind::NewlineInInlineTable, eq.span));
                    }
                    other => {
                        return Err(Error::new(ErrorKind::ExpectedEq(other.describe()), eq.span));
                    }
                }
                let value_token = self.lexer.next_value_token()?;
                if value_token.ty == TokenType::Newline {
                    return Err(Error::new(
                        ErrorKind::NewlineInInlineTable,
                        value_token.span,
                    ));
                }
                let node = self.value(value_token, depth + 1)?;
                insert_dotted(self.bump, &mut table, &path, node, KeyCtx::InlineTable)?;

                let sep = self.lexer.next_key_token()?;
                match sep.ty {
                    TokenType::CurlyRight => break,
                    TokenType::Comma => {
                        token = self.lexer.next_key_token()?;
                        if token.ty == TokenType::CurlyRight {
                            return Err(Error::new(ErrorKind::InlineTableTrailingComma, sep.span));
                        }
                    }
                    TokenType::Newline => {
                        return Err(Error::new(ErrorKind::NewlineInInlineTable, sep.span));
                    }
                    other => {
                        return Err(Error::new(
                            ErrorKind::ExpectedCommaOrRightCurly(other.describe()),
                            sep.span,
                        ));
                    }
                }
            }
        }

        // The table and everything it holds are sealed once the closing
        // brace is consumed; until then its own dotted keys may extend it.
        mark_inlined_table(&mut table);
        Ok(Node::Table(table))
    }
}

/// Walks the current header path from the root. The path was validated when
/// the header was opened, so every step resolves to a table or to an array
/// of tables, whose last element is entered.
fn current_table<'t, 'a>(root: &'t mut TableNode<'a>, header: &[&'a str]) -> &'t mut TableNode<'a> {
    let mut cur = root;
    for &seg in header {
        let Some(i) = cur.position(seg) else {
            unreachable!()
        };
        cur = match &mut cur.entries[i].node {
            Node::Table(t) => t,
            Node::Array(a) => match a.elems.last_mut() {
                Some(Node::Table(t)) => t,
                _ => unreachable!(),
            },
            _ => unreachable!(),
        };
    }
    cur
}

fn insert_dotted<'a>(
    bump: &'a Bump,
    table: &mut TableNode<'a>,
    path: &[KeyPart<'a>],
    node: Node<'a>,
    ctx: KeyCtx,
) -> Result<(), Error> {
    let Some((last, ancestors)) = path.split_last() else {
        unreachable!()
    };
    let mut cur = table;
    for part in ancestors {
        cur = descend_dotted(bump, cur, part, ctx)?;
    }

    if let Some(i) = cur.position(last.text) {
        return Err(Error::new(
            ErrorKind::DuplicateKey {
                key: last.text.to_string(),
                orig: cur.entries[i].key_span,
            },
            last.span,
        ));
    }
    cur.entries.push(TableEntry {
        key: last.text,
        key_span: last.span,
        node,
    });
    Ok(())
}

fn descend_dotted<'t, 'a>(
    bump: &'a Bump,
    cur: &'t mut TableNode<'a>,
    part: &KeyPart<'a>,
    ctx: KeyCtx,
) -> Result<&'t mut TableNode<'a>, Error> {
    let Some(i) = cur.position(part.text) else {
        let mut table = TableNode::new_in(bump);
        // Sub-tables of an inline table are directly named and sealed with
        // it when the brace closes.
        table.explicit = ctx == KeyCtx::InlineTable;
        cur.entries.push(TableEntry {
            key: part.text,
            key_span: part.span,
            node: Node::Table(table),
        });
        let i = cur.entries.len() - 1;
        let Node::Table(t) = &mut cur.entries[i].node else {
            unreachable!()
        };
        return Ok(t);
    };

    let key_span = cur.entries[i].key_span;
    match &mut cur.entries[i].node {
        Node::Table(t) => {
            if t.inlined {
                Err(Error::new(
                    ErrorKind::ExtendInlineTable {
                        key: part.text.to_string(),
                        orig: key_span,
                    },
                    part.span,
                ))
            } else if ctx == KeyCtx::TopLevel && (t.standard || t.explicit) {
                Err(Error::new(
                    ErrorKind::DottedKeyExtendsTable {
                        key: part.text.to_string(),
                        orig: key_span,
                    },
                    part.span,
                ))
            } else {
                Ok(t)
            }
        }
        Node::Array(a) => {
            if a.inlined {
                Err(Error::new(
                    ErrorKind::ExtendInlineArray {
                        key: part.text.to_string(),
                        orig: key_span,
                    },
                    part.span,
                ))
            } else {
                // Descend into the last element of the array of tables.
                match a.elems.last_mut() {
                    Some(Node::Table(t)) => Ok(t),
                    _ => unreachable!(),
                }
            }
        }
        _ => Err(Error::new(
            ErrorKind::DuplicateKey {
                key: part.text.to_string(),
                orig: key_span,
            },
            part.span,
        )),
    }
}

/// Descends into (or creates) an ancestor segment of a header path. This may
/// pass through the last element of an array of tables.
fn descend_header<'t, 'a>(
    bump: &'a Bump,
    cur: &'t mut TableNode<'a>,
    part: &KeyPart<'a>,
) -> Result<&'t mut TableNode<'a>, Error> {
    let Some(i) = cur.position(part.text) else {
        let mut table = TableNode::new_in(bump);
        table.standard = true;
        cur.entries.push(TableEntry {
            key: part.text,
            key_span: part.span,
            node: Node::Table(table),
        });
        let i = cur.entries.len() - 1;
        let Node::Table(t) = &mut cur.entries[i].node else {
            unreachable!()
        };
        return Ok(t);
    };

    let key_span = cur.entries[i].key_span;
    match &mut cur.entries[i].node {
        Node::Table(t) => {
            if t.inlined {
                Err(Error::new(
                    ErrorKind::ExtendInlineTable {
                        key: part.text.to_string(),
                        orig: key_span,
                    },
                    part.span,
                ))
            } else {
                Ok(t)
            }
        }
        Node::Array(a) => {
            if a.inlined {
                Err(Error::new(
                    ErrorKind::ExtendInlineArray {
                        key: part.text.to_string(),
                        orig: key_span,
                    },
                    part.span,
                ))
            } else {
                match a.elems.last_mut() {
                    Some(Node::Table(t)) => Ok(t),
                    _ => unreachable!(),
                }
            }
        }
        _ => Err(Error::new(
            ErrorKind::DuplicateKey {
                key: part.text.to_string(),
                orig: key_span,
            },
            part.span,
        )),
    }
}

/// Final segment of a `[header]`: create a fresh table, or adopt a table
/// that only existed implicitly so far.
fn open_standard<'a>(bump: &'a Bump, cur: &mut TableNode<'a>, last: &KeyPart<'a>) -> Result<(), Error> {
    let Some(i) = cur.position(last.text) else {
        let mut table = TableNode::new_in(bump);
        table.standard = true;
        table.explicit = true;
        cur.entries.push(TableEntry {
            key: last.text,
            key_span: last.span,
            node: Node::Table(table),
        });
        return Ok(());
    };

    let key_span = cur.entries[i].key_span;
    match &mut cur.entries[i].node {
        Node::Table(t) if !t.inlined && t.standard && !t.explicit => {
            t.explicit = true;
            Ok(())
        }
        Node::Table(_) | Node::Array(_) => Err(Error::new(
            ErrorKind::RedefinedTable {
                key: last.text.to_string(),
                orig: key_span,
            },
            last.span,
        )),
        _ => Err(Error::new(
            ErrorKind::DuplicateKey {
                key: last.text.to_string(),
                orig: key_span,
            },
            last.span,
        )),
    }
}

/// Final segment of a `[[header]]`: append a fresh table to the array,
/// creating the array if the name is absent.
fn open_array<'a>(bump: &'a Bump, cur: &mut TableNode<'a>, last: &KeyPart<'a>) -> Result<(), Error> {
    let fresh = |bump: &'a Bump| {
        let mut table = TableNode::new_in(bump);
        table.standard = true;
        table.explicit = true;
        Node::Table(table)
    };

    let Some(i) = cur.position(last.text) else {
        let mut elems = BVec::new_in(bump);
        elems.push(fresh(bump));
        cur.entries.push(TableEntry {
            key: last.text,
            key_span: last.span,
            node: Node::Array(ArrayNode {
                elems,
                inlined: false,
            }),
        });
        return Ok(());
    };

    let key_span = cur.entries[i].key_span;
    match &mut cur.entries[i].node {
        Node::Array(a) => {
            if a.inlined {
                Err(Error::new(
                    ErrorKind::ExtendInlineArray {
                        key: last.text.to_string(),
                        orig: key_span,
                    },
                    last.span,
                ))
            } else {
                a.elems.push(fresh(bump));
                Ok(())
            }
        }
        Node::Table(_) => Err(Error::new(
            ErrorKind::NotArrayOfTables {
                key: last.text.to_string(),
                orig: key_span,
            },
            last.span,
        )),
        _ => Err(Error::new(
            ErrorKind::DuplicateKey {
                key: last.text.to_string(),
                orig: key_span,
            },
            last.span,
        )),
    }
}

fn mark_inlined_table(table: &mut TableNode<'_>) {
    table.inlined = true;
    for entry in table.entries.iter_mut() {
        mark_inlined(&mut entry.node);
    }
}

fn mark_inlined(node: &mut Node<'_>) {
    match node {
        Node::Table(t) => mark_inlined_table(t),
        Node::Array(a) => {
            a.inlined = true;
            for elem in a.elems.iter_mut() {
                mark_inlined(elem);
            }
        }
        _ => (),
    }
}

/// Translates the escape sequences of a basic string. Escape-free,
/// CR-free strings are returned as a slice of the input; everything else is
/// materialized in the scratch arena.
fn normalize_basic<'a>(
    bump: &'a Bump,
    lit: &'a str,
    multiline: bool,
    base: Pos,
) -> Result<&'a str, Error> {
    let (lit, base) = if multiline {
        trim_leading_newline(lit, base)
    } else {
        (lit, base)
    };
    if !lit.contains('\\') && !lit.contains('\r') {
        return Ok(lit);
    }

    let mut out = BString::with_capacity_in(lit.len(), bump);
    let mut chars = lit.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((j, esc)) = chars.next() else {
                    return Err(Error::new(
                        ErrorKind::UnfinishedEscape,
                        Span::pos(lit_pos(base, lit, i)),
                    ));
                };
                match esc {
                    'b' => out.push('\u{8}'),
                    't' => out.push('\t'),
                    'n' => out.push('\n'),
                    'f' => out.push('\u{c}'),
                    'r' => out.push('\r'),
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'u' => out.push(unicode_escape(&mut chars, 4, base, lit, i)?),
                    'U' => out.push(unicode_escape(&mut chars, 8, base, lit, i)?),
                    '\n' if multiline => skip_continuation(&mut chars),
                    '\r' if multiline && matches!(chars.peek(), Some((_, '\n'))) => {
                        chars.next();
                        skip_continuation(&mut chars);
                    }
                    ' ' | '\t' if multiline => {
                        // A line-ending backslash may be followed by spaces
                        // and tabs before the line break.
                        while matches!(chars.peek(), Some((_, ' ' | '\t'))) {
                            chars.next();
                        }
                        match chars.next() {
                            Some((_, '\n')) => skip_continuation(&mut chars),
                            Some((_, '\r')) if matches!(chars.peek(), Some((_, '\n'))) => {
                                chars.next();
                                skip_continuation(&mut chars);
                            }
                            _ => {
                                return Err(Error::new(
                                    ErrorKind::InvalidEscapeChar(esc),
                                    Span::pos(lit_pos(base, lit, j)),
                                ));
                            }
                        }
                    }
                    _ => {
                        return Err(Error::new(
                            ErrorKind::InvalidEscapeChar(esc),
                            Span::pos(lit_pos(base, lit, j)),
                        ));
                    }
                }
            }
            '\r' => {
                // The scanner only lets CRLF through; normalize to `\n`.
                if matches!(chars.peek(), Some((_, '\n'))) {
                    chars.next();
                }
                out.push('\n');
            }
            _ => out.push(c),
        }
    }
    Ok(out.into_bump_str())
}

fn skip_continuation(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
    while matches!(chars.peek(), Some((_, ' ' | '\t' | '\n' | '\r'))) {
        chars.next();
    }
}

fn unicode_escape(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    num_chars: u32,
    base: Pos,
    lit: &str,
    esc_start: usize,
) -> Result<char, Error> {
    let mut cp: u32 = 0;
    for _ in 0..num_chars {
        let Some((k, h)) = chars.next() else {
            return Err(Error::new(
                ErrorKind::UnfinishedEscape,
                Span::pos(lit_pos(base, lit, esc_start)),
            ));
        };
        let Some(digit) = h.to_digit(16) else {
            return Err(Error::new(
                ErrorKind::InvalidUnicodeEscapeChar(h),
                Span::pos(lit_pos(base, lit, k)),
            ));
        };
        cp = cp * 16 + digit;
    }
    // Surrogate halves and values beyond U+10FFFF are not scalar values.
    char::from_u32(cp).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidUnicodeCodepoint(cp),
            Span::pos(lit_pos(base, lit, esc_start)),
        )
    })
}

fn normalize_multiline_literal<'a>(bump: &'a Bump, lit: &'a str) -> &'a str {
    let lit = lit
        .strip_prefix("\r\n")
        .or_else(|| lit.strip_prefix('\n'))
        .unwrap_or(lit);
    if !lit.contains('\r') {
        return lit;
    }

    let mut out = BString::with_capacity_in(lit.len(), bump);
    let mut chars = lit.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            // Drop the CR of a CRLF line ending.
            continue;
        }
        out.push(c);
    }
    out.into_bump_str()
}

fn trim_leading_newline(lit: &str, base: Pos) -> (&str, Pos) {
    let trimmed = lit
        .strip_prefix("\r\n")
        .or_else(|| lit.strip_prefix('\n'));
    match trimmed {
        Some(rest) => (rest, Pos::new(base.line + 1, 0)),
        None => (lit, base),
    }
}

fn lit_pos(base: Pos, lit: &str, idx: usize) -> Pos {
    let mut pos = base;
    for &b in &lit.as_bytes()[..idx] {
        if b == b'\n' {
            pos.line += 1;
            pos.char = 0;
        } else {
            pos.char += 1;
        }
    }
    pos
}
