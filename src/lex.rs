use crate::datetime::{Date, Offset, Time};
use crate::error::{Error, ErrorKind};

mod datetime;
mod num;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    /// 0-based index of line
    pub line: u32,
    /// utf-8 byte index within the line
    pub char: u32,
}

impl Pos {
    #[inline(always)]
    pub fn new(line: u32, char: u32) -> Self {
        Self { line, char }
    }

    #[inline(always)]
    pub fn plus(&self, n: u32) -> Self {
        Self {
            line: self.line,
            char: self.char + n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    #[inline(always)]
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    #[inline(always)]
    pub fn from_pos_len(start: Pos, len: u32) -> Self {
        Self {
            start,
            end: start.plus(len),
        }
    }

    #[inline(always)]
    pub fn pos(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[inline(always)]
    pub fn across(a: Self, b: Self) -> Self {
        Self {
            start: a.start,
            end: b.end,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    /// "
    Basic,
    /// """
    BasicMultiline,
    /// '
    Literal,
    /// '''
    LiteralMultiline,
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quote::Basic => f.write_str("\""),
            Quote::BasicMultiline => f.write_str("\"\"\""),
            Quote::Literal => f.write_str("'"),
            Quote::LiteralMultiline => f.write_str("'''"),
        }
    }
}

impl Quote {
    pub fn len(&self) -> u32 {
        match self {
            Quote::Basic | Quote::Literal => 1,
            Quote::BasicMultiline | Quote::LiteralMultiline => 3,
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic | Self::BasicMultiline)
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::BasicMultiline | Self::LiteralMultiline)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Token<'a> {
    pub ty: TokenType<'a>,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum TokenType<'a> {
    /// The text between the quotes, exactly as written in the document.
    /// Escape sequences are translated by the parser.
    String { quote: Quote, lit: &'a str },
    /// An unquoted key.
    Literal(&'a str),
    Integer(i64),
    Float(f64),
    Bool(bool),
    OffsetDateTime(Date, Time, Offset),
    LocalDateTime(Date, Time),
    LocalDate(Date),
    LocalTime(Time),
    SquareLeft,
    SquareRight,
    DoubleSquareLeft,
    DoubleSquareRight,
    CurlyLeft,
    CurlyRight,
    Equal,
    Comma,
    Dot,
    Newline,
    Eof,
}

impl TokenType<'_> {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TokenType::String { .. } => "a string",
            TokenType::Literal(_) => "an identifier",
            TokenType::Integer(_) => "an integer",
            TokenType::Float(_) => "a float",
            TokenType::Bool(_) => "a boolean",
            TokenType::OffsetDateTime(..)
            | TokenType::LocalDateTime(..)
            | TokenType::LocalDate(..)
            | TokenType::LocalTime(..) => "a date-time",
            TokenType::SquareLeft => "`[`",
            TokenType::SquareRight => "`]`",
            TokenType::DoubleSquareLeft => "`[[`",
            TokenType::DoubleSquareRight => "`]]`",
            TokenType::CurlyLeft => "`{`",
            TokenType::CurlyRight => "`}`",
            TokenType::Equal => "`=`",
            TokenType::Comma => "`,`",
            TokenType::Dot => "`.`",
            TokenType::Newline => "a line break",
            TokenType::Eof => "end of file",
        }
    }
}

/// Snapshot of the cursor and line counter, used by the parser to look past
/// a key part for a `.` and back off if there is none.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LexerState {
    pos: usize,
    line: u32,
    line_start: usize,
}

/// On-demand tokenizer. Tokens are produced in one of two modes: key mode
/// merges `[[`/`]]` and returns bare identifier runs uninterpreted, value
/// mode keeps brackets single and commits bare runs to a typed scalar.
#[derive(Debug)]
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
}

fn is_control(b: u8) -> bool {
    (b < 0x20 && b != b'\t') || b == 0x7f
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 0,
            line_start: 0,
        }
    }

    pub(crate) fn next_key_token(&mut self) -> Result<Token<'a>, Error> {
        self.next_token(true)
    }

    pub(crate) fn next_value_token(&mut self) -> Result<Token<'a>, Error> {
        self.next_token(false)
    }

    pub(crate) fn save(&self) -> LexerState {
        LexerState {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
        }
    }

    pub(crate) fn restore(&mut self, state: LexerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.line_start = state.line_start;
    }

    fn byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn char_at(&self, idx: usize) -> char {
        self.input[idx..].chars().next().unwrap_or('\u{fffd}')
    }

    fn cur_pos(&self) -> Pos {
        Pos {
            line: self.line,
            char: (self.pos - self.line_start) as u32,
        }
    }

    /// Call directly after consuming a `\n`.
    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
    }

    fn ascii_token(&mut self, ty: TokenType<'a>) -> Token<'a> {
        let start = self.cur_pos();
        self.pos += 1;
        Token {
            ty,
            span: Span::from_pos_len(start, 1),
        }
    }

    fn wide_token(&mut self, ty: TokenType<'a>) -> Token<'a> {
        let start = self.cur_pos();
        self.pos += 2;
        Token {
            ty,
            span: Span::from_pos_len(start, 2),
        }
    }

    fn next_token(&mut self, key_mode: bool) -> Result<Token<'a>, Error> {
        loop {
            match self.byte() {
                Some(b' ' | b'\t') => self.pos += 1,
                Some(b'#') => self.comment()?,
                None => {
                    return Ok(Token {
                        ty: TokenType::Eof,
                        span: Span::pos(self.cur_pos()),
                    });
                }
                Some(b'\n') => {
                    let start = self.cur_pos();
                    self.pos += 1;
                    self.newline();
                    return Ok(Token {
                        ty: TokenType::Newline,
                        span: Span::new(start, self.cur_pos()),
                    });
                }
                Some(b'\r') => {
                    // CRLF is normalized to a single line feed.
                    if self.byte_at(1) == Some(b'\n') {
                        let start = self.cur_pos();
                        self.pos += 2;
                        self.newline();
                        return Ok(Token {
                            ty: TokenType::Newline,
                            span: Span::new(start, self.cur_pos()),
                        });
                    }
                    return Err(Error::new(
                        ErrorKind::ControlChar('\r'),
                        Span::pos(self.cur_pos()),
                    ));
                }
                Some(b'=') => return Ok(self.ascii_token(TokenType::Equal)),
                Some(b'.') => return Ok(self.ascii_token(TokenType::Dot)),
                Some(b',') => return Ok(self.ascii_token(TokenType::Comma)),
                Some(b'{') => return Ok(self.ascii_token(TokenType::CurlyLeft)),
                Some(b'}') => return Ok(self.ascii_token(TokenType::CurlyRight)),
                Some(b'[') => {
                    if key_mode && self.byte_at(1) == Some(b'[') {
                        return Ok(self.wide_token(TokenType::DoubleSquareLeft));
                    }
                    return Ok(self.ascii_token(TokenType::SquareLeft));
                }
                Some(b']') => {
                    if key_mode && self.byte_at(1) == Some(b']') {
                        return Ok(self.wide_token(TokenType::DoubleSquareRight));
                    }
                    return Ok(self.ascii_token(TokenType::SquareRight));
                }
                Some(b'"' | b'\'') => return self.string_token(),
                Some(b) if is_control(b) => {
                    return Err(Error::new(
                        ErrorKind::ControlChar(self.char_at(self.pos)),
                        Span::pos(self.cur_pos()),
                    ));
                }
                Some(_) if key_mode => return self.bare_key_token(),
                Some(_) => return self.scalar_token(),
            }
        }
    }

    fn comment(&mut self) -> Result<(), Error> {
        self.pos += 1;
        loop {
            match self.byte() {
                None | Some(b'\n') => return Ok(()),
                Some(b'\r') if self.byte_at(1) == Some(b'\n') => return Ok(()),
                Some(b) if is_control(b) => {
                    return Err(Error::new(
                        ErrorKind::ControlChar(self.char_at(self.pos)),
                        Span::pos(self.cur_pos()),
                    ));
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn bare_key_token(&mut self) -> Result<Token<'a>, Error> {
        let start = self.cur_pos();
        let start_idx = self.pos;
        while matches!(
            self.byte(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-')
        ) {
            self.pos += 1;
        }
        if self.pos == start_idx {
            return Err(Error::new(
                ErrorKind::Unexpected(self.char_at(self.pos)),
                Span::pos(start),
            ));
        }
        Ok(Token {
            ty: TokenType::Literal(&self.input[start_idx..self.pos]),
            span: Span::new(start, self.cur_pos()),
        })
    }

    fn scalar_token(&mut self) -> Result<Token<'a>, Error> {
        let start = self.cur_pos();
        let start_idx = self.pos;

        // Date-time lookahead: two digits and a `:` start a time, four
        // digits and a `-` start a date.
        if self.byte().is_some_and(|b| b.is_ascii_digit()) {
            if self.byte_at(1).is_some_and(|b| b.is_ascii_digit()) && self.byte_at(2) == Some(b':')
            {
                let ty = datetime::scan_local_time(self)?;
                self.expect_scalar_end()?;
                return Ok(Token {
                    ty,
                    span: Span::new(start, self.cur_pos()),
                });
            }
            if (1..4).all(|i| self.byte_at(i).is_some_and(|b| b.is_ascii_digit()))
                && self.byte_at(4) == Some(b'-')
            {
                let ty = datetime::scan_date_time(self)?;
                self.expect_scalar_end()?;
                return Ok(Token {
                    ty,
                    span: Span::new(start, self.cur_pos()),
                });
            }
        }

        while matches!(
            self.byte(),
            Some(b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'+' | b'-' | b'.')
        ) {
            self.pos += 1;
        }
        if self.pos == start_idx {
            return Err(Error::new(
                ErrorKind::Unexpected(self.char_at(self.pos)),
                Span::pos(start),
            ));
        }
        let lit = &self.input[start_idx..self.pos];
        let span = Span::new(start, self.cur_pos());
        let ty = num::classify(lit, span)?;
        self.expect_scalar_end()?;
        Ok(Token { ty, span })
    }

    /// A scalar must be directly followed by a delimiter, so that e.g.
    /// `1979-05-27T07:32:00x` or `1.5"` are rejected where they stand.
    fn expect_scalar_end(&mut self) -> Result<(), Error> {
        match self.byte() {
            None | Some(b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}' | b'#') => Ok(()),
            Some(_) => Err(Error::new(
                ErrorKind::Unexpected(self.char_at(self.pos)),
                Span::pos(self.cur_pos()),
            )),
        }
    }

    fn string_token(&mut self) -> Result<Token<'a>, Error> {
        let start = self.cur_pos();
        let start_idx = self.pos;
        let qb = self.input.as_bytes()[self.pos];

        let quote = if self.byte_at(1) == Some(qb) && self.byte_at(2) == Some(qb) {
            self.pos += 3;
            match qb {
                b'"' => Quote::BasicMultiline,
                _ => Quote::LiteralMultiline,
            }
        } else if self.byte_at(1) == Some(qb) {
            // Just an empty string
            self.pos += 2;
            let quote = match qb {
                b'"' => Quote::Basic,
                _ => Quote::Literal,
            };
            return Ok(Token {
                ty: TokenType::String {
                    quote,
                    lit: &self.input[start_idx + 1..start_idx + 1],
                },
                span: Span::from_pos_len(start, 2),
            });
        } else {
            self.pos += 1;
            match qb {
                b'"' => Quote::Basic,
                _ => Quote::Literal,
            }
        };

        let content_start = self.pos;
        if quote.is_multiline() {
            self.multiline_string(start, content_start, quote, qb)
        } else {
            self.single_line_string(start, content_start, quote, qb)
        }
    }

    fn single_line_string(
        &mut self,
        start: Pos,
        content_start: usize,
        quote: Quote,
        qb: u8,
    ) -> Result<Token<'a>, Error> {
        loop {
            match self.byte() {
                None | Some(b'\n') => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedString(quote),
                        Span::new(start, self.cur_pos()),
                    ));
                }
                Some(b'\r') if self.byte_at(1) == Some(b'\n') => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedString(quote),
                        Span::new(start, self.cur_pos()),
                    ));
                }
                Some(b) if b == qb => {
                    let lit = &self.input[content_start..self.pos];
                    self.pos += 1;
                    return Ok(Token {
                        ty: TokenType::String { quote, lit },
                        span: Span::new(start, self.cur_pos()),
                    });
                }
                Some(b'\\') if quote.is_basic() => {
                    self.pos += 1;
                    // Shield `\"` and `\\` from the termination scan; the
                    // parser validates the rest of the escape set.
                    if matches!(self.byte(), Some(b'"' | b'\\')) {
                        self.pos += 1;
                    }
                }
                Some(b) if is_control(b) => {
                    return Err(Error::new(
                        ErrorKind::ControlChar(self.char_at(self.pos)),
                        Span::pos(self.cur_pos()),
                    ));
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn multiline_string(
        &mut self,
        start: Pos,
        content_start: usize,
        quote: Quote,
        qb: u8,
    ) -> Result<Token<'a>, Error> {
        loop {
            match self.byte() {
                None => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedString(quote),
                        Span::new(start, self.cur_pos()),
                    ));
                }
                Some(b'\n') => {
                    self.pos += 1;
                    self.newline();
                }
                Some(b'\r') if self.byte_at(1) == Some(b'\n') => {
                    self.pos += 2;
                    self.newline();
                }
                Some(b) if b == qb => {
                    let mut n = 0;
                    while self.byte_at(n) == Some(qb) {
                        n += 1;
                    }
                    if n < 3 {
                        // One or two quotes are string content.
                        self.pos += n;
                        continue;
                    }
                    if n > 5 {
                        return Err(Error::new(
                            ErrorKind::ExcessiveQuotes,
                            Span::from_pos_len(self.cur_pos(), n as u32),
                        ));
                    }
                    // Up to two quotes directly before the closing three
                    // belong to the string.
                    let lit = &self.input[content_start..self.pos + (n - 3)];
                    self.pos += n;
                    return Ok(Token {
                        ty: TokenType::String { quote, lit },
                        span: Span::new(start, self.cur_pos()),
                    });
                }
                Some(b'\\') if quote.is_basic() => {
                    self.pos += 1;
                    if matches!(self.byte(), Some(b'"' | b'\\')) {
                        self.pos += 1;
                    }
                }
                Some(b) if is_control(b) => {
                    return Err(Error::new(
                        ErrorKind::ControlChar(self.char_at(self.pos)),
                        Span::pos(self.cur_pos()),
                    ));
                }
                Some(_) => self.pos += 1,
            }
        }
    }
}
