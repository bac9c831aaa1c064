use std::fmt;

use crate::datetime::DateTimeField;
use crate::lex::{Quote, Span};

/// A parse failure. The first error encountered terminates parsing; there is
/// no recovery.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    /// Where the error occurred. Some kinds carry the span of an earlier,
    /// conflicting definition in addition.
    pub span: Span,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Materializes line/column/snippet information against the input the
    /// error was produced from.
    pub fn diagnostics(&self, input: &str) -> Diagnostics {
        let line_idx = self.span.start.line as usize;
        let snippet = input
            .split('\n')
            .nth(line_idx)
            .unwrap_or("")
            .trim_end_matches('\r')
            .to_string();
        Diagnostics {
            line: self.span.start.line + 1,
            column: self.span.start.char + 1,
            snippet,
            message: self.kind.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}, column {})",
            self.kind,
            self.span.start.line + 1,
            self.span.start.char + 1
        )
    }
}

impl std::error::Error for Error {}

/// Coarse classification of an [`ErrorKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Encoding,
    Lexical,
    Syntactic,
    Semantic,
    Numeric,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    InvalidUtf8,

    UnterminatedString(Quote),
    ControlChar(char),
    InvalidEscapeChar(char),
    InvalidUnicodeEscapeChar(char),
    InvalidUnicodeCodepoint(u32),
    UnfinishedEscape,
    ExcessiveQuotes,
    MultilineStringKey,
    Unexpected(char),
    InvalidCharInNum(char),
    LeadingZero,
    UnderscorePlacement,
    EmptyPrefixedInt,
    DigitOutOfRange(char, u32),
    UppercaseRadix(char),
    PrefixedIntSign,
    MissingDigits,
    InvalidCharInDateTime(char),
    DateTimeIncomplete(DateTimeField),
    DateTimeOutOfBounds(DateTimeField),
    LocalTimeOffset,

    ExpectedKey(&'static str),
    ExpectedValue(&'static str),
    ExpectedEq(&'static str),
    ExpectedRightSquare(&'static str),
    ExpectedDoubleRightSquare(&'static str),
    ExpectedCommaOrRightSquare(&'static str),
    ExpectedCommaOrRightCurly(&'static str),
    ExpectedNewline(&'static str),
    InlineTableTrailingComma,
    NewlineInInlineTable,
    RecursionLimit,

    DuplicateKey { key: String, orig: Span },
    RedefinedTable { key: String, orig: Span },
    NotArrayOfTables { key: String, orig: Span },
    ExtendInlineTable { key: String, orig: Span },
    ExtendInlineArray { key: String, orig: Span },
    DottedKeyExtendsTable { key: String, orig: Span },

    IntOverflow,
}

impl ErrorKind {
    pub fn category(&self) -> Category {
        use ErrorKind::*;

        match self {
            InvalidUtf8 => Category::Encoding,

            UnterminatedString(_)
            | ControlChar(_)
            | InvalidEscapeChar(_)
            | InvalidUnicodeEscapeChar(_)
            | InvalidUnicodeCodepoint(_)
            | UnfinishedEscape
            | ExcessiveQuotes
            | MultilineStringKey
            | Unexpected(_)
            | InvalidCharInNum(_)
            | LeadingZero
            | UnderscorePlacement
            | EmptyPrefixedInt
            | DigitOutOfRange(_, _)
            | UppercaseRadix(_)
            | PrefixedIntSign
            | MissingDigits
            | InvalidCharInDateTime(_)
            | DateTimeIncomplete(_)
            | DateTimeOutOfBounds(_)
            | LocalTimeOffset => Category::Lexical,

            ExpectedKey(_)
            | ExpectedValue(_)
            | ExpectedEq(_)
            | ExpectedRightSquare(_)
            | ExpectedDoubleRightSquare(_)
            | ExpectedCommaOrRightSquare(_)
            | ExpectedCommaOrRightCurly(_)
            | ExpectedNewline(_)
            | InlineTableTrailingComma
            | NewlineInInlineTable
            | RecursionLimit => Category::Syntactic,

            DuplicateKey { .. }
            | RedefinedTable { .. }
            | NotArrayOfTables { .. }
            | ExtendInlineTable { .. }
            | ExtendInlineArray { .. }
            | DottedKeyExtendsTable { .. } => Category::Semantic,

            IntOverflow => Category::Numeric,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;

        match self {
            InvalidUtf8 => write!(f, "Input is not valid UTF-8"),

            UnterminatedString(quote) => {
                write!(f, "Unterminated string literal, missing `{quote}`")
            }
            ControlChar(c) => write!(f, "Invalid control character `{}`", c.escape_debug()),
            InvalidEscapeChar(c) => write!(
                f,
                "Invalid escape character `{}`, expected one of: `u`, `U`, `b`, `t`, `n`, `f`, `r`, `\"`, `\\`",
                c.escape_debug()
            ),
            InvalidUnicodeEscapeChar(c) => write!(
                f,
                "Invalid character `{}` in unicode escape sequence, valid characters are: `a-f`, `A-F` and `0-9`",
                c.escape_debug()
            ),
            InvalidUnicodeCodepoint(cp) => {
                write!(f, "Invalid unicode code point `0x{cp:x}`")
            }
            UnfinishedEscape => write!(f, "Unfinished escape sequence"),
            ExcessiveQuotes => write!(
                f,
                "More than five consecutive quotes at the end of a multi-line string"
            ),
            MultilineStringKey => write!(f, "Multi-line strings cannot be used as keys"),
            Unexpected(c) => write!(f, "Unexpected character `{}`", c.escape_debug()),
            InvalidCharInNum(c) => {
                write!(
                    f,
                    "Invalid character `{}` in integer or float literal",
                    c.escape_debug()
                )?;
                if let 'a'..='f' | 'A'..='F' = c {
                    write!(f, ", hexadecimal integers need to be prefixed by `0x`")?;
                }
                Ok(())
            }
            LeadingZero => write!(f, "Decimal numbers cannot have leading zeros"),
            UnderscorePlacement => {
                write!(f, "Underscores must be surrounded by digits on both sides")
            }
            EmptyPrefixedInt => write!(f, "Missing integer digits, expected at least one"),
            DigitOutOfRange(c, radix) => match radix {
                2 => write!(f, "Binary digit `{c}` out of range, valid digits are `0` and `1`"),
                8 => write!(f, "Octal digit `{c}` out of range, valid digits are `0-7`"),
                _ => write!(
                    f,
                    "Hexadecimal digit `{c}` out of range, valid digits are `0-9`, `a-f`, and `A-F`"
                ),
            },
            UppercaseRadix(c) => write!(
                f,
                "Found uppercase integer radix `{c}`, only lowercase radices are permitted"
            ),
            PrefixedIntSign => write!(
                f,
                "Signs are not permitted for binary, octal, and hexadecimal integers"
            ),
            MissingDigits => write!(f, "Missing digits, expected at least one"),
            InvalidCharInDateTime(c) => {
                write!(f, "Invalid character `{}` in date-time", c.escape_debug())
            }
            DateTimeIncomplete(field) => {
                write!(f, "Incomplete date-time, {field} is missing digits")
            }
            DateTimeOutOfBounds(field) => write!(f, "Date-time {field} out of range"),
            LocalTimeOffset => write!(
                f,
                "Local times don't permit an offset, see: https://toml.io/en/v1.0.0#local-time"
            ),

            ExpectedKey(found) => write!(f, "Expected a key, found {found}"),
            ExpectedValue(found) => write!(f, "Expected a value, found {found}"),
            ExpectedEq(found) => write!(f, "Expected `=`, found {found}"),
            ExpectedRightSquare(found) => write!(f, "Expected `]`, found {found}"),
            ExpectedDoubleRightSquare(found) => write!(f, "Expected `]]`, found {found}"),
            ExpectedCommaOrRightSquare(found) => {
                write!(f, "Expected `,` or `]`, found {found}")
            }
            ExpectedCommaOrRightCurly(found) => {
                write!(f, "Expected `,` or `}}`, found {found}")
            }
            ExpectedNewline(found) => write!(f, "Expected a line break, found {found}"),
            InlineTableTrailingComma => {
                write!(f, "Trailing commas aren't permitted in inline tables")
            }
            NewlineInInlineTable => {
                write!(f, "Line breaks aren't permitted inside inline tables")
            }
            RecursionLimit => write!(f, "Value nesting exceeds the supported depth"),

            DuplicateKey { key, .. } => write!(f, "Duplicate key `{key}`"),
            RedefinedTable { key, .. } => {
                write!(f, "Table `{key}` cannot be defined more than once")
            }
            NotArrayOfTables { key, .. } => {
                write!(f, "`{key}` is not an array of tables and cannot be appended to")
            }
            ExtendInlineTable { key, .. } => write!(f, "Cannot extend inline table `{key}`"),
            ExtendInlineArray { key, .. } => write!(f, "Cannot extend inline array `{key}`"),
            DottedKeyExtendsTable { key, .. } => write!(
                f,
                "Cannot extend previously defined table `{key}` with a dotted key"
            ),

            IntOverflow => write!(
                f,
                "Integer literal overflow, number doesn't fit into a 64-bit signed integer"
            ),
        }
    }
}

/// Position information for a failed parse, rendered as
///
/// ```text
/// error parsing TOML document on line L, column C
/// <snippet>
/// <spaces>^
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostics {
    /// 1-based line of the error.
    pub line: u32,
    /// 1-based column (byte offset within the line) of the error.
    pub column: u32,
    /// The offending input line.
    pub snippet: String,
    /// Human readable description of the failure.
    pub message: String,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "error parsing TOML document on line {}, column {}",
            self.line, self.column
        )?;
        writeln!(f, "{}", self.snippet)?;
        for _ in 1..self.column {
            f.write_str(" ")?;
        }
        f.write_str("^")
    }
}
