//! Parser for the rule-description format.
//!
//! ```text
//! ruleset := rule*
//! rule    := '{' name ',' name '}' '[' qchar ',' qchar ',' dir ']' weight?
//! name    := one or more characters other than [ ] { } % , and whitespace
//! qchar   := "'" any-single-character "'"
//! dir     := L | R | S | B   (any case)
//! weight  := '%' integer
//! ```
//!
//! Whitespace between tokens is ignored. The whole input must parse; there is
//! no recovery, so a malformed rule set never yields a table.

use crate::direction::Turn;
use crate::rule::{Rule, RuleError, Weight};
use crate::table::TransitionTable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use thiserror::Error;
use tracing::debug;

/// What went wrong at a [`ParseError`] position.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found:?}")]
    Unexpected { expected: &'static str, found: char },
    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: &'static str },
    #[error("expected a state name")]
    EmptyName,
    #[error("invalid direction {0:?} (expected one of L, R, S, B)")]
    InvalidDirection(char),
    #[error("expected digits after '%'")]
    MissingWeight,
    #[error("weight does not fit in {} bits", Weight::BITS)]
    WeightOverflow,
    #[error(transparent)]
    InvalidRule(#[from] RuleError),
}

/// A malformed rule description.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct ParseError {
    /// 1-based line of the offending character.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Byte offset into the input.
    pub offset: usize,
    pub kind: ParseErrorKind,
}

/// Failure to load a rule file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

const NAME_TERMINATORS: &[char] = &['[', ']', '{', '}', '%', ','];

/// Parses a rule set and builds its transition table.
pub fn parse(text: &str) -> Result<TransitionTable, ParseError> {
    Ok(TransitionTable::from_rules(parse_rules(text)?))
}

/// Parses a rule set into its rules, in input order.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, ParseError> {
    let mut cursor = Cursor::new(text);
    let mut rules = Vec::new();
    cursor.skip_whitespace();
    while !cursor.is_eof() {
        rules.push(cursor.rule()?);
        cursor.skip_whitespace();
    }
    debug!(rules = rules.len(), "parsed rule set");
    Ok(rules)
}

/// Reads and parses a rule file.
pub fn load(path: impl AsRef<Path>) -> Result<TransitionTable, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Clone, Copy)]
struct Mark {
    line: usize,
    column: usize,
    offset: usize,
}

impl Mark {
    fn error(self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            offset: self.offset,
            kind,
        }
    }
}

struct Cursor<'a> {
    chars: Chars<'a>,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.mark().error(kind)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(found) => self.error(ParseErrorKind::Unexpected { expected, found }),
            None => self.error(ParseErrorKind::UnexpectedEof { expected }),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Skips whitespace, then consumes `c`.
    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn name(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || NAME_TERMINATORS.contains(&c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::EmptyName));
        }
        Ok(name)
    }

    /// A single quoted character. The quoted character itself may be anything,
    /// including whitespace or a quote.
    fn quoted_char(&mut self) -> Result<char, ParseError> {
        self.expect('\'', "opening quote")?;
        let Some(c) = self.bump() else {
            return Err(self.unexpected("a symbol"));
        };
        if self.peek() != Some('\'') {
            return Err(self.unexpected("closing quote"));
        }
        self.bump();
        Ok(c)
    }

    /// A direction letter, optionally wrapped in single quotes.
    fn direction(&mut self) -> Result<Turn, ParseError> {
        self.skip_whitespace();
        let quoted = self.peek() == Some('\'');
        if quoted {
            self.bump();
        }
        let Some(c) = self.peek() else {
            return Err(self.unexpected("a direction"));
        };
        let turn =
            Turn::from_code(c).ok_or_else(|| self.error(ParseErrorKind::InvalidDirection(c)))?;
        self.bump();
        if quoted {
            if self.peek() != Some('\'') {
                return Err(self.unexpected("closing quote"));
            }
            self.bump();
        }
        Ok(turn)
    }

    /// Decimal digits following `%`.
    fn weight(&mut self) -> Result<Weight, ParseError> {
        let start = self.mark();
        let mut value: Weight = 0;
        let mut digits = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(d))
                .ok_or_else(|| start.error(ParseErrorKind::WeightOverflow))?;
            digits += 1;
            self.bump();
        }
        if digits == 0 {
            return Err(self.error(ParseErrorKind::MissingWeight));
        }
        Ok(value)
    }

    fn rule(&mut self) -> Result<Rule, ParseError> {
        self.expect('{', "'{'")?;
        let source = self.name()?;
        self.expect(',', "','")?;
        let target = self.name()?;
        self.expect('}', "'}'")?;
        self.expect('[', "'['")?;
        let read = self.quoted_char()?;
        self.expect(',', "','")?;
        let write = self.quoted_char()?;
        self.expect(',', "','")?;
        let turn = self.direction()?;
        self.expect(']', "']'")?;

        let rule = Rule::new(source, target, read, write, turn);
        self.skip_whitespace();
        if self.peek() != Some('%') {
            return Ok(rule);
        }
        self.bump();
        self.skip_whitespace();
        let at = self.mark();
        let weight = self.weight()?;
        rule.with_weight(weight).map_err(|e| at.error(e.into()))
    }
}
