//! Line grammar of adjustment rules.
//!
//! ```text
//! line    := ws* ( '#' any* | rule )? ws*
//! rule    := target ( ws+ accessor )? ( ws+ '$' flag )? ws+ op error
//! op      := '+' | '-'
//! ```
//!
//! Identifiers are runs of id characters (letters, digits and the
//! punctuation used by documentation ids). Every malformed position yields
//! one error anchored to its exact byte span; the caller skips the line.

use crate::rule_set::RuleKind;
use std::fmt;
use throwdoc_common::{Accessor, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    ExpectedIdentifier,
    ExpectedSpace,
    ExpectedOperator,
    ExpectedEndOfLine,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExpectedIdentifier => "expected identifier",
            Self::ExpectedSpace => "expected space",
            Self::ExpectedOperator => "expected '+' or '-'",
            Self::ExpectedEndOfLine => "expected end of line",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSyntaxError {
    pub kind: SyntaxErrorKind,
    /// 1-based line number.
    pub line: u32,
    /// Byte span in the whole source text.
    pub span: Span,
}

impl fmt::Display for RuleSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// One successfully parsed rule line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleLine {
    /// Absent only for inline overlays that apply to a whole statement.
    pub target: Option<String>,
    pub target_span: Span,
    pub accessor: Accessor,
    pub flag: Option<String>,
    pub kind: RuleKind,
    pub error_type: String,
    pub error_span: Span,
}

/// Characters allowed in documentation ids besides alphanumerics.
#[inline]
const fn is_id_punct(b: u8) -> bool {
    matches!(
        b,
        b'_' | b'.' | b':' | b'#' | b'`' | b'(' | b')' | b',' | b'[' | b']' | b'{' | b'}'
            | b'~' | b'@' | b'*' | b'&' | b'<' | b'>' | b'!' | b'\''
    )
}

#[inline]
const fn is_id_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || is_id_punct(b) || b >= 0x80
}

#[inline]
const fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

struct LineScanner<'a> {
    bytes: &'a [u8],
    text: &'a str,
    pos: usize,
    base: u32,
    line: u32,
}

impl<'a> LineScanner<'a> {
    fn error(&self, kind: SyntaxErrorKind, start: usize, end: usize) -> RuleSyntaxError {
        let end = end.max(start);
        RuleSyntaxError {
            kind,
            line: self.line,
            span: Span::new(self.base + start as u32, self.base + end as u32),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_spaces(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Span of the token starting at the cursor (up to the next space).
    fn bad_token_end(&self) -> usize {
        let mut end = self.pos;
        while end < self.bytes.len() && !is_space(self.bytes[end]) {
            end += 1;
        }
        end.max(self.pos + 1).min(self.bytes.len().max(self.pos))
    }

    fn identifier(&mut self) -> Result<(&'a str, Span), RuleSyntaxError> {
        let start = self.pos;
        while self.peek().is_some_and(is_id_byte) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error(
                SyntaxErrorKind::ExpectedIdentifier,
                start,
                self.bad_token_end(),
            ));
        }
        let span = Span::new(self.base + start as u32, self.base + self.pos as u32);
        Ok((&self.text[start..self.pos], span))
    }

    /// At least one space, or end of line when `allow_end` is set.
    fn require_space(&mut self, allow_end: bool) -> Result<(), RuleSyntaxError> {
        if allow_end && self.at_end() {
            return Ok(());
        }
        if self.skip_spaces() == 0 {
            return Err(self.error(SyntaxErrorKind::ExpectedSpace, self.pos, self.pos + 1));
        }
        Ok(())
    }

    fn operator(&mut self) -> Result<RuleKind, RuleSyntaxError> {
        match self.peek() {
            Some(b'+') => {
                self.pos += 1;
                Ok(RuleKind::Add)
            }
            Some(b'-') => {
                self.pos += 1;
                Ok(RuleKind::Remove)
            }
            _ => Err(self.error(SyntaxErrorKind::ExpectedOperator, self.pos, self.bad_token_end())),
        }
    }
}

/// Parse one line.
///
/// `base` is the byte offset of the line in the whole text. Returns
/// `Ok(None)` for blank and comment lines. With `target_optional` a line may
/// start directly with the operator (inline statement overlays).
pub fn parse_rule_line(
    line: &str,
    base: u32,
    line_number: u32,
    target_optional: bool,
) -> Result<Option<RuleLine>, RuleSyntaxError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut scanner = LineScanner {
        bytes: line.as_bytes(),
        text: line,
        pos: 0,
        base,
        line: line_number,
    };

    scanner.skip_spaces();
    if scanner.at_end() || scanner.peek() == Some(b'#') {
        return Ok(None);
    }

    let mut target = None;
    let mut target_span = Span::at(base);
    let starts_with_operator = matches!(scanner.peek(), Some(b'+' | b'-'));
    if !(target_optional && starts_with_operator) {
        let (text, span) = scanner.identifier()?;
        target = Some(text.to_string());
        target_span = span;
        scanner.require_space(false)?;
    }

    let mut accessor = Accessor::None;
    let mut flag = None;
    if !matches!(scanner.peek(), Some(b'+' | b'-' | b'$')) {
        // Optional accessor keyword.
        let start = scanner.pos;
        if scanner.at_end() {
            return Err(scanner.error(SyntaxErrorKind::ExpectedOperator, start, start));
        }
        let word = match scanner.identifier() {
            Ok((word, _)) => word,
            Err(_) => {
                return Err(scanner.error(
                    SyntaxErrorKind::ExpectedOperator,
                    start,
                    scanner.bad_token_end(),
                ));
            }
        };
        accessor = match Accessor::parse(word) {
            Some(accessor) => accessor,
            None => {
                return Err(scanner.error(SyntaxErrorKind::ExpectedOperator, start, scanner.pos));
            }
        };
        scanner.require_space(false)?;
    }

    if scanner.peek() == Some(b'$') {
        scanner.pos += 1;
        let (name, _) = scanner.identifier()?;
        flag = Some(name.to_string());
        scanner.require_space(false)?;
    }

    let kind = scanner.operator()?;
    let (error_type, error_span) = scanner.identifier()?;
    let error_type = error_type.to_string();

    scanner.skip_spaces();
    if !scanner.at_end() && scanner.peek() != Some(b'#') {
        let start = scanner.pos;
        return Err(scanner.error(
            SyntaxErrorKind::ExpectedEndOfLine,
            start,
            scanner.bad_token_end(),
        ));
    }

    Ok(Some(RuleLine {
        target,
        target_span,
        accessor,
        flag,
        kind,
        error_type,
        error_span,
    }))
}
