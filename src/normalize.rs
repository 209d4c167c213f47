//! Field normalization for raw incident columns.
//!
//! Every function here is total: malformed input degrades to `None` or an
//! empty list instead of an error, so a single bad cell never drops a row.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the embedded-epoch encoding anywhere in the cell, e.g.
/// `Date(1699999999000)` or `/Date(1699999999000)/`.
static EPOCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*\(\s*([+-]?\d+)\s*\)")
        .unwrap_or_else(|_| unreachable!())
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Decode a timestamp cell.
///
/// Accepts either a date-like string or the embedded-epoch encoding
/// (milliseconds since the Unix epoch inside a `Name(...)` wrapper). Epochs
/// are truncated to whole seconds; negative epochs are treated as garbage.
#[must_use]
pub fn decode_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = EPOCH_RE.captures(s) {
        let millis: i64 = caps.get(1)?.as_str().parse().ok()?;
        return decode_epoch_millis(millis);
    }
    parse_date_like(s)
}

fn decode_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    if millis < 0 {
        return None;
    }
    DateTime::from_timestamp(millis / 1000, 0).map(|dt| dt.naive_utc())
}

fn parse_date_like(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `(year, month)` of a decoded timestamp; both missing when it is missing.
#[must_use]
pub fn calendar_fields(ts: Option<NaiveDateTime>) -> (Option<i32>, Option<u32>) {
    match ts {
        Some(ts) => (Some(ts.year()), Some(ts.month())),
        None => (None, None),
    }
}

#[must_use]
pub fn trim_name(raw: &str) -> String {
    raw.trim().to_string()
}

/// A value accepted by the literal-only list parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    /// Lists and tuples both decode to a sequence.
    Seq(Vec<Literal>),
}

/// Decode a stringified list of names such as `"['Lake', 'Napa']"`.
///
/// Only literals are understood (strings, numbers, lists, tuples, booleans
/// and `None`); anything else, including absent input, yields an empty list.
/// Non-string elements are dropped.
#[must_use]
pub fn decode_list_literal(raw: Option<&str>) -> Vec<String> {
    let Some(s) = raw else {
        return Vec::new();
    };
    match parse_literal(s) {
        Some(Literal::Seq(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Literal::Str(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Literal::Str(s)) => vec![s],
        _ => Vec::new(),
    }
}

/// Parse a complete literal expression; trailing input is rejected.
#[must_use]
pub fn parse_literal(s: &str) -> Option<Literal> {
    let mut parser = LiteralParser {
        chars: s.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos == parser.chars.len() {
        Some(value)
    } else {
        None
    }
}

/// Deepest list/tuple nesting the literal parser accepts.
const MAX_LITERAL_DEPTH: usize = 64;

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl LiteralParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Option<Literal> {
        self.skip_ws();
        match self.peek()? {
            '[' => {
                self.pos += 1;
                self.sequence(']').map(|(items, _)| Literal::Seq(items))
            }
            '(' => {
                self.pos += 1;
                let (mut items, saw_comma) = self.sequence(')')?;
                // `('a')` is a parenthesised string, `('a',)` a tuple.
                if items.len() == 1 && !saw_comma {
                    items.pop()
                } else {
                    Some(Literal::Seq(items))
                }
            }
            '\'' | '"' => self.string(),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            c if c.is_ascii_alphabetic() => self.keyword(),
            _ => None,
        }
    }

    fn sequence(&mut self, close: char) -> Option<(Vec<Literal>, bool)> {
        if self.depth >= MAX_LITERAL_DEPTH {
            return None;
        }
        self.depth += 1;
        let result = self.sequence_items(close);
        self.depth -= 1;
        result
    }

    fn sequence_items(&mut self, close: char) -> Option<(Vec<Literal>, bool)> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            if self.eat(close) {
                return Some((items, saw_comma));
            }
            items.push(self.value()?);
            if self.eat(',') {
                saw_comma = true;
                continue;
            }
            return if self.eat(close) {
                Some((items, saw_comma))
            } else {
                None
            };
        }
    }

    fn string(&mut self) -> Option<Literal> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(Literal::Str(out)),
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    c @ ('\\' | '\'' | '"') => out.push(c),
                    c => {
                        out.push('\\');
                        out.push(c);
                    }
                },
                '\n' => return None,
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<Literal> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            // Allow a signed exponent such as `1e-3`.
            if matches!(self.peek(), Some('e' | 'E'))
                && matches!(self.chars.get(self.pos + 1), Some('-' | '+'))
            {
                self.pos += 1;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().ok().map(Literal::Float)
        } else {
            text.parse::<i64>().ok().map(Literal::Int)
        }
    }

    fn keyword(&mut self) -> Option<Literal> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Some(Literal::Bool(true)),
            "False" => Some(Literal::Bool(false)),
            "None" => Some(Literal::None),
            _ => None,
        }
    }
}
