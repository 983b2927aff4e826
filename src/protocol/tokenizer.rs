//! Order-file tokenizer.
//!
//! Splits a species' order file into `OrderLine`s: one per non-blank line,
//! with the leading command word matched against the combat vocabulary and
//! the remainder kept for operand parsing. `;` starts a comment.

use std::fmt;

use thiserror::Error;

/// Errors raised while reading an operand.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {expected}: '{found}'")]
    NotANumber {
        expected: &'static str,
        found: String,
    },
}

/// Command keywords recognized by the order tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Attack,
    Battle,
    End,
    Engage,
    Haven,
    Hide,
    Hijack,
    Message,
    Start,
    Summary,
    Target,
    Withdraw,
    Zzz,
}

/// All keywords in matching order.
pub const ALL_KEYWORDS: [Keyword; 13] = [
    Keyword::Attack,
    Keyword::Battle,
    Keyword::End,
    Keyword::Engage,
    Keyword::Haven,
    Keyword::Hide,
    Keyword::Hijack,
    Keyword::Message,
    Keyword::Start,
    Keyword::Summary,
    Keyword::Target,
    Keyword::Withdraw,
    Keyword::Zzz,
];

/// Shortest accepted abbreviation of a keyword or section name.
const MIN_ABBREV: usize = 3;

impl Keyword {
    /// Returns the canonical uppercase spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Keyword::Attack => "ATTACK",
            Keyword::Battle => "BATTLE",
            Keyword::End => "END",
            Keyword::Engage => "ENGAGE",
            Keyword::Haven => "HAVEN",
            Keyword::Hide => "HIDE",
            Keyword::Hijack => "HIJACK",
            Keyword::Message => "MESSAGE",
            Keyword::Start => "START",
            Keyword::Summary => "SUMMARY",
            Keyword::Target => "TARGET",
            Keyword::Withdraw => "WITHDRAW",
            Keyword::Zzz => "ZZZ",
        }
    }

    /// Matches a command word: at least three letters, a case-insensitive
    /// prefix of the keyword.
    pub fn from_word(word: &str) -> Option<Keyword> {
        ALL_KEYWORDS
            .iter()
            .copied()
            .find(|k| abbreviates(word, k.name()))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if `word` is an accepted abbreviation of `full`.
pub fn abbreviates(word: &str, full: &str) -> bool {
    word.len() >= MIN_ABBREV
        && word.len() <= full.len()
        && full.as_bytes()[..word.len()].eq_ignore_ascii_case(word.as_bytes())
}

/// One command line from an order file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// 1-based line number in the source file.
    pub line: usize,
    /// The command word as written.
    pub word: String,
    pub keyword: Option<Keyword>,
    /// The line as written, minus comment and surrounding whitespace.
    pub text: String,
    args: String,
}

impl OrderLine {
    /// Returns a cursor over this line's operands.
    pub fn operands(&self) -> Operands<'_> {
        Operands { rest: &self.args }
    }

    pub fn is(&self, keyword: Keyword) -> bool {
        self.keyword == Some(keyword)
    }
}

/// Tokenizes a whole order file.
pub fn tokenize(source: &str) -> Vec<OrderLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| tokenize_line(i + 1, raw))
        .collect()
}

/// Tokenizes a single line. Returns `None` for blank or comment-only lines.
pub fn tokenize_line(line: usize, raw: &str) -> Option<OrderLine> {
    let text = match raw.find(';') {
        Some(pos) => &raw[..pos],
        None => raw,
    }
    .trim();
    if text.is_empty() {
        return None;
    }

    let (word, args) = match text.find(|c: char| c.is_whitespace() || c == ',') {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    };

    Some(OrderLine {
        line,
        word: word.to_string(),
        keyword: Keyword::from_word(word),
        text: text.to_string(),
        args: args.to_string(),
    })
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Cursor over the operands of one order line.
#[derive(Debug, Clone)]
pub struct Operands<'a> {
    rest: &'a str,
}

impl<'a> Operands<'a> {
    /// Creates a cursor over arbitrary operand text.
    pub fn new(rest: &'a str) -> Self {
        Operands { rest }
    }

    /// Returns the next whitespace- or comma-delimited word.
    pub fn word(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start_matches(is_separator);
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed.find(is_separator).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(word)
    }

    /// Reads a signed decimal integer.
    pub fn int(&mut self, expected: &'static str) -> Result<i64, TokenError> {
        let word = self.word().ok_or(TokenError::Missing(expected))?;
        word.parse::<i64>().map_err(|_| TokenError::NotANumber {
            expected,
            found: word.to_string(),
        })
    }

    /// Returns the next operand as an integer without consuming it.
    pub fn peek_int(&self) -> Option<i64> {
        self.clone().word().and_then(|w| w.parse().ok())
    }

    /// Consumes the rest of the line as free text.
    pub fn text(&mut self, expected: &'static str) -> Result<&'a str, TokenError> {
        let text = self.rest.trim_matches(is_separator);
        self.rest = "";
        if text.is_empty() {
            Err(TokenError::Missing(expected))
        } else {
            Ok(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rest.trim_matches(is_separator).is_empty()
    }
}
