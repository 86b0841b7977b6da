//! Positioned token stream over an in-memory source buffer
//!
//! This tokenizer keeps an explicit column cursor per line and reports the
//! 1-based column of each token's first character directly, rather than
//! conflating byte offsets with delimiter counts.

use regex::Regex;

/// One token and the line/column where it starts. The empty-contents token
/// represents end-of-stream; see [`Tokenizer::next`] for its position rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    line_number: usize,
    line_offset: usize,
    contents: String,
}

impl Token {
    fn new(line_number: usize, line_offset: usize, contents: impl Into<String>) -> Token {
        Token {
            line_number,
            line_offset,
            contents: contents.into(),
        }
    }

    /// 1-based line number.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// 1-based column of the token's first character.
    pub fn line_offset(&self) -> usize {
        self.line_offset
    }

    /// The token's text. Empty for the end-of-stream token.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// True for the end-of-stream token.
    pub fn is_eof(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Lazily tokenizes whitespace-delimited words out of a source buffer,
/// tracking the position of the last non-empty token so that errors
/// discovered only at end-of-input can point at the right place.
pub struct Tokenizer<'a> {
    lines: Vec<&'a str>,
    line_idx: usize,
    col: usize,
    word_re: Regex,
    last_token_line: usize,
    last_token_end_col: usize,
    last_meaningful: Token,
}

impl<'a> Tokenizer<'a> {
    /// Create a fresh tokenizer over `source`. No state is shared between
    /// tokenizers — each pass of the linker constructs its own.
    pub fn new(source: &'a str) -> Tokenizer<'a> {
        Tokenizer {
            lines: source.lines().collect(),
            line_idx: 0,
            col: 0,
            word_re: Regex::new(r"\S+").unwrap(),
            last_token_line: 0,
            last_token_end_col: 1,
            last_meaningful: Token::new(0, 1, ""),
        }
    }

    /// Return the next token, or the empty end-of-stream token once the
    /// buffer is exhausted. Idempotent once end-of-stream is reached.
    pub fn next(&mut self) -> Token {
        loop {
            if self.line_idx >= self.lines.len() {
                return self.eof_token();
            }

            let line = self.lines[self.line_idx];
            match self.word_re.find_at(line, self.col) {
                Some(mat) => {
                    self.col = mat.end();
                    let token = Token::new(self.line_idx + 1, mat.start() + 1, mat.as_str());
                    self.last_token_line = token.line_number;
                    self.last_token_end_col = token.line_offset + token.contents.len();
                    self.last_meaningful = token.clone();
                    return token;
                }
                None => {
                    self.line_idx += 1;
                    self.col = 0;
                }
            }
        }
    }

    /// The last non-empty token produced on this stream so far.
    pub fn last_meaningful(&self) -> Token {
        self.last_meaningful.clone()
    }

    fn eof_token(&self) -> Token {
        if self.lines.len() > self.last_token_line {
            Token::new(self.lines.len(), 1, "")
        } else {
            Token::new(self.last_token_line, self.last_token_end_col, "")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_space_and_tab() {
        let mut t = Tokenizer::new("1 A 0\t1 A  1 E 1000");
        let words: Vec<String> = std::iter::from_fn(|| {
            let tok = t.next();
            if tok.is_eof() { None } else { Some(tok.contents().to_string()) }
        })
        .collect();
        assert_eq!(words, vec!["1", "A", "0", "1", "A", "1", "E", "1000"]);
    }

    #[test]
    fn reports_line_and_column() {
        let mut t = Tokenizer::new("  foo bar\nbaz");
        let a = t.next();
        assert_eq!((a.line_number(), a.line_offset(), a.contents()), (1, 3, "foo"));
        let b = t.next();
        assert_eq!((b.line_number(), b.line_offset(), b.contents()), (1, 7, "bar"));
        let c = t.next();
        assert_eq!((c.line_number(), c.line_offset(), c.contents()), (2, 1, "baz"));
    }

    #[test]
    fn eof_points_after_last_token_on_same_line() {
        let mut t = Tokenizer::new("1 A 0");
        for _ in 0..3 {
            t.next();
        }
        let eof = t.next();
        assert!(eof.is_eof());
        assert_eq!((eof.line_number(), eof.line_offset()), (1, 6));
    }

    #[test]
    fn eof_points_at_trailing_blank_line_column_one() {
        let mut t = Tokenizer::new("1 A 0\n\n");
        for _ in 0..3 {
            t.next();
        }
        let eof = t.next();
        assert!(eof.is_eof());
        assert_eq!((eof.line_number(), eof.line_offset()), (2, 1));
    }

    #[test]
    fn eof_on_empty_input_is_line_zero() {
        let mut t = Tokenizer::new("");
        let eof = t.next();
        assert!(eof.is_eof());
        assert_eq!((eof.line_number(), eof.line_offset()), (0, 1));
    }

    #[test]
    fn eof_is_idempotent() {
        let mut t = Tokenizer::new("a");
        t.next();
        let first = t.next();
        let second = t.next();
        assert_eq!(first, second);
    }

    #[test]
    fn last_meaningful_survives_past_eof() {
        let mut t = Tokenizer::new("X 5");
        t.next();
        t.next();
        t.next(); // eof
        let last = t.last_meaningful();
        assert_eq!(last.contents(), "5");
    }
}
