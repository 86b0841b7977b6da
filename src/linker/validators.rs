//! Pure token validators: integer, general symbol, MARIE addressing letter
//!
//! Each validator accepts a [`Token`] plus the tokenizer's current
//! `last_meaningful` token, so that a validator invoked on the end-of-stream
//! token reports the position of the previous real token's tail rather than
//! whatever position the empty token itself carries. In practice the empty
//! token already carries that exact position (see `token.rs`), so this is
//! belt-and-suspenders rather than a behavioral difference.

use super::diagnostics::{ParseError, ParseErrorCode};
use super::token::Token;

const MAX_SYMBOL_LEN: usize = 16;

fn error_position<'a>(token: &'a Token, last_meaningful: &'a Token) -> &'a Token {
    if token.is_eof() { last_meaningful } else { token }
}

/// Parse a token as a base-10 integer (error code 0 / NUM_EXPECTED).
pub fn read_integer(token: &Token, last_meaningful: &Token) -> Result<i64, ParseError> {
    token.contents().parse::<i64>().map_err(|_| {
        ParseError::new(
            ParseErrorCode::NumExpected,
            error_position(token, last_meaningful),
        )
    })
}

/// Parse a token as a general symbol: first character alphabetic, remaining
/// characters alphanumeric, length between 1 and 16 inclusive.
///
/// Error code 1 / SYM_EXPECTED for an empty token or illegal characters;
/// error code 3 / SYM_TOO_LONG for a well-formed symbol longer than 16
/// characters.
pub fn read_symbol(token: &Token, last_meaningful: &Token) -> Result<String, ParseError> {
    let contents = token.contents();
    let mut chars = contents.chars();
    let valid_shape = match chars.next() {
        Some(first) => first.is_alphabetic() && chars.clone().all(|c| c.is_alphanumeric()),
        None => false,
    };
    if !valid_shape {
        return Err(ParseError::new(
            ParseErrorCode::SymExpected,
            error_position(token, last_meaningful),
        ));
    }
    if contents.len() > MAX_SYMBOL_LEN {
        return Err(ParseError::new(
            ParseErrorCode::SymTooLong,
            error_position(token, last_meaningful),
        ));
    }
    Ok(contents.to_string())
}

/// Parse a token as exactly one of the MARIE addressing-mode letters.
/// Error code 2 / MARIE_EXPECTED otherwise.
pub fn read_marie(token: &Token, last_meaningful: &Token) -> Result<char, ParseError> {
    let contents = token.contents();
    let mut chars = contents.chars();
    match (chars.next(), chars.next()) {
        (Some('M'), None) => Ok('M'),
        (Some('A'), None) => Ok('A'),
        (Some('R'), None) => Ok('R'),
        (Some('I'), None) => Ok('I'),
        (Some('E'), None) => Ok('E'),
        _ => Err(ParseError::new(
            ParseErrorCode::MarieExpected,
            error_position(token, last_meaningful),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(contents: &str) -> Token {
        let mut t = super::super::token::Tokenizer::new(contents);
        t.next()
    }

    #[test]
    fn integer_accepts_plain_numbers() {
        let t = tok("42");
        assert_eq!(read_integer(&t, &t).unwrap(), 42);
    }

    #[test]
    fn integer_rejects_non_numeric() {
        let t = tok("abc");
        assert!(read_integer(&t, &t).is_err());
    }

    #[test]
    fn symbol_accepts_alpha_then_alnum() {
        let t = tok("Foo123");
        assert_eq!(read_symbol(&t, &t).unwrap(), "Foo123");
    }

    #[test]
    fn symbol_rejects_leading_digit() {
        let t = tok("1abc");
        assert!(read_symbol(&t, &t).is_err());
    }

    #[test]
    fn symbol_rejects_too_long() {
        let t = tok("ABCDEFGHIJKLMNOPQ"); // 17 chars
        let err = read_symbol(&t, &t).unwrap_err();
        assert_eq!(format!("{err}"), format!("Parse Error line {} offset {}: SYM_TOO_LONG", t.line_number(), t.line_offset()));
    }

    #[test]
    fn marie_accepts_each_letter() {
        for letter in ["M", "A", "R", "I", "E"] {
            let t = tok(letter);
            assert_eq!(read_marie(&t, &t).unwrap().to_string(), letter);
        }
    }

    #[test]
    fn marie_rejects_other_letters() {
        let t = tok("X");
        assert!(read_marie(&t, &t).is_err());
    }

    #[test]
    fn eof_token_reports_last_meaningful_position() {
        let mut tokenizer = super::super::token::Tokenizer::new("VALID");
        let last = tokenizer.next();
        let eof = tokenizer.next();
        assert!(eof.is_eof());
        let err = read_integer(&eof, &tokenizer.last_meaningful()).unwrap_err();
        assert_eq!(
            format!("{err}"),
            format!("Parse Error line {} offset {}: NUM_EXPECTED", last.line_number(), last.line_offset() + last.contents().len())
        );
    }
}
