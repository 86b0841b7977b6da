//! Fatal parse errors and the crate's top-level error type
//!
//! Seven fatal parse-error codes, each located at a token position and
//! surfaced as a `Result` rather than terminating from inside a validator,
//! letting the caller decide when and how to exit.

use std::fmt;

use super::token::Token;

/// One of the seven fatal parse-error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    NumExpected,
    SymExpected,
    MarieExpected,
    SymTooLong,
    TooManyDefInModule,
    TooManyUseInModule,
    TooManyInstr,
}

impl ParseErrorCode {
    fn name(self) -> &'static str {
        match self {
            ParseErrorCode::NumExpected => "NUM_EXPECTED",
            ParseErrorCode::SymExpected => "SYM_EXPECTED",
            ParseErrorCode::MarieExpected => "MARIE_EXPECTED",
            ParseErrorCode::SymTooLong => "SYM_TOO_LONG",
            ParseErrorCode::TooManyDefInModule => "TOO_MANY_DEF_IN_MODULE",
            ParseErrorCode::TooManyUseInModule => "TOO_MANY_USE_IN_MODULE",
            ParseErrorCode::TooManyInstr => "TOO_MANY_INSTR",
        }
    }
}

/// A fatal parse error located at a specific token position.
#[derive(Debug, Clone)]
pub struct ParseError {
    code: ParseErrorCode,
    line: usize,
    offset: usize,
}

impl ParseError {
    pub fn new(code: ParseErrorCode, token: &Token) -> ParseError {
        ParseError {
            code,
            line: token.line_number(),
            offset: token.line_offset(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse Error line {} offset {}: {}",
            self.line,
            self.offset,
            self.code.name()
        )
    }
}

impl std::error::Error for ParseError {}

/// Top-level error returned by [`crate::linker::link`] and
/// [`crate::linker::link_from_file`].
#[derive(Debug, Clone)]
pub enum Error {
    /// The input could not be tokenized into a valid module sequence.
    Parse(ParseError),
    /// The input file could not be read.
    ReadError { path: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::ReadError { path } => write!(f, "Unable to open file {}", path),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        Error::Parse(e)
    }
}
