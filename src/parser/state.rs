//! # Parser State Management
//!
//! Infrastructure for the parser combinators:
//!
//! - **ParseState**: token stream position, backtracking, and
//!   furthest-error tracking
//! - **ParseError**: structured parse failures
//! - **Parser trait**: the interface every parser implements
//!
//! ## Backtracking
//!
//! Alternatives are tried by saving and restoring the stream position:
//!
//! ```text
//! let pos = state.position();
//! match parser.parse(state) {
//!     Ok(result) => result,
//!     Err(_) => {
//!         state.restore(pos);
//!         alternative.parse(state)
//!     }
//! }
//! ```
//!
//! ## Furthest-Error Tracking
//!
//! When several alternatives fail, the useful diagnostic is the one at
//! the furthest position the parser reached. `record_error` keeps that
//! error, merging the expected-token sets of errors at the same position
//! into messages like "expected identifier or '('".

use lachs::Span;

use crate::lexer::Token;

/// Structured parse error with context information.
///
/// # Fields
///
/// * `message` - Human-readable error description
/// * `span` - Optional source location
/// * `expected` - What tokens/constructs were expected
/// * `found` - What was actually found (if available)
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Option<Box<Span>>,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    /// Create a new parse error with a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            span: None,
            expected: vec![],
            found: None,
        }
    }

    /// Add an expected token/construct to this error.
    pub fn expected(mut self, what: impl Into<String>) -> Self {
        self.expected.push(what.into());
        self
    }

    /// Set what was actually found.
    pub fn found(mut self, what: impl Into<String>) -> Self {
        self.found = Some(what.into());
        self
    }

    /// Set the source location for this error.
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(Box::new(span));
        self
    }

    /// Merge the expected tokens of another error into this one.
    ///
    /// Used when alternatives fail at the same position, so the final
    /// message lists every possibility.
    pub fn merge_expected(mut self, other: &ParseError) -> Self {
        for exp in &other.expected {
            if !self.expected.contains(exp) {
                self.expected.push(exp.clone());
            }
        }
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = if !self.expected.is_empty() {
            let expected_str = if self.expected.len() == 1 {
                self.expected[0].clone()
            } else {
                let (last, rest) = self.expected.split_last().unwrap();
                format!("{} or {}", rest.join(", "), last)
            };
            match &self.found {
                Some(found) => format!("expected {}, found {}", expected_str, found),
                None => format!("expected {}", expected_str),
            }
        } else {
            self.message.clone()
        };

        if let Some(span) = &self.span {
            write!(f, "{}", span.to_string(&msg))
        } else {
            write!(f, "Parse error: {}", msg)
        }
    }
}

impl std::error::Error for ParseError {}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parser state: token stream, position, and furthest-error tracking.
pub struct ParseState {
    /// The complete token stream being parsed
    tokens: Vec<Token>,

    /// Current position in the token stream (index of next token to read)
    index: usize,

    /// Error at the furthest position reached during parsing
    ///
    /// In recursive-descent parsing the real error is usually at the
    /// furthest point the parser could read before failing completely.
    furthest_error: Option<(usize, ParseError)>,
}

impl ParseState {
    /// Create a new parse state from a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            furthest_error: None,
        }
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Check if there are more tokens to consume.
    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Get the current position in the token stream.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Restore the parser to a previous position (backtracking).
    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    /// Record an error, keeping the one at the furthest position.
    ///
    /// Errors at the same position have their expected sets merged;
    /// errors before the furthest position are dropped.
    pub fn record_error(&mut self, error: ParseError) {
        match &self.furthest_error {
            Some((pos, _)) if *pos > self.index => {
                // Keep the existing error, it is further along
            }
            Some((pos, existing)) if *pos == self.index => {
                let merged = existing.clone().merge_expected(&error);
                self.furthest_error = Some((self.index, merged));
            }
            _ => {
                self.furthest_error = Some((self.index, error));
            }
        }
    }

    /// Get the furthest error encountered during parsing.
    pub fn furthest_error(&self) -> Option<&ParseError> {
        self.furthest_error.as_ref().map(|(_, e)| e)
    }

    /// Create an error at the current position with span info.
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        let msg = message.into();
        match self.peek() {
            Some(tok) => ParseError::new(msg).at(tok.pos()).found(tok.describe()),
            None => ParseError::new(msg).found("end of input".to_string()),
        }
    }
}

/// Generic parser trait.
///
/// Implemented by every parser, including plain functions of the matching
/// signature.
pub trait Parser<T>: Sized {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
