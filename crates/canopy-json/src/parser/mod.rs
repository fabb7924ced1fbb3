pub(crate) mod grammar;

use crate::dom::Json;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::limit::LimitTracker;

/// Containers nested deeper than this stop the descent with an `Error`
/// node. Chosen to stay comfortably inside the default thread stack.
const DEFAULT_RECURSION_LIMIT: usize = 500;

/// Recursive-descent JSON parser.
///
/// Parse failures never panic: they come back as an `Error` node carrying a
/// static message.
///
/// ## Example
/// ```rust
/// use canopy_json::{JsonKind, Parser};
///
/// let doc = Parser::new(r#"{"a":[1,2]}"#).parse();
/// assert_eq!(doc.kind(), JsonKind::Object);
/// assert_eq!(doc.object_len(), 1);
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    recursion: LimitTracker,
}

impl<'a> Parser<'a> {
    /// Create a new instance of a parser given an input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            recursion: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// Configure the container nesting limit to use while parsing.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion = LimitTracker::new(limit);
        self
    }

    /// Parse the input and return the document root.
    pub fn parse(mut self) -> Json<'static> {
        grammar::value(&mut self)
    }

    pub(crate) fn peek(&self) -> Token<'a> {
        self.lexer.peek()
    }

    /// Consume the look-ahead token.
    pub(crate) fn bump(&mut self) {
        self.lexer.next();
    }

    pub(crate) fn skip(&mut self, kinds: &[TokenKind]) {
        self.lexer.skip(kinds);
    }

    pub(crate) fn source(&self) -> &'a str {
        self.lexer.source()
    }

    /// Resynchronize the lexer one nesting level above after a malformed
    /// value, so an enclosing composite can keep consuming.
    pub(crate) fn recover(&mut self) {
        self.lexer.recover_depth_above();
    }

    pub(crate) fn descend(&mut self) -> bool {
        self.recursion.consume();
        !self.recursion.limited()
    }

    pub(crate) fn ascend(&mut self) {
        self.recursion.release();
    }
}
