//! On-demand tokenizer backed by the PEST token grammar.
//!
//! Tokens are produced one at a time so that a parse can fail on an early
//! token (e.g. an unknown type keyword) without looking at the rest of the input.

use crate::error::{Location, ParseError, ParseErrorKind};
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct TokenGrammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Integer,
    Float,
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source, pos: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Offset of the next token (after any whitespace).
    pub fn offset(&self) -> usize {
        let rest = &self.source[self.pos..];
        self.pos + (rest.len() - rest.trim_start().len())
    }

    pub fn location(&self) -> Location {
        Location::in_source(self.source, self.offset())
    }

    /// Look at the next token without consuming it. `None` at end of input.
    pub fn peek(&self) -> Result<Option<Token<'a>>, ParseError> {
        let start = self.offset();
        let rest = &self.source[start..];
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };
        let unexpected = || {
            ParseError::new(
                Location::in_source(self.source, start),
                ParseErrorKind::UnexpectedChar(first),
            )
        };
        let token = TokenGrammar::parse(Rule::token, rest)
            .map_err(|_| unexpected())?
            .next()
            .and_then(|pair| pair.into_inner().next())
            .ok_or_else(unexpected)?;
        let kind = match token.as_rule() {
            Rule::float_lit => TokenKind::Float,
            Rule::int_lit => TokenKind::Integer,
            Rule::ident => TokenKind::Ident,
            Rule::punct => TokenKind::Punct,
            _ => return Err(unexpected()),
        };
        Ok(Some(Token { kind, text: token.as_str(), offset: start }))
    }

    /// Consume a token previously returned by [`Lexer::peek`].
    pub fn bump(&mut self, token: &Token<'a>) {
        self.pos = token.end();
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        let token = self.peek()?;
        if let Some(t) = &token {
            self.bump(t);
        }
        Ok(token)
    }
}
