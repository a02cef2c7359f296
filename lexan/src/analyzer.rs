// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use std::fmt::Debug;

use crate::error::{Error, LexanError};
use crate::location::Location;
use crate::matcher::{LiteralMatcher, RegexMatcher, SkipMatcher};

/// A single recognised lexeme: its handle, matched text, and location.
#[derive(Debug, Clone)]
pub struct Token<H: Copy + Debug> {
    handle: H,
    lexeme: String,
    location: Location,
}

impl<H: Copy + Debug> Token<H> {
    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn lexeme(&self) -> &String {
        &self.lexeme
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// Tokenizes a piece of text against a fixed set of literal and regex
/// lexemes, skipping runs that match any of the skip patterns.
#[derive(Debug, Default)]
pub struct Analyzer<H: Copy + Ord + Debug> {
    literal_matcher: LiteralMatcher<H>,
    regex_matcher: RegexMatcher<H>,
    skip_matcher: SkipMatcher,
}

impl<H: Copy + Ord + Debug> Analyzer<H> {
    pub fn new<'a>(
        literal_lexemes: &[(H, &'a str)],
        regex_lexemes: &[(H, &'a str)],
        skip_regex_strs: &[&'a str],
    ) -> Result<Self, LexanError<'a, H>> {
        Ok(Self {
            literal_matcher: LiteralMatcher::new(literal_lexemes)?,
            regex_matcher: RegexMatcher::new(regex_lexemes)?,
            skip_matcher: SkipMatcher::new(skip_regex_strs)?,
        })
    }

    /// Produce a stream of tokens covering `text` up to (but not including)
    /// end of input. The final item is `None`, signalling end of input.
    pub fn injectable_token_stream<'a>(
        &'a self,
        text: &'a str,
        label: &str,
    ) -> TokenStream<'a, H> {
        TokenStream {
            analyzer: self,
            text,
            location: Location::new(label),
        }
    }
}

/// A lazily-advancing stream of tokens over borrowed source text.
pub struct TokenStream<'a, H: Copy + Ord + Debug> {
    analyzer: &'a Analyzer<H>,
    text: &'a str,
    location: Location,
}

impl<'a, H: Copy + Ord + Debug> TokenStream<'a, H> {
    pub fn location(&self) -> &Location {
        &self.location
    }

    fn skip_skippable(&mut self) {
        let count = self.analyzer.skip_matcher.skippable_count(self.text);
        if count > 0 {
            self.location.incr(&self.text[..count]);
            self.text = &self.text[count..];
        }
    }

    /// Advance and return the next token, or `Ok(None)` at end of input.
    pub fn next(&mut self) -> Result<Option<Token<H>>, Error<H>> {
        self.skip_skippable();
        if self.text.is_empty() {
            return Ok(None);
        }
        let literal = self.analyzer.literal_matcher.longest_match(self.text);
        let (regex_handles, regex_len) = self.analyzer.regex_matcher.longest_matches(self.text);
        let (handle, len) = match (literal, regex_handles.len()) {
            (Some((lhandle, llen)), 0) => (lhandle, llen),
            (Some((lhandle, llen)), _) if llen >= regex_len => (lhandle, llen),
            (None, 1) => (regex_handles[0], regex_len),
            (Some((lhandle, llen)), _) if regex_len > llen => {
                if regex_handles.len() > 1 {
                    return Err(Error::AmbiguousMatches(
                        regex_handles,
                        self.text[..regex_len].to_string(),
                        self.location.clone(),
                    ));
                }
                let _ = lhandle;
                (regex_handles[0], regex_len)
            }
            (None, n) if n > 1 => {
                return Err(Error::AmbiguousMatches(
                    regex_handles,
                    self.text[..regex_len].to_string(),
                    self.location.clone(),
                ))
            }
            _ => {
                let bad_len = self
                    .text
                    .char_indices()
                    .nth(1)
                    .map(|(i, _)| i)
                    .unwrap_or(self.text.len());
                return Err(Error::UnexpectedText(
                    self.text[..bad_len].to_string(),
                    self.location.clone(),
                ));
            }
        };
        let lexeme = self.text[..len].to_string();
        let location = self.location.clone();
        self.location.incr(&lexeme);
        self.text = &self.text[len..];
        Ok(Some(Token {
            handle,
            lexeme,
            location,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Tok {
        Ident,
        Num,
        Plus,
    }

    fn analyzer() -> Analyzer<Tok> {
        Analyzer::new(
            &[(Tok::Plus, "+")],
            &[(Tok::Ident, r"\A[a-zA-Z_]+"), (Tok::Num, r"\A[0-9]+")],
            &[r"\A\s+"],
        )
        .unwrap()
    }

    #[test]
    fn tokenizes_simple_expression() {
        let a = analyzer();
        let mut stream = a.injectable_token_stream("foo + 12", "test");
        let t1 = stream.next().unwrap().unwrap();
        assert_eq!(t1.handle(), Tok::Ident);
        assert_eq!(t1.lexeme(), "foo");
        let t2 = stream.next().unwrap().unwrap();
        assert_eq!(t2.handle(), Tok::Plus);
        let t3 = stream.next().unwrap().unwrap();
        assert_eq!(t3.handle(), Tok::Num);
        assert_eq!(t3.lexeme(), "12");
        assert!(stream.next().unwrap().is_none());
    }

    #[test]
    fn unexpected_text_reported() {
        let a = analyzer();
        let mut stream = a.injectable_token_stream("@@", "test");
        match stream.next() {
            Err(Error::UnexpectedText(text, _)) => assert_eq!(text, "@"),
            other => panic!("expected UnexpectedText, got {:?}", other),
        }
    }
}
