// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use std::convert::From;
use std::fmt;

use regex;

use crate::Location;

/// Errors that can occur while building a lexical analyzer's tables.
#[derive(Debug)]
pub enum LexanError<'a, H> {
    AmbiguousMatch(&'a str, Vec<H>),
    DuplicateHandle(H),
    DuplicatePattern(&'a str),
    EmptyPattern(H),
    RegexError(regex::Error),
    UnanchoredRegex(&'a str),
}

impl<'a, H: fmt::Debug> fmt::Display for LexanError<'a, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexanError::AmbiguousMatch(text, handles) => {
                write!(f, "ambiguous match for \"{}\": {:?}", text, handles)
            }
            LexanError::DuplicateHandle(handle) => write!(f, "duplicate handle: {:?}", handle),
            LexanError::DuplicatePattern(pattern) => {
                write!(f, "duplicate pattern: \"{}\"", pattern)
            }
            LexanError::EmptyPattern(handle) => write!(f, "empty pattern for {:?}", handle),
            LexanError::RegexError(error) => write!(f, "regex error: {}", error),
            LexanError::UnanchoredRegex(pattern) => {
                write!(f, "unanchored regex (must start with \\A): \"{}\"", pattern)
            }
        }
    }
}

impl<'a, H> From<regex::Error> for LexanError<'a, H> {
    fn from(error: regex::Error) -> Self {
        LexanError::RegexError(error)
    }
}

/// Errors encountered while tokenizing input text at run time.
#[derive(Debug, Clone)]
pub enum Error<H> {
    UnexpectedText(String, Location),
    AmbiguousMatches(Vec<H>, String, Location),
    AdvancedWhenEmpty(Location),
}

impl<H: fmt::Debug> fmt::Display for Error<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnexpectedText(text, location) => {
                write!(f, "{}: unexpected text: \"{}\"", location, text)
            }
            Error::AmbiguousMatches(handles, text, location) => write!(
                f,
                "{}: ambiguous match for \"{}\": {:?}",
                location, text, handles
            ),
            Error::AdvancedWhenEmpty(location) => {
                write!(f, "{}: advanced past end of text", location)
            }
        }
    }
}
