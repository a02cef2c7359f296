// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! A small lexical analyzer toolkit: literal and regular-expression lexeme
//! matching over borrowed text, with deterministic longest-match resolution
//! and source-location tracking.

mod analyzer;
pub mod error;
mod lexicon;
mod location;
mod matcher;

pub use analyzer::{Analyzer, Token, TokenStream};
pub use error::{Error, LexanError};
pub use lexicon::LexiconIfce;
pub use location::Location;
pub use matcher::{LiteralMatcher, RegexMatcher, SkipMatcher};
