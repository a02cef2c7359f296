// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Accumulating diagnostics reporter (§7 Error Handling Design).
//!
//! Surface and semantic errors are collected here with source location
//! context; the generator keeps going so a user sees every problem from one
//! invocation rather than one-at-a-time. Conflicts are counted separately
//! (they are not errors for exit-status purposes). Internal invariant
//! breaks are fatal and bypass this accumulator entirely.
use std::fmt;

use lexan::Location;

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub location: Option<Location>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Accumulates diagnostics across an entire generator run.
#[derive(Debug, Default)]
pub struct Reporter {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, location: Option<Location>, message: impl Into<String>) {
        self.errors.push(Diagnostic {
            location,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, location: Option<Location>, message: impl Into<String>) {
        self.warnings.push(Diagnostic {
            location,
            message: message.into(),
        });
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Write every accumulated diagnostic to `out`, one per line, each
    /// prefixed by its source location when one is known.
    pub fn emit(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        for diagnostic in &self.errors {
            writeln!(out, "{}", diagnostic)?;
        }
        for diagnostic in &self.warnings {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// Fatal conditions that abort a run outright rather than merely being
/// accumulated as diagnostics.
#[derive(Debug)]
pub enum FatalError {
    EmptyGrammar,
    TooManyErrors(usize),
    UndefinedNonterminals(usize),
    UnexpectedShiftReduceConflicts { actual: usize, expected: usize },
    UnexpectedReduceReduceConflicts { actual: usize, expected: usize },
    InternalInvariantBroken(String),
    Io(String),
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FatalError::EmptyGrammar => write!(f, "grammar contains no rules"),
            FatalError::TooManyErrors(count) => write!(f, "too many errors ({})", count),
            FatalError::UndefinedNonterminals(count) => {
                write!(f, "{} undefined nonterminal(s)", count)
            }
            FatalError::UnexpectedShiftReduceConflicts { actual, expected } => write!(
                f,
                "unexpected shift/reduce conflicts: got {}, expected {}",
                actual, expected
            ),
            FatalError::UnexpectedReduceReduceConflicts { actual, expected } => write!(
                f,
                "unexpected reduce/reduce conflicts: got {}, expected {}",
                actual, expected
            ),
            FatalError::InternalInvariantBroken(what) => {
                write!(f, "internal invariant broken: {}", what)
            }
            FatalError::Io(what) => write!(f, "I/O error: {}", what),
        }
    }
}

impl std::error::Error for FatalError {}
