// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! A LALR(1)-style parser generator in the Lemon tradition: reads a grammar
//! annotated with semantic actions and builds the state/action tables for a
//! deterministic bottom-up parser. This crate is the analysis core (C1-C8)
//! plus the surface grammar-file reader (C9); `main.rs` wires them into a
//! CLI.
pub mod action;
pub mod config;
pub mod emit_c;
pub mod emit_cpp;
pub mod emitter;
pub mod error;
pub mod follow_set;
pub mod grammar;
pub mod options;
pub mod report;
pub mod rule;
pub mod state;
pub mod surface;
pub mod symbol;

pub use error::{Diagnostic, FatalError, Reporter};
pub use grammar::Generator;
pub use options::{Lang, Options};
