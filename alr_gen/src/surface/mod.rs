// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C9: the external collaborator that turns grammar-file bytes into a
//! populated [`crate::grammar::Generator`].
pub mod lexer;
pub mod parser;
