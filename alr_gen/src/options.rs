// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Configuration options threaded through a generator run (§6 CLI surface).
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    C,
    Cpp,
    CppRuntime,
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Lang::C => "c",
            Lang::Cpp => "c++",
            Lang::CppRuntime => "z",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Lang::C),
            "c++" => Ok(Lang::Cpp),
            "z" => Ok(Lang::CppRuntime),
            other => Err(format!("unrecognised language \"{}\"", other)),
        }
    }
}

/// Knobs that affect how a [`crate::grammar::Generator`] analyzes a grammar
/// and how its report/codegen passes behave, mirroring the CLI flags.
#[derive(Debug, Clone)]
pub struct Options {
    pub basis_only: bool,
    pub no_compress: bool,
    pub grammar_no_actions: bool,
    pub lang: Lang,
    pub debug: bool,
    pub verbose: bool,
    pub stats: bool,
    pub expected_conflicts: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            basis_only: false,
            no_compress: false,
            grammar_no_actions: false,
            lang: Lang::C,
            debug: false,
            verbose: false,
            stats: false,
            expected_conflicts: 0,
        }
    }
}
