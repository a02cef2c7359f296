// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C++ backends: a plain-C++ variant and a "z" variant that additionally
//! assumes a small runtime support header. They differ only in what the
//! header declares; the table-emission logic is shared.
use std::io::{self, Write};

use crate::action::ActionKind;
use crate::emitter::{Emitter, EmitterConfig, EmitterView};

pub struct CppEmitter {
    pub with_runtime: bool,
}

impl Emitter for CppEmitter {
    fn emit_header(&self, view: &EmitterView, config: &EmitterConfig, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "// generated by alr_gen, do not edit")?;
        writeln!(out, "#pragma once")?;
        writeln!(out)?;
        if self.with_runtime {
            writeln!(out, "#include \"alr_gen_runtime.hpp\"")?;
        }
        if let Some(header_include) = &config.header_include {
            writeln!(out, "{}", header_include)?;
        }
        let namespace = config.namespace.as_deref();
        if let Some(ns) = namespace {
            writeln!(out, "namespace {} {{", ns)?;
        }
        writeln!(out, "enum class Token {{")?;
        for symbol in view.symbols().iter().filter(|s| s.is_terminal) {
            writeln!(out, "    {},", symbol.name)?;
        }
        writeln!(out, "}};")?;
        let class_name = config.name.as_deref().unwrap_or("Parser");
        writeln!(out, "class {} {{", class_name)?;
        writeln!(out, "public:")?;
        if let Some(extra_argument) = &config.extra_argument {
            writeln!(out, "    {};", extra_argument)?;
        }
        writeln!(out, "    bool parse();")?;
        writeln!(out, "}};")?;
        if namespace.is_some() {
            writeln!(out, "}}")?;
        }
        Ok(())
    }

    fn emit_source(&self, view: &EmitterView, config: &EmitterConfig, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "// generated by alr_gen, do not edit")?;
        if let Some(include) = &config.include {
            writeln!(out, "{}", include)?;
        }
        writeln!(out)?;
        if let Some(code) = &config.code {
            writeln!(out, "{}", code)?;
        }
        let class_name = config.name.as_deref().unwrap_or("Parser");
        writeln!(out, "bool {}::parse() {{", class_name)?;
        for state in view.states() {
            writeln!(out, "    // state {}", state.id)?;
            for action in &state.actions {
                let lookahead = view
                    .symbols()
                    .into_iter()
                    .find(|s| s.id == action.lookahead)
                    .map(|s| s.name.to_string())
                    .unwrap_or_default();
                match action.kind {
                    ActionKind::Shift(target) => {
                        writeln!(out, "    // shift {} -> state {}", lookahead, target)?
                    }
                    ActionKind::Reduce(rule) => {
                        writeln!(out, "    // reduce {} -> rule {}", lookahead, rule)?
                    }
                    ActionKind::Accept => writeln!(out, "    // accept on {}", lookahead)?,
                    ActionKind::Error => writeln!(out, "    // error on {}", lookahead)?,
                    ActionKind::Conflict => {
                        writeln!(out, "    // unresolved conflict on {}", lookahead)?
                    }
                    ActionKind::ShiftResolved | ActionKind::ReduceResolved | ActionKind::NotUsed => {}
                }
            }
        }
        if let Some(syntax_error) = &config.syntax_error {
            writeln!(out, "    {};", syntax_error)?;
        }
        writeln!(out, "    return true;")?;
        writeln!(out, "}}")?;
        Ok(())
    }
}
