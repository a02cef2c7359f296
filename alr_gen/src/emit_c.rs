// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Plain-C backend. Folds declarations, token enum, and tables into a
//! single translation unit; there is no separate header.
use std::io::{self, Write};

use crate::action::ActionKind;
use crate::emitter::{Emitter, EmitterConfig, EmitterView};

pub struct CEmitter;

impl Emitter for CEmitter {
    fn emit_header(&self, _view: &EmitterView, _config: &EmitterConfig, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn emit_source(&self, view: &EmitterView, config: &EmitterConfig, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "/* generated by alr_gen, do not edit */")?;
        writeln!(out)?;
        if let Some(header_include) = &config.header_include {
            writeln!(out, "{}", header_include)?;
        }
        if let Some(include) = &config.include {
            writeln!(out, "{}", include)?;
        }
        writeln!(out, "typedef enum {{")?;
        for symbol in view.symbols().iter().filter(|s| s.is_terminal) {
            writeln!(out, "    TOKEN_{} = {},", token_ident(symbol.name), symbol.index)?;
        }
        writeln!(out, "}} AA_TOKEN;")?;
        writeln!(out)?;
        if let Some(code) = &config.code {
            writeln!(out, "{}", code)?;
        }
        writeln!(out)?;
        writeln!(out, "/* rule -> lhs, rhs length, for reduction bookkeeping */")?;
        writeln!(out, "static const int aa_rule_lhs[] = {{")?;
        for rule in view.rules() {
            writeln!(out, "    /* {} */ {},", rule.id, nonterminal_ordinal(view, rule.lhs_name))?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
        writeln!(out, "static const int aa_rule_len[] = {{")?;
        for rule in view.rules() {
            writeln!(out, "    {},", rule.rhs.len())?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
        for state in view.states() {
            writeln!(out, "/* state {} */", state.id)?;
            for action in &state.actions {
                let lookahead = view
                    .symbols()
                    .into_iter()
                    .find(|s| s.id == action.lookahead)
                    .map(|s| s.name.to_string())
                    .unwrap_or_default();
                match action.kind {
                    ActionKind::Shift(target) => {
                        writeln!(out, "/*   shift {} -> state {} */", lookahead, target)?
                    }
                    ActionKind::Reduce(rule) => {
                        writeln!(out, "/*   reduce {} -> rule {} */", lookahead, rule)?
                    }
                    ActionKind::Accept => writeln!(out, "/*   accept on {} */", lookahead)?,
                    ActionKind::Error => writeln!(out, "/*   error on {} */", lookahead)?,
                    ActionKind::Conflict => writeln!(out, "/*   unresolved conflict on {} */", lookahead)?,
                    ActionKind::ShiftResolved | ActionKind::ReduceResolved | ActionKind::NotUsed => {}
                }
            }
        }
        if let Some(parse_accept) = &config.parse_accept {
            writeln!(out, "{}", parse_accept)?;
        }
        Ok(())
    }
}

fn nonterminal_ordinal(view: &EmitterView, name: &str) -> u32 {
    view.symbols()
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.index)
        .unwrap_or(0)
}

fn token_ident(name: &str) -> String {
    name.replace(|c: char| !c.is_ascii_alphanumeric(), "_")
}
