// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C8: the read-only view of a finished [`crate::grammar::Generator`] that
//! code generators consume, plus the declaration bag (`%name`, `%token_type`,
//! ...) that shapes their output. Concrete backends live in `emit_c` and
//! `emit_cpp`; this module only fixes the contract between them and the
//! core.
use std::path::{Path, PathBuf};

use crate::action::Action;
use crate::grammar::Generator;
use crate::rule::RuleId;
use crate::state::StateId;
use crate::symbol::SymbolId;

/// The `%`-declarations from the grammar file that a backend needs to shape
/// its output, independent of the automaton itself.
#[derive(Debug, Clone, Default)]
pub struct EmitterConfig {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub token_type: Option<String>,
    pub token_prefix: Option<String>,
    pub extra_argument: Option<String>,
    pub token_destructor: Option<String>,
    pub syntax_error: Option<String>,
    pub parse_accept: Option<String>,
    pub parse_failure: Option<String>,
    pub include: Option<String>,
    pub header_include: Option<String>,
    pub code: Option<String>,
    pub start_symbol: Option<String>,
}

/// A rule's fields as a backend needs them, decoupled from `RuleTable`'s
/// internal representation.
pub struct RuleView<'g> {
    pub id: RuleId,
    pub lhs_name: &'g str,
    pub rhs: Vec<(&'g str, Option<&'g str>)>,
    pub action: Option<(&'g str, u32)>,
    pub line: u32,
    pub can_reduce: bool,
}

/// A symbol's fields as a backend needs them.
pub struct SymbolView<'g> {
    pub id: SymbolId,
    pub name: &'g str,
    pub is_terminal: bool,
    pub index: u32,
    pub data_type: Option<&'g str>,
}

/// A state's fields as a backend needs them. `actions` excludes the
/// internal bookkeeping kinds (`ShiftResolved`/`ReduceResolved`/`NotUsed`)
/// per §4.1's "skipped by emitters" note.
pub struct StateView {
    pub id: StateId,
    pub actions: Vec<Action>,
}

/// Read-only access to a built [`Generator`], in the iteration orders §5
/// promises emitters: symbols and rules by index, states by index, actions
/// within a state already sorted by (lookahead, kind, target).
pub struct EmitterView<'g> {
    generator: &'g Generator,
}

impl<'g> EmitterView<'g> {
    pub fn new(generator: &'g Generator) -> Self {
        Self { generator }
    }

    pub fn symbols(&self) -> Vec<SymbolView<'g>> {
        self.generator
            .symbols
            .ids_in_index_order()
            .into_iter()
            .map(|id| {
                let s = self.generator.symbols.nth(id);
                SymbolView {
                    id,
                    name: s.name(),
                    is_terminal: s.is_terminal(),
                    index: s.index(),
                    data_type: s.data_type(),
                }
            })
            .collect()
    }

    pub fn rules(&self) -> Vec<RuleView<'g>> {
        self.generator
            .rules
            .ids()
            .map(|id| {
                let r = self.generator.rules.nth(id);
                let rhs = r
                    .rhs()
                    .iter()
                    .map(|entry| {
                        (
                            self.generator.symbols.nth(entry.symbol).name(),
                            entry.alias.as_deref(),
                        )
                    })
                    .collect();
                RuleView {
                    id,
                    lhs_name: self.generator.symbols.nth(r.lhs()).name(),
                    rhs,
                    action: r.action(),
                    line: r.line(),
                    can_reduce: r.can_reduce(),
                }
            })
            .collect()
    }

    /// States in index order; state 0 is always the start state (§5).
    pub fn states(&self) -> Vec<StateView> {
        self.generator
            .states
            .ids()
            .map(|id| {
                let actions = self
                    .generator
                    .states
                    .nth(id)
                    .actions()
                    .iter()
                    .filter(|a| !a.kind.is_internal())
                    .copied()
                    .collect();
                StateView { id, actions }
            })
            .collect()
    }

    pub fn action_target_state(&self, action: &Action) -> Option<StateId> {
        action.kind.target_state()
    }

    pub fn action_target_rule(&self, action: &Action) -> Option<RuleId> {
        action.kind.target_rule()
    }

    pub fn start_symbol_name(&self) -> &'g str {
        self.generator.symbols.nth(self.generator.start_symbol()).name()
    }
}

/// Output file paths derived from the grammar file's stem, one pair per
/// backend (header + source; the C backend has no separate header).
pub fn output_paths(source_stem: &Path, lang: crate::options::Lang) -> (Option<PathBuf>, PathBuf) {
    match lang {
        crate::options::Lang::C => (None, source_stem.with_extension("c")),
        crate::options::Lang::Cpp | crate::options::Lang::CppRuntime => (
            Some(source_stem.with_extension("h")),
            source_stem.with_extension("cpp"),
        ),
    }
}

/// Narrow capability set a polymorphic emitter backend implements; variants
/// differ only in output syntax, not in what they're asked to produce
/// (§REDESIGN FLAGS: model as a capability trait, not an inheritance tree).
pub trait Emitter {
    /// Emit the header/preamble (declarations, token enum, includes). A
    /// backend with no separate header file (plain C) writes nothing here
    /// and folds everything into `emit_source`.
    fn emit_header(&self, view: &EmitterView, config: &EmitterConfig, out: &mut dyn std::io::Write) -> std::io::Result<()>;

    /// Emit the parser tables and driver loop.
    fn emit_source(&self, view: &EmitterView, config: &EmitterConfig, out: &mut dyn std::io::Write) -> std::io::Result<()>;
}
