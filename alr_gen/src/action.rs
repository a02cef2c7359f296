// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C6: per-state lookahead actions, their canonical order, and compression.
use std::fmt;

use crate::rule::RuleId;
use crate::state::StateId;
use crate::symbol::{SymbolId, SymbolTable};

/// What to do when `lookahead` is seen in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Shift(StateId),
    Reduce(RuleId),
    Accept,
    Error,
    Conflict,
    ShiftResolved,
    ReduceResolved,
    NotUsed,
}

impl ActionKind {
    /// Ordinal used as the secondary sort key; arbitrary but fixed, so two
    /// actions on the same lookahead always compare the same way.
    fn ordinal(&self) -> u8 {
        match self {
            ActionKind::Shift(_) => 0,
            ActionKind::Reduce(_) => 1,
            ActionKind::Accept => 2,
            ActionKind::Error => 3,
            ActionKind::Conflict => 4,
            ActionKind::ShiftResolved => 5,
            ActionKind::ReduceResolved => 6,
            ActionKind::NotUsed => 7,
        }
    }

    /// Target index used as the tertiary sort key: the shifted-to state, or
    /// the reduced rule, or zero when the kind carries no target.
    fn target_index(&self) -> u32 {
        match self {
            ActionKind::Shift(s) => s.index(),
            ActionKind::Reduce(r) => r.index(),
            _ => 0,
        }
    }

    pub fn target_state(&self) -> Option<StateId> {
        match self {
            ActionKind::Shift(s) => Some(*s),
            _ => None,
        }
    }

    pub fn target_rule(&self) -> Option<RuleId> {
        match self {
            ActionKind::Reduce(r) => Some(*r),
            _ => None,
        }
    }

    /// Internal bookkeeping kinds emitters skip over.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ActionKind::ShiftResolved | ActionKind::ReduceResolved | ActionKind::NotUsed
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ActionKind::Shift(s) => write!(f, "shift {}", s),
            ActionKind::Reduce(r) => write!(f, "reduce {}", r),
            ActionKind::Accept => write!(f, "accept"),
            ActionKind::Error => write!(f, "error"),
            ActionKind::Conflict => write!(f, "conflict"),
            ActionKind::ShiftResolved => write!(f, "shift (resolved)"),
            ActionKind::ReduceResolved => write!(f, "reduce (resolved)"),
            ActionKind::NotUsed => write!(f, "not used"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub lookahead: SymbolId,
    pub kind: ActionKind,
}

/// A state's actions, in the canonical order emitters rely on:
/// (lookahead name, kind, target).
#[derive(Debug, Default)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Action> {
        self.actions.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn sort(&mut self, symbols: &SymbolTable) {
        self.actions.sort_by(|a, b| {
            let name_a = symbols.nth(a.lookahead).name();
            let name_b = symbols.nth(b.lookahead).name();
            name_a
                .cmp(name_b)
                .then(a.kind.ordinal().cmp(&b.kind.ordinal()))
                .then(a.kind.target_index().cmp(&b.kind.target_index()))
        });
    }

    /// If two or more `Reduce` actions in this (already-sorted) list all
    /// target the same rule and no other `Reduce` disagrees, fold them into
    /// a single default reduction. Only Reduce actions are foldable.
    pub fn compress(&mut self, symbols: &SymbolTable, default_symbol: SymbolId) {
        let first_reduce = self
            .actions
            .iter()
            .position(|a| matches!(a.kind, ActionKind::Reduce(_)));
        let Some(first_index) = first_reduce else {
            return;
        };
        let target_rule = match self.actions[first_index].kind {
            ActionKind::Reduce(r) => r,
            _ => unreachable!(),
        };
        let mut count = 1;
        let mut uniform = true;
        for action in self.actions.iter().skip(first_index + 1) {
            if let ActionKind::Reduce(r) = action.kind {
                count += 1;
                if r != target_rule {
                    uniform = false;
                    break;
                }
            }
        }
        if count > 1 && uniform {
            self.actions[first_index].lookahead = default_symbol;
            for action in self.actions.iter_mut().skip(first_index + 1) {
                if let ActionKind::Reduce(r) = action.kind {
                    if r == target_rule {
                        action.kind = ActionKind::NotUsed;
                    }
                }
            }
            self.sort(symbols);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleTable;
    use crate::symbol::SymbolTable;

    fn state_id(i: u32) -> StateId {
        StateId::for_test(i)
    }

    #[test]
    fn sort_orders_by_name_then_kind_then_target() {
        let mut symbols = SymbolTable::new();
        let mut rules = RuleTable::new();
        let a = symbols.find_or_create("A");
        let b = symbols.find_or_create("B");
        let lhs = symbols.find_or_create("s");
        let r0 = rules.create(lhs, 1);
        let mut list = ActionList::new();
        list.push(Action {
            lookahead: b,
            kind: ActionKind::Shift(state_id(1)),
        });
        list.push(Action {
            lookahead: a,
            kind: ActionKind::Reduce(r0),
        });
        list.sort(&symbols);
        let first = list.iter().next().unwrap();
        assert_eq!(symbols.nth(first.lookahead).name(), "A");
    }

    #[test]
    fn compress_folds_uniform_reduces_to_default() {
        let mut symbols = SymbolTable::new();
        let mut rules = RuleTable::new();
        let lhs = symbols.find_or_create("s");
        let rule = rules.create(lhs, 1);
        let default = symbols.add_default().unwrap();
        let a = symbols.find_or_create("A");
        let b = symbols.find_or_create("B");
        let c = symbols.find_or_create("C");
        let mut list = ActionList::new();
        for sym in [a, b, c] {
            list.push(Action {
                lookahead: sym,
                kind: ActionKind::Reduce(rule),
            });
        }
        list.sort(&symbols);
        list.compress(&symbols, default);
        let remaining: Vec<_> = list
            .iter()
            .filter(|a| !matches!(a.kind, ActionKind::NotUsed))
            .collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].lookahead, default);
    }

    #[test]
    fn compress_leaves_non_uniform_reduces_alone() {
        let mut symbols = SymbolTable::new();
        let mut rules = RuleTable::new();
        let lhs = symbols.find_or_create("s");
        let rule_one = rules.create(lhs, 1);
        let rule_two = rules.create(lhs, 2);
        symbols.add_default().unwrap();
        let a = symbols.find_or_create("A");
        let b = symbols.find_or_create("B");
        let mut list = ActionList::new();
        list.push(Action {
            lookahead: a,
            kind: ActionKind::Reduce(rule_one),
        });
        list.push(Action {
            lookahead: b,
            kind: ActionKind::Reduce(rule_two),
        });
        list.sort(&symbols);
        let default = symbols.default_name().unwrap();
        list.compress(&symbols, default);
        let still_reduce = list
            .iter()
            .filter(|act| matches!(act.kind, ActionKind::Reduce(_)))
            .count();
        assert_eq!(still_reduce, 2);
    }
}
