// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C5: nodes of the LR automaton and the table that interns them.
use std::cell::RefCell;
use std::fmt;

use crate::action::ActionList;
use crate::config::{ConfigArena, ConfigId};

/// Stable index of a [`State`], assigned in creation order. State `0` is
/// always the start state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    pub fn index(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub fn for_test(i: u32) -> Self {
        StateId(i)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of the LR(0)/LALR automaton: its kernel (basis), the closure of
/// that kernel (full), and the actions built for it in Stage F.
#[derive(Debug)]
pub struct State {
    index: StateId,
    basis: Vec<ConfigId>,
    full: Vec<ConfigId>,
    actions: RefCell<ActionList>,
}

impl State {
    pub fn index(&self) -> StateId {
        self.index
    }

    pub fn basis(&self) -> &[ConfigId] {
        &self.basis
    }

    pub fn full(&self) -> &[ConfigId] {
        &self.full
    }

    pub fn actions(&self) -> std::cell::Ref<ActionList> {
        self.actions.borrow()
    }

    pub fn actions_mut(&self) -> std::cell::RefMut<ActionList> {
        self.actions.borrow_mut()
    }
}

/// The process-wide registry of states, built once per run. `find` performs
/// the basis-equality check that decides whether a candidate successor is a
/// genuinely new state or an already-known one.
#[derive(Debug, Default)]
pub struct StateTable {
    states: Vec<State>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a state whose sorted basis, as (rule-index, dot) pairs, equals
    /// `key` exactly (including length).
    pub fn find(&self, arena: &ConfigArena, key: &[(u32, usize)]) -> Option<StateId> {
        self.states.iter().find_map(|state| {
            if state.basis.len() != key.len() {
                return None;
            }
            let matches = state
                .basis
                .iter()
                .zip(key.iter())
                .all(|(id, (rule, dot))| arena.rule(*id).index() == *rule && arena.dot(*id) == *dot);
            if matches {
                Some(state.index)
            } else {
                None
            }
        })
    }

    pub fn add(&mut self, basis: Vec<ConfigId>, full: Vec<ConfigId>) -> StateId {
        let index = StateId(self.states.len() as u32);
        self.states.push(State {
            index,
            basis,
            full,
            actions: RefCell::new(ActionList::new()),
        });
        index
    }

    pub fn nth(&self, id: StateId) -> &State {
        &self.states[id.0 as usize]
    }

    pub fn count(&self) -> usize {
        self.states.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(|i| StateId(i as u32))
    }

    pub fn start(&self) -> StateId {
        StateId(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_matches_by_basis_sequence() {
        let mut arena = ConfigArena::new();
        let mut rules = crate::rule::RuleTable::new();
        let mut symbols = crate::symbol::SymbolTable::new();
        let s = symbols.find_or_create("s");
        let rule = rules.create(s, 1);
        let mut table = StateTable::new();
        let mut list = crate::config::ConfigList::new();
        let id = list.add_with_basis(&mut arena, rule, 0);
        table.add(vec![id], vec![id]);
        let key = vec![(rule.index(), 0)];
        assert_eq!(table.find(&arena, &key), Some(StateId(0)));
        assert_eq!(table.find(&arena, &[(rule.index(), 1)]), None);
    }
}
