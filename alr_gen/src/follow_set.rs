// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C2: an ordered set of terminal symbols with change-tracking union.
use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::symbol::SymbolId;

/// A set of terminal symbol ids. Backed by an ordered collection so
/// iteration (and therefore any report built from it) is deterministic.
#[derive(Debug, Default)]
pub struct FollowSet {
    members: RefCell<BTreeSet<SymbolId>>,
}

impl FollowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `symbol`, returning whether the set changed.
    pub fn add(&self, symbol: SymbolId) -> bool {
        self.members.borrow_mut().insert(symbol)
    }

    /// Union `other` into this set, returning whether anything was added.
    pub fn combine(&self, other: &FollowSet) -> bool {
        let incoming = other.members.borrow();
        let mut changed = false;
        let mut ours = self.members.borrow_mut();
        for symbol in incoming.iter() {
            if ours.insert(*symbol) {
                changed = true;
            }
        }
        changed
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.members.borrow().contains(&symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn iter(&self) -> Vec<SymbolId> {
        self.members.borrow().iter().copied().collect()
    }
}

impl Clone for FollowSet {
    fn clone(&self) -> Self {
        Self {
            members: RefCell::new(self.members.borrow().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    #[test]
    fn add_reports_change() {
        let mut table = SymbolTable::new();
        let a = table.find_or_create("A");
        let set = FollowSet::new();
        assert!(set.add(a));
        assert!(!set.add(a));
    }

    #[test]
    fn combine_unions_and_reports_change() {
        let mut table = SymbolTable::new();
        let a = table.find_or_create("A");
        let b = table.find_or_create("B");
        let one = FollowSet::new();
        one.add(a);
        let two = FollowSet::new();
        two.add(a);
        two.add(b);
        assert!(one.combine(&two));
        assert!(one.contains(b));
        assert!(!one.combine(&two));
    }
}
