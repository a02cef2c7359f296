// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C3: grammar productions and the table that groups/analyzes them.
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use crate::symbol::{SymbolId, SymbolTable};

/// Stable index of a [`Rule`], assigned in creation order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u32);

impl RuleId {
    fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// Rule `0`, which always exists once the grammar has at least one
    /// production (callers must check `RuleTable::count()` first).
    pub fn first() -> Self {
        RuleId(0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct RhsEntry {
    pub symbol: SymbolId,
    pub alias: Option<String>,
}

#[derive(Debug)]
pub struct Rule {
    index: RuleId,
    lhs: SymbolId,
    lhs_alias: Option<String>,
    rhs: Vec<RhsEntry>,
    line: u32,
    action: Option<(String, u32)>,
    precedence_symbol: Cell<Option<SymbolId>>,
    can_reduce: Cell<bool>,
}

impl Rule {
    pub fn index(&self) -> RuleId {
        self.index
    }

    pub fn lhs(&self) -> SymbolId {
        self.lhs
    }

    pub fn lhs_alias(&self) -> Option<&str> {
        self.lhs_alias.as_deref()
    }

    pub fn rhs(&self) -> &[RhsEntry] {
        &self.rhs
    }

    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn action(&self) -> Option<(&str, u32)> {
        self.action.as_ref().map(|(code, line)| (code.as_str(), *line))
    }

    pub fn precedence_symbol(&self) -> Option<SymbolId> {
        self.precedence_symbol.get()
    }

    pub fn can_reduce(&self) -> bool {
        self.can_reduce.get()
    }

    pub fn set_can_reduce(&self, value: bool) {
        self.can_reduce.set(value)
    }
}

/// Productions indexed densely by creation order and grouped per-LHS.
///
/// New rules are inserted at the *front* of their LHS's list, so
/// `rules_for_lhs` walks a nonterminal's productions in reverse declaration
/// order. This mirrors the upstream tool's behaviour and is required to
/// match its output byte-for-byte.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    by_lhs: BTreeMap<SymbolId, Vec<RuleId>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, lhs: SymbolId, line: u32) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        self.rules.push(Rule {
            index: id,
            lhs,
            lhs_alias: None,
            rhs: Vec::new(),
            line,
            action: None,
            precedence_symbol: Cell::new(None),
            can_reduce: Cell::new(false),
        });
        self.by_lhs.entry(lhs).or_default().insert(0, id);
        id
    }

    pub fn set_lhs_alias(&mut self, id: RuleId, alias: String) {
        self.rules[id.as_usize()].lhs_alias = Some(alias);
    }

    pub fn push_rhs(&mut self, id: RuleId, symbol: SymbolId, alias: Option<String>) {
        self.rules[id.as_usize()].rhs.push(RhsEntry { symbol, alias });
    }

    pub fn set_action(&mut self, id: RuleId, code: String, line: u32) {
        self.rules[id.as_usize()].action = Some((code, line));
    }

    pub fn set_explicit_precedence(&mut self, id: RuleId, symbol: SymbolId) {
        self.rules[id.as_usize()].precedence_symbol.set(Some(symbol));
    }

    pub fn nth(&self, id: RuleId) -> &Rule {
        &self.rules[id.as_usize()]
    }

    pub fn count(&self) -> usize {
        self.rules.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        (0..self.rules.len()).map(|i| RuleId(i as u32))
    }

    /// Rules for `lhs`, in reverse declaration order (front-insertion).
    pub fn rules_for_lhs(&self, lhs: SymbolId) -> &[RuleId] {
        self.by_lhs.get(&lhs).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_rules(&self, lhs: SymbolId) -> bool {
        self.by_lhs.get(&lhs).map_or(false, |v| !v.is_empty())
    }

    /// For every rule with no explicit `[SYM]` precedence, scan its RHS
    /// left-to-right for the first symbol with a precedence assigned and
    /// adopt it as the rule's precedence symbol.
    pub fn assign_precedences(&self, symbols: &SymbolTable) {
        for rule in self.rules.iter() {
            if rule.precedence_symbol.get().is_some() {
                continue;
            }
            for entry in rule.rhs.iter() {
                if symbols.nth(entry.symbol).precedence() >= 0 {
                    rule.precedence_symbol.set(Some(entry.symbol));
                    break;
                }
            }
        }
    }

    /// Iterate to fixpoint: a nonterminal is lambda iff some rule for it has
    /// every RHS symbol lambda (including the empty RHS).
    pub fn compute_lambda(&self, symbols: &SymbolTable) {
        loop {
            let mut changed = false;
            for rule in self.rules.iter() {
                let lhs = symbols.nth(rule.lhs);
                if lhs.lambda() {
                    continue;
                }
                let all_lambda = rule
                    .rhs
                    .iter()
                    .all(|entry| symbols.nth(entry.symbol).lambda());
                if all_lambda {
                    lhs.set_lambda(true);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// Iterate to fixpoint per the standard FIRST-set recurrence.
    pub fn compute_first_sets(&self, symbols: &SymbolTable) {
        loop {
            let mut changed = false;
            for rule in self.rules.iter() {
                let lhs_id = rule.lhs;
                for entry in rule.rhs.iter() {
                    let sym = symbols.nth(entry.symbol);
                    if sym.is_terminal() {
                        if symbols.nth(lhs_id).first_set().add(entry.symbol) {
                            changed = true;
                        }
                        break;
                    } else if entry.symbol == lhs_id {
                        if !sym.lambda() {
                            break;
                        }
                    } else {
                        if symbols
                            .nth(lhs_id)
                            .first_set()
                            .combine(sym.first_set())
                        {
                            changed = true;
                        }
                        if !sym.lambda() {
                            break;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// True iff some rule's RHS contains `name`.
    pub fn is_on_rhs(&self, name: SymbolId) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.rhs.iter().any(|entry| entry.symbol == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SymbolTable, RuleTable) {
        (SymbolTable::new(), RuleTable::new())
    }

    #[test]
    fn new_rules_go_to_front_of_lhs_list() {
        let (mut symbols, mut rules) = setup();
        let a = symbols.find_or_create("a");
        let first = rules.create(a, 1);
        let second = rules.create(a, 2);
        assert_eq!(rules.rules_for_lhs(a), &[second, first]);
    }

    #[test]
    fn lambda_propagation_scenario() {
        let (mut symbols, mut rules) = setup();
        let s = symbols.find_or_create("s");
        let a = symbols.find_or_create("a");
        let b = symbols.find_or_create("b");
        let cap_a = symbols.find_or_create("A");
        let cap_b = symbols.find_or_create("B");
        let s_rule = rules.create(s, 1);
        rules.push_rhs(s_rule, a, None);
        rules.push_rhs(s_rule, b, None);
        rules.create(a, 2);
        let a_rule2 = rules.create(a, 3);
        rules.push_rhs(a_rule2, cap_a, None);
        let b_rule = rules.create(b, 4);
        rules.push_rhs(b_rule, cap_b, None);

        rules.compute_lambda(&symbols);
        assert!(symbols.nth(a).lambda());
        assert!(!symbols.nth(b).lambda());
        assert!(!symbols.nth(s).lambda());

        rules.compute_first_sets(&symbols);
        assert!(symbols.nth(s).first_set().contains(cap_a));
        assert!(symbols.nth(s).first_set().contains(cap_b));
    }

    #[test]
    fn is_on_rhs_detects_recursion() {
        let (mut symbols, mut rules) = setup();
        let s = symbols.find_or_create("s");
        let t = symbols.find_or_create("t");
        let r = rules.create(t, 1);
        rules.push_rhs(r, s, None);
        assert!(rules.is_on_rhs(s));
        assert!(!rules.is_on_rhs(t));
    }
}
