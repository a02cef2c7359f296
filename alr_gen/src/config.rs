// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C4: LR items (configurations) and the scratch list used to build states.
use std::cell::{Cell, RefCell};
use std::fmt;

use crate::follow_set::FollowSet;
use crate::rule::{RuleId, RuleTable};
use crate::state::StateId;
use crate::symbol::SymbolTable;

/// Stable handle for a [`ConfigData`] in a [`ConfigArena`]. Configurations
/// are never freed once created (they may still be a propagation-link
/// target of a surviving state even after their own candidate state is
/// rejected as a duplicate), so an append-only arena is the natural fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigId(u32);

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    Incomplete,
    Complete,
}

#[derive(Debug)]
struct ConfigData {
    rule: RuleId,
    dot: usize,
    follow_set: FollowSet,
    status: Cell<ConfigStatus>,
    forward_links: RefCell<Vec<ConfigId>>,
    backward_links: RefCell<Vec<ConfigId>>,
    /// The state this configuration is a member of, set once the
    /// candidate list it belongs to is committed as a state's basis/full
    /// chain. `None` for a configuration created during closure that
    /// turned out to belong to a candidate rejected as a duplicate of an
    /// existing state.
    state: Cell<Option<StateId>>,
}

/// Append-only store of every configuration created during state
/// construction, addressed by [`ConfigId`].
#[derive(Debug, Default)]
pub struct ConfigArena {
    configs: Vec<ConfigData>,
}

impl ConfigArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, rule: RuleId, dot: usize) -> ConfigId {
        let id = ConfigId(self.configs.len() as u32);
        self.configs.push(ConfigData {
            rule,
            dot,
            follow_set: FollowSet::new(),
            status: Cell::new(ConfigStatus::Incomplete),
            forward_links: RefCell::new(Vec::new()),
            backward_links: RefCell::new(Vec::new()),
            state: Cell::new(None),
        });
        id
    }

    pub fn rule(&self, id: ConfigId) -> RuleId {
        self.configs[id.0 as usize].rule
    }

    pub fn dot(&self, id: ConfigId) -> usize {
        self.configs[id.0 as usize].dot
    }

    pub fn follow_set(&self, id: ConfigId) -> &FollowSet {
        &self.configs[id.0 as usize].follow_set
    }

    pub fn status(&self, id: ConfigId) -> ConfigStatus {
        self.configs[id.0 as usize].status.get()
    }

    pub fn set_status(&self, id: ConfigId, status: ConfigStatus) {
        self.configs[id.0 as usize].status.set(status)
    }

    /// The state `id` is a member of, once a candidate list has been
    /// committed via [`Self::set_state`]. `None` for a configuration
    /// belonging to a candidate discarded as a duplicate of an existing
    /// state.
    pub fn state(&self, id: ConfigId) -> Option<StateId> {
        self.configs[id.0 as usize].state.get()
    }

    pub fn set_state(&self, id: ConfigId, state: StateId) {
        self.configs[id.0 as usize].state.set(Some(state))
    }

    pub fn forward_links(&self, id: ConfigId) -> Vec<ConfigId> {
        self.configs[id.0 as usize].forward_links.borrow().clone()
    }

    pub fn add_forward_link(&self, id: ConfigId, target: ConfigId) {
        self.configs[id.0 as usize].forward_links.borrow_mut().push(target);
    }

    pub fn backward_links(&self, id: ConfigId) -> Vec<ConfigId> {
        self.configs[id.0 as usize].backward_links.borrow().clone()
    }

    pub fn add_backward_link(&self, id: ConfigId, source: ConfigId) {
        self.configs[id.0 as usize]
            .backward_links
            .borrow_mut()
            .push(source);
    }

    /// Merge `other`'s backward links into `into`'s, per §4.7 Stage C: a
    /// rejected candidate's links are not lost, they move to the survivor.
    pub fn merge_backward_links(&self, into: ConfigId, other: ConfigId) {
        let mut moved = self.configs[other.0 as usize].backward_links.borrow_mut();
        self.configs[into.0 as usize]
            .backward_links
            .borrow_mut()
            .append(&mut moved);
    }

    pub fn count(&self) -> usize {
        self.configs.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = ConfigId> {
        (0..self.configs.len()).map(|i| ConfigId(i as u32))
    }
}

/// A scratch working set of configurations built once per candidate
/// successor state, distinguishing the basis (kernel) chain from the full
/// (basis + closure) chain.
#[derive(Debug, Default)]
pub struct ConfigList {
    basis_chain: Vec<ConfigId>,
    full_chain: Vec<ConfigId>,
}

impl ConfigList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basis(&self) -> &[ConfigId] {
        &self.basis_chain
    }

    pub fn full(&self) -> &[ConfigId] {
        &self.full_chain
    }

    fn find(&self, arena: &ConfigArena, rule: RuleId, dot: usize) -> Option<ConfigId> {
        self.full_chain
            .iter()
            .copied()
            .find(|id| arena.rule(*id) == rule && arena.dot(*id) == dot)
    }

    /// Add `(rule, dot)` to the full chain only, deduping by (rule, dot).
    pub fn add(&mut self, arena: &mut ConfigArena, rule: RuleId, dot: usize) -> ConfigId {
        if let Some(existing) = self.find(arena, rule, dot) {
            return existing;
        }
        let id = arena.create(rule, dot);
        self.full_chain.push(id);
        id
    }

    /// Add `(rule, dot)` to both the basis and full chains.
    pub fn add_with_basis(&mut self, arena: &mut ConfigArena, rule: RuleId, dot: usize) -> ConfigId {
        let id = self.add(arena, rule, dot);
        self.basis_chain.push(id);
        id
    }

    /// Expand the full chain to its closure in place, recording forward
    /// propagation links for items whose follow-set must inherit from the
    /// item that produced them.
    pub fn closure(&mut self, arena: &mut ConfigArena, symbols: &SymbolTable, rules: &RuleTable) {
        let mut i = 0;
        while i < self.full_chain.len() {
            let outer = self.full_chain[i];
            let rule_id = arena.rule(outer);
            let dot = arena.dot(outer);
            let rhs = rules.nth(rule_id).rhs().to_vec();
            if dot < rhs.len() {
                let next = rhs[dot].symbol;
                if !symbols.nth(next).is_terminal() {
                    for &child_rule in rules.rules_for_lhs(next) {
                        let child = self.add(arena, child_rule, 0);
                        let fully_nullable =
                            Self::propagate_first(arena, symbols, &rhs, dot + 1, child);
                        if fully_nullable {
                            arena.add_forward_link(outer, child);
                        }
                    }
                }
            }
            i += 1;
        }
    }

    /// Scan `rhs[from..]`, unioning FIRST of each symbol into `target`'s
    /// follow-set until a non-nullable symbol is found. Returns `true` if
    /// the whole tail is nullable (so the caller should record a forward
    /// propagation link instead of relying on this static contribution).
    fn propagate_first(
        arena: &ConfigArena,
        symbols: &SymbolTable,
        rhs: &[crate::rule::RhsEntry],
        from: usize,
        target: ConfigId,
    ) -> bool {
        for entry in &rhs[from..] {
            let sym = symbols.nth(entry.symbol);
            if sym.is_terminal() {
                arena.follow_set(target).add(entry.symbol);
                return false;
            } else {
                arena.follow_set(target).combine(sym.first_set());
                if !sym.lambda() {
                    return false;
                }
            }
        }
        true
    }

    fn sort_chain(arena: &ConfigArena, chain: &mut [ConfigId]) {
        chain.sort_by_key(|id| (arena.rule(*id).index(), arena.dot(*id)));
    }

    pub fn sort(&mut self, arena: &ConfigArena) {
        Self::sort_chain(arena, &mut self.full_chain);
    }

    pub fn sort_basis(&mut self, arena: &ConfigArena) {
        Self::sort_chain(arena, &mut self.basis_chain);
    }

    /// Basis chain as a sequence of (rule-index, dot) for use as a state
    /// table lookup key.
    pub fn basis_key(&self, arena: &ConfigArena) -> Vec<(u32, usize)> {
        self.basis_chain
            .iter()
            .map(|id| (arena.rule(*id).index(), arena.dot(*id)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.basis_chain.clear();
        self.full_chain.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    #[test]
    fn add_dedupes_by_rule_and_dot() {
        let mut symbols = SymbolTable::new();
        let mut rules = RuleTable::new();
        let mut arena = ConfigArena::new();
        let mut list = ConfigList::new();
        let s = symbols.find_or_create("s");
        let rule = rules.create(s, 1);
        let a = list.add(&mut arena, rule, 0);
        let b = list.add(&mut arena, rule, 0);
        assert_eq!(a, b);
        assert_eq!(list.full().len(), 1);
    }

    #[test]
    fn closure_adds_rules_for_nonterminal_after_dot() {
        let mut symbols = SymbolTable::new();
        let mut rules = RuleTable::new();
        let start = symbols.find_or_create("start");
        let expr = symbols.find_or_create("expr");
        let num = symbols.find_or_create("NUM");
        let start_rule = rules.create(start, 1);
        rules.push_rhs(start_rule, expr, None);
        let expr_rule = rules.create(expr, 2);
        rules.push_rhs(expr_rule, num, None);
        rules.compute_lambda(&symbols);
        rules.compute_first_sets(&symbols);

        let mut arena = ConfigArena::new();
        let mut list = ConfigList::new();
        list.add_with_basis(&mut arena, start_rule, 0);
        list.closure(&mut arena, &symbols, &rules);
        assert_eq!(list.full().len(), 2);
    }
}
