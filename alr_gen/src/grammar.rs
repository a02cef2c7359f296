// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C7: the Generator context that orchestrates C1-C6 into a finished
//! action table, per the `build_lambdas -> build_first_sets -> build_states
//! -> propagate_follow_sets_to_fixpoint -> build_actions ->
//! resolve_conflicts -> compress` pipeline.
use crate::action::{Action, ActionKind};
use crate::config::{ConfigArena, ConfigList, ConfigStatus};
use crate::error::{FatalError, Reporter};
use crate::options::Options;
use crate::rule::{RuleId, RuleTable};
use crate::state::{StateId, StateTable};
use crate::symbol::{Associativity, SymbolId, SymbolTable};

/// Owns every table in the system and drives the analysis pipeline. A
/// neutral re-architecture of the upstream tool's process-wide singletons:
/// every table the algorithms touch is a field here instead.
pub struct Generator {
    pub symbols: SymbolTable,
    pub rules: RuleTable,
    pub configs: ConfigArena,
    pub states: StateTable,
    pub reporter: Reporter,
    pub options: Options,
    start_symbol: Option<SymbolId>,
    default_symbol: Option<SymbolId>,
    shift_reduce_conflicts: usize,
    reduce_reduce_conflicts: usize,
    shift_shift_conflicts: usize,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Self {
            symbols: SymbolTable::new(),
            rules: RuleTable::new(),
            configs: ConfigArena::new(),
            states: StateTable::new(),
            reporter: Reporter::new(),
            options,
            start_symbol: None,
            default_symbol: None,
            shift_reduce_conflicts: 0,
            reduce_reduce_conflicts: 0,
            shift_shift_conflicts: 0,
        }
    }

    /// Record an explicit `%start_symbol` declaration.
    pub fn set_start_symbol(&mut self, symbol: SymbolId) {
        self.start_symbol = Some(symbol);
    }

    pub fn total_unresolved_conflicts(&self) -> usize {
        self.shift_reduce_conflicts + self.reduce_reduce_conflicts
    }

    pub fn shift_reduce_conflicts(&self) -> usize {
        self.shift_reduce_conflicts
    }

    pub fn reduce_reduce_conflicts(&self) -> usize {
        self.reduce_reduce_conflicts
    }

    /// The grammar's start symbol, valid once [`Generator::build`] has run.
    pub fn start_symbol(&self) -> SymbolId {
        self.start_symbol.expect("start symbol set during build()")
    }

    fn rule_text(&self, rule: RuleId) -> String {
        let r = self.rules.nth(rule);
        let rhs: Vec<&str> = r
            .rhs()
            .iter()
            .map(|entry| self.symbols.nth(entry.symbol).name())
            .collect();
        format!(
            "{} ::= {}",
            self.symbols.nth(r.lhs()).name(),
            rhs.join(" ")
        )
    }

    /// Run the full pipeline. On success, `self.states`/`self.rules` carry a
    /// finished (and, unless `--no-compress`, compressed) action table.
    pub fn build(&mut self) -> Result<(), FatalError> {
        self.default_symbol = Some(
            self.symbols
                .add_default()
                .map_err(|_| FatalError::InternalInvariantBroken("default symbol twice".into()))?,
        );

        if self.rules.count() == 0 {
            return Err(FatalError::EmptyGrammar);
        }

        // Stage A: start-symbol selection.
        let start = self
            .start_symbol
            .unwrap_or_else(|| self.rules.nth(RuleId::first()).lhs());
        self.start_symbol = Some(start);
        if self.rules.is_on_rhs(start) {
            self.reporter.warning(
                None,
                format!(
                    "start symbol \"{}\" appears on a right-hand side; parsing will not work properly",
                    self.symbols.nth(start).name()
                ),
            );
        }

        self.rules.compute_lambda(&self.symbols);
        self.rules.compute_first_sets(&self.symbols);
        self.rules.assign_precedences(&self.symbols);

        for lhs in self.symbols.ids() {
            if !self.symbols.nth(lhs).is_terminal()
                && lhs != start
                && !self.rules.has_rules(lhs)
                && self.symbols.nth(lhs).name() != crate::symbol::ERROR_SYMBOL
            {
                self.reporter.error(
                    None,
                    format!("nonterminal \"{}\" has no rules", self.symbols.nth(lhs).name()),
                );
            }
        }

        // Stage B: initial state.
        let mut seed = ConfigList::new();
        let end_of_input = self.symbols.end_of_input();
        for &rule in self.rules.rules_for_lhs(start) {
            let id = seed.add_with_basis(&mut self.configs, rule, 0);
            self.configs.follow_set(id).add(end_of_input);
        }

        // Stage C (recursive through build_shifts).
        self.get_next_state(seed)?;

        // Stage D: link flip.
        for owner in self.configs.ids() {
            for source in self.configs.backward_links(owner) {
                self.configs.add_forward_link(source, owner);
            }
        }

        // Stage E: follow-set propagation to fixpoint.
        for id in self.configs.ids() {
            self.configs.set_status(id, ConfigStatus::Incomplete);
        }
        let mut changed = true;
        while changed {
            changed = false;
            for id in self.configs.ids() {
                if self.configs.status(id) != ConfigStatus::Incomplete {
                    continue;
                }
                for target in self.configs.forward_links(id) {
                    if self
                        .configs
                        .follow_set(target)
                        .combine(self.configs.follow_set(id))
                    {
                        self.configs.set_status(target, ConfigStatus::Incomplete);
                        changed = true;
                    }
                }
                self.configs.set_status(id, ConfigStatus::Complete);
            }
        }

        self.build_actions(start)?;

        if !self.options.no_compress {
            let default_symbol = self.default_symbol.unwrap();
            for state_id in self.states.ids() {
                self.states
                    .nth(state_id)
                    .actions_mut()
                    .compress(&self.symbols, default_symbol);
            }
        }

        Ok(())
    }

    /// Stage C: given a (possibly still-open) candidate list, return the
    /// (possibly pre-existing) state it identifies.
    fn get_next_state(&mut self, mut candidate: ConfigList) -> Result<StateId, FatalError> {
        candidate.sort_basis(&self.configs);
        let key = candidate.basis_key(&self.configs);
        if let Some(existing) = self.states.find(&self.configs, &key) {
            let existing_basis = self.states.nth(existing).basis().to_vec();
            for (candidate_id, existing_id) in candidate.basis().iter().zip(existing_basis.iter())
            {
                self.configs.merge_backward_links(*existing_id, *candidate_id);
            }
            return Ok(existing);
        }
        candidate.closure(&mut self.configs, &self.symbols, &self.rules);
        candidate.sort(&self.configs);
        let basis = candidate.basis().to_vec();
        let full = candidate.full().to_vec();
        let new_state = self.states.add(basis, full);
        for &id in self.states.nth(new_state).full() {
            self.configs.set_state(id, new_state);
        }
        self.build_shifts(new_state)?;
        Ok(new_state)
    }

    /// Group every incomplete, non-reduce configuration in `state` by its
    /// next symbol and emit one `Shift` action (recursing into
    /// `get_next_state`) per group.
    fn build_shifts(&mut self, state: StateId) -> Result<(), FatalError> {
        let full_ids = self.states.nth(state).full().to_vec();
        for &id in &full_ids {
            self.configs.set_status(id, ConfigStatus::Incomplete);
        }
        for i in 0..full_ids.len() {
            let id = full_ids[i];
            if self.configs.status(id) != ConfigStatus::Incomplete {
                continue;
            }
            let rule_id = self.configs.rule(id);
            let dot = self.configs.dot(id);
            let rhs_len = self.rules.nth(rule_id).len();
            if dot >= rhs_len {
                continue;
            }
            let x = self.rules.nth(rule_id).rhs()[dot].symbol;
            let mut new_list = ConfigList::new();
            for &candidate in &full_ids {
                if self.configs.status(candidate) != ConfigStatus::Incomplete {
                    continue;
                }
                let c_rule = self.configs.rule(candidate);
                let c_dot = self.configs.dot(candidate);
                let c_rhs = self.rules.nth(c_rule).rhs();
                if c_dot < c_rhs.len() && c_rhs[c_dot].symbol == x {
                    self.configs.set_status(candidate, ConfigStatus::Complete);
                    let new_id = new_list.add_with_basis(&mut self.configs, c_rule, c_dot + 1);
                    self.configs.add_backward_link(new_id, candidate);
                }
            }
            let successor = self.get_next_state(new_list)?;
            self.states.nth(state).actions_mut().push(Action {
                lookahead: x,
                kind: ActionKind::Shift(successor),
            });
        }
        Ok(())
    }

    /// Stage F: build each state's Reduce/Accept actions, detect
    /// shift/shift conflicts (an internal-invariant break, never a normal
    /// grammar conflict - see the resolved open question in the design
    /// notes), sort, and resolve shift/reduce and reduce/reduce conflicts.
    fn build_actions(&mut self, start: SymbolId) -> Result<(), FatalError> {
        for state_id in self.states.ids() {
            let full = self.states.nth(state_id).full().to_vec();
            for id in full {
                let rule_id = self.configs.rule(id);
                let dot = self.configs.dot(id);
                if dot == self.rules.nth(rule_id).len() {
                    for terminal in self.configs.follow_set(id).iter() {
                        self.states.nth(state_id).actions_mut().push(Action {
                            lookahead: terminal,
                            kind: ActionKind::Reduce(rule_id),
                        });
                    }
                }
            }
        }

        self.states.nth(self.states.start()).actions_mut().push(Action {
            lookahead: start,
            kind: ActionKind::Accept,
        });

        for state_id in self.states.ids() {
            self.detect_shift_shift_conflicts(state_id)?;
            self.states.nth(state_id).actions_mut().sort(&self.symbols);
            self.resolve_state_conflicts(state_id)?;
        }

        for rule_id in self.rules.ids() {
            self.rules.nth(rule_id).set_can_reduce(false);
        }
        for state_id in self.states.ids() {
            for action in self.states.nth(state_id).actions().iter() {
                if let ActionKind::Reduce(rule_id) = action.kind {
                    self.rules.nth(rule_id).set_can_reduce(true);
                }
            }
        }
        for rule_id in self.rules.ids() {
            if !self.rules.nth(rule_id).can_reduce() {
                let line = self.rules.nth(rule_id).line();
                let text = self.rule_text(rule_id);
                self.reporter
                    .error(None, format!("{} (line {}) can not be reduced", text, line));
            }
        }

        Ok(())
    }

    /// Reimplementations should detect shift/shift conflicts unconditionally
    /// rather than filtering on non-empty forward propagation links (an
    /// open question in the design notes, resolved here in favour of the
    /// unconditional check). By construction `build_shifts` already merges
    /// every incomplete item pointing at the same symbol into a single
    /// Shift action, so finding two is a tool bug, not a grammar conflict.
    fn detect_shift_shift_conflicts(&mut self, state_id: StateId) -> Result<(), FatalError> {
        let actions = self.states.nth(state_id).actions();
        let mut seen: Vec<SymbolId> = Vec::new();
        for action in actions.iter() {
            if matches!(action.kind, ActionKind::Shift(_)) {
                if seen.contains(&action.lookahead) {
                    self.shift_shift_conflicts += 1;
                    return Err(FatalError::InternalInvariantBroken(format!(
                        "duplicate shift on \"{}\" in state {}",
                        self.symbols.nth(action.lookahead).name(),
                        state_id
                    )));
                }
                seen.push(action.lookahead);
            }
        }
        Ok(())
    }

    /// §4.7.1: walk the sorted action list pairwise, resolving any two
    /// adjacent actions that share a lookahead.
    fn resolve_state_conflicts(&mut self, state_id: StateId) -> Result<(), FatalError> {
        let len = self.states.nth(state_id).actions().len();
        if len < 2 {
            return Ok(());
        }
        for i in 0..len - 1 {
            let (a, b) = {
                let actions = self.states.nth(state_id).actions();
                let mut iter = actions.iter().skip(i);
                let a = *iter.next().unwrap();
                let b = *iter.next().unwrap();
                (a, b)
            };
            if a.lookahead != b.lookahead {
                continue;
            }
            if a.kind.is_internal() || b.kind.is_internal() {
                continue;
            }
            let resolution = self.decide_conflict(a, b)?;
            let mut actions = self.states.nth(state_id).actions_mut();
            let mut slots = actions.iter_mut().skip(i);
            let slot_a = slots.next().unwrap();
            let slot_b = slots.next().unwrap();
            match resolution {
                Resolution::KeepA => slot_b.kind = ActionKind::ReduceResolved,
                Resolution::KeepB => {
                    slot_a.kind = match slot_a.kind {
                        ActionKind::Reduce(_) => ActionKind::ReduceResolved,
                        _ => ActionKind::ShiftResolved,
                    };
                }
                Resolution::Conflict => {
                    slot_b.kind = ActionKind::Conflict;
                }
            }
        }
        Ok(())
    }

    fn decide_conflict(&mut self, a: Action, b: Action) -> Result<Resolution, FatalError> {
        match (a.kind, b.kind) {
            (ActionKind::Shift(_), ActionKind::Reduce(rule_b)) => {
                let sa = self.symbols.nth(a.lookahead).precedence();
                let sb = self
                    .rules
                    .nth(rule_b)
                    .precedence_symbol()
                    .map(|s| self.symbols.nth(s).precedence())
                    .unwrap_or(-1);
                if sb < 0 || sa < 0 {
                    self.shift_reduce_conflicts += 1;
                    Ok(Resolution::Conflict)
                } else if sa > sb {
                    Ok(Resolution::KeepA)
                } else if sa < sb {
                    Ok(Resolution::KeepB)
                } else {
                    match self.symbols.nth(a.lookahead).associativity() {
                        Associativity::Right => Ok(Resolution::KeepA),
                        Associativity::Left => Ok(Resolution::KeepB),
                        Associativity::None => {
                            self.shift_reduce_conflicts += 1;
                            Ok(Resolution::Conflict)
                        }
                        Associativity::Unknown => Err(FatalError::InternalInvariantBroken(
                            "shift/reduce tie with unknown associativity".into(),
                        )),
                    }
                }
            }
            (ActionKind::Reduce(rule_a), ActionKind::Reduce(rule_b)) => {
                let sa = self
                    .rules
                    .nth(rule_a)
                    .precedence_symbol()
                    .map(|s| self.symbols.nth(s).precedence())
                    .unwrap_or(-1);
                let sb = self
                    .rules
                    .nth(rule_b)
                    .precedence_symbol()
                    .map(|s| self.symbols.nth(s).precedence())
                    .unwrap_or(-1);
                if sa < 0 || sb < 0 || sa == sb {
                    self.reduce_reduce_conflicts += 1;
                    Ok(Resolution::Conflict)
                } else if sa > sb {
                    Ok(Resolution::KeepA)
                } else {
                    Ok(Resolution::KeepB)
                }
            }
            _ => {
                self.shift_reduce_conflicts += 1;
                Ok(Resolution::Conflict)
            }
        }
    }
}

enum Resolution {
    KeepA,
    KeepB,
    Conflict,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;

    #[test]
    fn scenario_1_minimal_arithmetic_is_conflict_free() {
        let mut gen = Generator::new(Options::default());
        let expr = gen.symbols.find_or_create("expr");
        let term = gen.symbols.find_or_create("term");
        let plus = gen.symbols.find_or_create("PLUS");
        let num = gen.symbols.find_or_create("NUM");
        gen.symbols.set_precedence(plus, Associativity::Left, 1).unwrap();
        let r0 = gen.rules.create(expr, 1);
        gen.rules.push_rhs(r0, expr, None);
        gen.rules.push_rhs(r0, plus, None);
        gen.rules.push_rhs(r0, term, None);
        let r1 = gen.rules.create(expr, 2);
        gen.rules.push_rhs(r1, term, None);
        let r2 = gen.rules.create(term, 3);
        gen.rules.push_rhs(r2, num, None);

        gen.build().unwrap();

        assert_eq!(gen.total_unresolved_conflicts(), 0);
        assert!(gen.symbols.nth(expr).first_set().contains(num));
        assert!(gen.symbols.nth(term).first_set().contains(num));
        assert!(!gen.symbols.nth(expr).lambda());
    }

    #[test]
    fn scenario_2_shift_reduce_resolved_by_left_associativity() {
        let mut gen = Generator::new(Options::default());
        let e = gen.symbols.find_or_create("e");
        let plus = gen.symbols.find_or_create("PLUS");
        let num = gen.symbols.find_or_create("NUM");
        gen.symbols.set_precedence(plus, Associativity::Left, 1).unwrap();
        let r0 = gen.rules.create(e, 1);
        gen.rules.push_rhs(r0, e, None);
        gen.rules.push_rhs(r0, plus, None);
        gen.rules.push_rhs(r0, e, None);
        let r1 = gen.rules.create(e, 2);
        gen.rules.push_rhs(r1, num, None);

        gen.build().unwrap();

        assert_eq!(gen.total_unresolved_conflicts(), 0);
    }

    #[test]
    fn scenario_3_shift_reduce_unresolved_without_precedence() {
        let mut gen = Generator::new(Options::default());
        let e = gen.symbols.find_or_create("e");
        let plus = gen.symbols.find_or_create("PLUS");
        let num = gen.symbols.find_or_create("NUM");
        let r0 = gen.rules.create(e, 1);
        gen.rules.push_rhs(r0, e, None);
        gen.rules.push_rhs(r0, plus, None);
        gen.rules.push_rhs(r0, e, None);
        let r1 = gen.rules.create(e, 2);
        gen.rules.push_rhs(r1, num, None);

        gen.build().unwrap();

        assert_eq!(gen.total_unresolved_conflicts(), 1);
    }

    #[test]
    fn scenario_4_default_reduce_compression() {
        let mut gen = Generator::new(Options::default());
        let top = gen.symbols.find_or_create("top");
        let x = gen.symbols.find_or_create("x");
        let big_x = gen.symbols.find_or_create("X");
        let a = gen.symbols.find_or_create("A");
        let b = gen.symbols.find_or_create("B");
        let c = gen.symbols.find_or_create("C");
        for terminal in [a, b, c] {
            let r = gen.rules.create(top, 1);
            gen.rules.push_rhs(r, x, None);
            gen.rules.push_rhs(r, terminal, None);
        }
        let x_rule = gen.rules.create(x, 2);
        gen.rules.push_rhs(x_rule, big_x, None);

        gen.build().unwrap();

        let state_with_reduce = gen
            .states
            .ids()
            .find(|id| {
                let actions = gen.states.nth(*id).actions();
                actions.len() == 1
                    && matches!(
                        actions.iter().next().unwrap().kind,
                        ActionKind::Reduce(r) if r == x_rule
                    )
            })
            .expect("expected a lone default-reduce state for x ::= X");
        let actions = gen.states.nth(state_with_reduce).actions();
        let only = actions.iter().next().unwrap();
        assert_eq!(only.lookahead, gen.symbols.default_name().unwrap());
    }

    #[test]
    fn scenario_5_unreducible_rule_is_reported() {
        let mut gen = Generator::new(Options::default());
        let a = gen.symbols.find_or_create("a");
        let b = gen.symbols.find_or_create("b");
        let c = gen.symbols.find_or_create("c");
        let big_b = gen.symbols.find_or_create("B");
        let big_c = gen.symbols.find_or_create("C");
        let r0 = gen.rules.create(a, 1);
        gen.rules.push_rhs(r0, b, None);
        let r1 = gen.rules.create(b, 2);
        gen.rules.push_rhs(r1, big_b, None);
        let r2 = gen.rules.create(c, 3);
        gen.rules.push_rhs(r2, big_c, None);

        gen.build().unwrap();

        assert!(!gen.rules.nth(r2).can_reduce());
        assert!(gen.rules.nth(r1).can_reduce());
        assert!(gen
            .reporter
            .errors()
            .iter()
            .any(|d| d.message.contains("can not be reduced")));
    }

    #[test]
    fn empty_grammar_is_fatal() {
        let mut gen = Generator::new(Options::default());
        assert!(matches!(gen.build(), Err(FatalError::EmptyGrammar)));
    }
}
