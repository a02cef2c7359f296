// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! `--verbose` report writer: a per-state listing of configurations (with
//! follow-sets and propagation targets) followed by the action list, per §6.
use std::io::{self, Write};

use crate::action::ActionKind;
use crate::config::ConfigId;
use crate::grammar::Generator;
use crate::state::StateId;

/// Write the full `<stem>.out` report for `generator` (which must already
/// have been through [`Generator::build`]).
pub fn write_report(generator: &Generator, basis_only: bool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Grammar:")?;
    for rule_id in generator.rules.ids() {
        let rule = generator.rules.nth(rule_id);
        let rhs: Vec<String> = rule
            .rhs()
            .iter()
            .map(|entry| generator.symbols.nth(entry.symbol).name().to_string())
            .collect();
        writeln!(
            out,
            "  {}: {} ::= {}",
            rule_id,
            generator.symbols.nth(rule.lhs()).name(),
            rhs.join(" ")
        )?;
    }
    writeln!(out)?;

    for state_id in generator.states.ids() {
        write_state(generator, state_id, basis_only, out)?;
    }
    Ok(())
}

fn write_state(generator: &Generator, state_id: StateId, basis_only: bool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "State<{}>:", state_id)?;
    let state = generator.states.nth(state_id);
    let configs: &[ConfigId] = if basis_only { state.basis() } else { state.full() };
    writeln!(out, "  Configurations:")?;
    for &config in configs {
        write_config(generator, config, out)?;
    }

    writeln!(out, "  Actions:")?;
    if state.actions().is_empty() {
        writeln!(out, "    <empty>")?;
    } else {
        for action in state.actions().iter() {
            write_action(generator, action, out)?;
        }
    }
    Ok(())
}

fn write_config(generator: &Generator, config: ConfigId, out: &mut dyn Write) -> io::Result<()> {
    let rule_id = generator.configs.rule(config);
    let rule = generator.rules.nth(rule_id);
    let dot = generator.configs.dot(config);
    let mut rhs_names: Vec<String> = rule
        .rhs()
        .iter()
        .map(|entry| generator.symbols.nth(entry.symbol).name().to_string())
        .collect();
    rhs_names.insert(dot, "\u{00b7}".to_string());
    let follow: Vec<String> = generator
        .configs
        .follow_set(config)
        .iter()
        .map(|id| generator.symbols.nth(id).name().to_string())
        .collect();
    writeln!(
        out,
        "    {} ::= {}  [{}]",
        generator.symbols.nth(rule.lhs()).name(),
        rhs_names.join(" "),
        follow.join(" ")
    )?;
    let forward = generator.configs.forward_links(config);
    if !forward.is_empty() {
        let targets: Vec<String> = forward.iter().map(|id| describe_target(generator, *id)).collect();
        writeln!(out, "      forward: {}", targets.join(", "))?;
    }
    let backward = generator.configs.backward_links(config);
    if !backward.is_empty() {
        let targets: Vec<String> = backward.iter().map(|id| describe_target(generator, *id)).collect();
        writeln!(out, "      backward: {}", targets.join(", "))?;
    }
    Ok(())
}

/// Describe a propagation-link target by the LHS of the rule it instantiates
/// and the index of the state it is a member of, per §6's "forward/backward
/// propagation targets by (LHS, state-index)". A target's owning state is
/// `None` only if it belonged to a candidate state rejected as a duplicate
/// before the link-flip pass ran, which Stage D's fixpoint never visits.
fn describe_target(generator: &Generator, config: ConfigId) -> String {
    let rule = generator.rules.nth(generator.configs.rule(config));
    let lhs = generator.symbols.nth(rule.lhs()).name();
    match generator.configs.state(config) {
        Some(state_id) => format!("{}@State<{}>", lhs, state_id),
        None => format!("{}@?", lhs),
    }
}

fn write_action(generator: &Generator, action: &crate::action::Action, out: &mut dyn Write) -> io::Result<()> {
    let lookahead = generator.symbols.nth(action.lookahead).name();
    match action.kind {
        ActionKind::Shift(target) => writeln!(out, "    {}: shift -> State<{}>", lookahead, target),
        ActionKind::Reduce(rule) => {
            let r = generator.rules.nth(rule);
            let rhs: Vec<&str> = r
                .rhs()
                .iter()
                .map(|entry| generator.symbols.nth(entry.symbol).name())
                .collect();
            writeln!(
                out,
                "    {}: reduce {} ::= {}",
                lookahead,
                generator.symbols.nth(r.lhs()).name(),
                rhs.join(" ")
            )
        }
        ActionKind::Accept => writeln!(out, "    {}: accept", lookahead),
        ActionKind::Error => writeln!(out, "    {}: error", lookahead),
        ActionKind::Conflict => writeln!(out, "    {}: ** unresolved conflict **", lookahead),
        ActionKind::ShiftResolved | ActionKind::ReduceResolved | ActionKind::NotUsed => Ok(()),
    }
}
