// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C1: interned grammar symbols and the table that owns them.
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use crate::follow_set::FollowSet;

/// Stable handle for a [`Symbol`]. Distinct from [`Symbol::index`], which is
/// an attribute reassigned whenever the table is reindexed; `SymbolId` never
/// changes once a symbol has been created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    None,
    Unknown,
}

impl Default for Associativity {
    fn default() -> Self {
        Associativity::Unknown
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Associativity::Left => "left",
            Associativity::Right => "right",
            Associativity::None => "nonassoc",
            Associativity::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
    index: Cell<u32>,
    precedence: Cell<i32>,
    associativity: Cell<Associativity>,
    first_set: FollowSet,
    lambda: Cell<bool>,
    destructor: Option<(String, u32)>,
    data_type: Option<String>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn index(&self) -> u32 {
        self.index.get()
    }

    /// Precedence, or `-1` if never set.
    pub fn precedence(&self) -> i32 {
        self.precedence.get()
    }

    pub fn associativity(&self) -> Associativity {
        self.associativity.get()
    }

    pub fn first_set(&self) -> &FollowSet {
        &self.first_set
    }

    pub fn lambda(&self) -> bool {
        self.lambda.get()
    }

    pub fn set_lambda(&self, value: bool) {
        self.lambda.set(value)
    }

    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    pub fn destructor(&self) -> Option<(&str, u32)> {
        self.destructor.as_ref().map(|(code, line)| (code.as_str(), *line))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Raised when a symbol-table invariant would be violated.
#[derive(Debug)]
pub enum Error {
    DuplicateDefault,
    PrecedenceAlreadySet(SymbolId),
    DestructorAlreadySet(SymbolId),
    TypeAlreadySet(SymbolId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateDefault => write!(f, "default symbol already added"),
            Error::PrecedenceAlreadySet(id) => {
                write!(f, "precedence already set for symbol {}", id)
            }
            Error::DestructorAlreadySet(id) => {
                write!(f, "destructor already set for symbol {}", id)
            }
            Error::TypeAlreadySet(id) => {
                write!(f, "data type already set for symbol {}", id)
            }
        }
    }
}

/// Interns grammar symbols and assigns them a lexicographically-derived
/// index on every insertion. `$` (end of input) and `{default}` are always
/// present from construction.
#[derive(Debug)]
pub struct SymbolTable {
    by_name: BTreeMap<String, usize>,
    symbols: Vec<Symbol>,
    terminal_count: Cell<u32>,
    default_symbol: Option<SymbolId>,
}

const END_OF_INPUT: &str = "$";
const DEFAULT_NAME: &str = "{default}";
pub const ERROR_SYMBOL: &str = "error";

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            by_name: BTreeMap::new(),
            symbols: Vec::new(),
            terminal_count: Cell::new(0),
            default_symbol: None,
        };
        table.intern(END_OF_INPUT, SymbolKind::Terminal);
        table.intern(ERROR_SYMBOL, SymbolKind::Terminal);
        table.reindex();
        table
    }

    fn intern(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        let slot = self.symbols.len();
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            index: Cell::new(0),
            precedence: Cell::new(-1),
            associativity: Cell::new(Associativity::Unknown),
            first_set: FollowSet::new(),
            lambda: Cell::new(false),
            destructor: None,
            data_type: None,
        });
        self.by_name.insert(name.to_string(), slot);
        if kind == SymbolKind::Terminal {
            self.terminal_count.set(self.terminal_count.get() + 1);
        }
        SymbolId(slot as u32)
    }

    fn reindex(&mut self) {
        for (new_index, slot) in self.by_name.values().enumerate() {
            self.symbols[*slot].index.set(new_index as u32);
        }
    }

    fn classify(name: &str) -> SymbolKind {
        match name.chars().next() {
            Some(c) if c.is_ascii_uppercase() => SymbolKind::Terminal,
            _ => SymbolKind::Nonterminal,
        }
    }

    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).map(|slot| SymbolId(*slot as u32))
    }

    /// Look up `name`, creating it (with kind derived from its first
    /// character) if this is its first mention.
    pub fn find_or_create(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.find(name) {
            return id;
        }
        let id = self.intern(name, Self::classify(name));
        self.reindex();
        id
    }

    pub fn nth(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.as_usize()]
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn terminal_count(&self) -> u32 {
        self.terminal_count.get()
    }

    pub fn end_of_input(&self) -> SymbolId {
        self.find(END_OF_INPUT).expect("$ always present")
    }

    pub fn error_symbol(&self) -> SymbolId {
        self.find(ERROR_SYMBOL).expect("error always present")
    }

    pub fn default_name(&self) -> Option<SymbolId> {
        self.default_symbol
    }

    pub fn add_default(&mut self) -> Result<SymbolId, Error> {
        if self.default_symbol.is_some() {
            return Err(Error::DuplicateDefault);
        }
        let id = self.intern(DEFAULT_NAME, SymbolKind::Terminal);
        self.reindex();
        self.default_symbol = Some(id);
        Ok(id)
    }

    pub fn set_precedence(
        &mut self,
        id: SymbolId,
        associativity: Associativity,
        precedence: i32,
    ) -> Result<(), Error> {
        let symbol = &self.symbols[id.as_usize()];
        if symbol.precedence.get() >= 0 {
            return Err(Error::PrecedenceAlreadySet(id));
        }
        symbol.precedence.set(precedence);
        symbol.associativity.set(associativity);
        Ok(())
    }

    /// Record `%destructor SYM { code }`. Rejects a second destructor for
    /// the same symbol, per the "duplicate destructor" semantic error.
    pub fn set_destructor(&mut self, id: SymbolId, code: String, line: u32) -> Result<(), Error> {
        let symbol = &mut self.symbols[id.as_usize()];
        if symbol.destructor.is_some() {
            return Err(Error::DestructorAlreadySet(id));
        }
        symbol.destructor = Some((code, line));
        Ok(())
    }

    /// Record `%type SYM { type }`. Rejects a second data type for the
    /// same symbol, per the "duplicate type" semantic error.
    pub fn set_data_type(&mut self, id: SymbolId, data_type: String) -> Result<(), Error> {
        let symbol = &mut self.symbols[id.as_usize()];
        if symbol.data_type.is_some() {
            return Err(Error::TypeAlreadySet(id));
        }
        symbol.data_type = Some(data_type);
        Ok(())
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).map(|i| SymbolId(i as u32))
    }

    /// Symbol ids in current index order (i.e. lexicographic by name), the
    /// order emitters walk when numbering tokens and nonterminals.
    pub fn ids_in_index_order(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self.ids().collect();
        ids.sort_by_key(|id| self.nth(*id).index());
        ids
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_first_char() {
        let mut table = SymbolTable::new();
        let t = table.find_or_create("NUM");
        let n = table.find_or_create("expr");
        assert!(table.nth(t).is_terminal());
        assert!(!table.nth(n).is_terminal());
    }

    #[test]
    fn indices_are_dense_and_reflect_name_order() {
        let mut table = SymbolTable::new();
        table.find_or_create("NUM");
        table.find_or_create("expr");
        table.find_or_create("PLUS");
        let mut seen: Vec<u32> = table.ids().map(|id| table.nth(id).index()).collect();
        seen.sort();
        let expected: Vec<u32> = (0..table.count() as u32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn default_symbol_can_only_be_added_once() {
        let mut table = SymbolTable::new();
        assert!(table.add_default().is_ok());
        assert!(matches!(table.add_default(), Err(Error::DuplicateDefault)));
    }

    #[test]
    fn precedence_cannot_be_reset() {
        let mut table = SymbolTable::new();
        let id = table.find_or_create("PLUS");
        assert!(table.set_precedence(id, Associativity::Left, 1).is_ok());
        assert!(matches!(
            table.set_precedence(id, Associativity::Right, 2),
            Err(Error::PrecedenceAlreadySet(_))
        ));
    }
}
