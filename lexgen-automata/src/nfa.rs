use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use crate::transitions::Transitions;

/// A state ID in an automaton
pub type StateId = usize;

/// Transition label of an NFA
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Unlabeled transition, taken without consuming input
    Epsilon,
    Char(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => f.write_str("eps"),
            Symbol::Char(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Fragment of an NFA with start and end states
///
/// Every fragment produced by the Thompson construction owns its own
/// transitions and alphabet; combining fragments merges them.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
    pub transitions: Transitions<Symbol>,
    pub alphabet: BTreeSet<char>,
}

/// A Thompson NFA with a single start and a single accepting state
#[derive(Debug, Clone, PartialEq)]
pub struct Nfa {
    alphabet: BTreeSet<char>,
    state_count: usize,
    start: StateId,
    accept: StateId,
    transitions: Transitions<Symbol>,
    edges: HashMap<(StateId, Symbol), Vec<StateId>>,
}

impl Nfa {
    /// Seal a fragment into an automaton
    ///
    /// `state_count` is the number of ids handed out while building it.
    pub fn from_fragment(fragment: Fragment, state_count: usize) -> Self {
        let edges = fragment.transitions.grouped();

        Self {
            alphabet: fragment.alphabet,
            state_count,
            start: fragment.start,
            accept: fragment.end,
            transitions: fragment.transitions,
            edges,
        }
    }

    /// Symbols consumed by the automaton, epsilon excluded
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn transitions(&self) -> &Transitions<Symbol> {
        &self.transitions
    }

    /// States reached from `state` on `symbol`
    pub fn targets(&self, state: StateId, symbol: Symbol) -> &[StateId] {
        self.edges
            .get(&(state, symbol))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Get the epsilon closure of a single state
    ///
    /// The closure always contains `state` itself. Star and plus produce
    /// epsilon cycles, so the traversal keeps track of visited states.
    pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::from([state]);
        let mut stack = vec![state];

        while let Some(current) = stack.pop() {
            for &next in self.targets(current, Symbol::Epsilon) {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }
}
