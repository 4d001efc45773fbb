use std::{
    collections::{BTreeSet, HashMap, HashSet},
    hash::Hash,
    mem,
};

use crate::nfa::StateId;

/// Transition relation shared by NFAs and DFAs
///
/// Triples are stored as three parallel sequences. A `(state, symbol)` pair
/// may have any number of targets; whether the relation is deterministic is
/// a property of its content, see [`Transitions::is_deterministic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transitions<T> {
    from: Vec<StateId>,
    symbol: Vec<T>,
    to: Vec<StateId>,
}

impl<T> Default for Transitions<T> {
    fn default() -> Self {
        Self {
            from: Vec::new(),
            symbol: Vec::new(),
            to: Vec::new(),
        }
    }
}

impl<T: Clone + Ord + Hash> Transitions<T> {
    /// Create an empty relation
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a relation from raw `(from, symbol, to)` triples
    pub fn from_triples(triples: impl IntoIterator<Item = (StateId, T, StateId)>) -> Self {
        let mut transitions = Self::new();

        for (from, symbol, to) in triples {
            transitions.insert(from, symbol, to);
        }

        transitions
    }

    /// Append a single transition
    pub fn insert(&mut self, from: StateId, symbol: T, to: StateId) {
        self.from.push(from);
        self.symbol.push(symbol);
        self.to.push(to);
    }

    pub fn len(&self) -> usize {
        self.from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &T, StateId)> + '_ {
        self.from
            .iter()
            .zip(&self.symbol)
            .zip(&self.to)
            .map(|((from, symbol), to)| (*from, symbol, *to))
    }

    /// Consume the relation into its triples, in storage order
    pub fn into_triples(self) -> impl Iterator<Item = (StateId, T, StateId)> {
        self.from
            .into_iter()
            .zip(self.symbol)
            .zip(self.to)
            .map(|((from, symbol), to)| (from, symbol, to))
    }

    /// States reachable from `state` in one step
    ///
    /// With `None` every outgoing transition counts, whatever its symbol.
    pub fn targets<'a>(
        &'a self,
        state: StateId,
        symbol: Option<&'a T>,
    ) -> impl Iterator<Item = StateId> + 'a {
        self.iter()
            .filter(move |&(from, through, _)| {
                from == state && symbol.map_or(true, |symbol| symbol == through)
            })
            .map(|(_, _, to)| to)
    }

    /// Set union with another relation
    ///
    /// Identical triples, whether from `self` or from `other`, are kept once
    /// and in first-seen order.
    pub fn merge(&mut self, other: Transitions<T>) {
        let mut seen = HashSet::with_capacity(self.len() + other.len());
        let mut merged = Self::new();

        for (from, symbol, to) in mem::take(self).into_triples().chain(other.into_triples()) {
            if seen.insert((from, symbol.clone(), to)) {
                merged.insert(from, symbol, to);
            }
        }

        *self = merged;
    }

    /// Swap the endpoints of every transition
    pub fn reverse(&mut self) {
        mem::swap(&mut self.from, &mut self.to);
    }

    /// Substitute every state reference
    pub fn remap(&mut self, mut map: impl FnMut(StateId) -> StateId) {
        for state in self.from.iter_mut().chain(self.to.iter_mut()) {
            *state = map(*state);
        }
    }

    /// Stable sort by `(from, symbol, to)`
    pub fn sort(&mut self) {
        let mut triples = mem::take(self).into_triples().collect::<Vec<_>>();

        triples.sort();

        *self = Self::from_triples(triples);
    }

    /// Symbols used by at least one transition
    pub fn alphabet(&self) -> BTreeSet<T> {
        self.symbol.iter().cloned().collect()
    }

    /// States mentioned as either endpoint
    pub fn states(&self) -> BTreeSet<StateId> {
        self.from.iter().chain(&self.to).copied().collect()
    }

    /// Whether every `(state, symbol)` pair has at most one target
    pub fn is_deterministic(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.len());

        self.iter().all(|(from, symbol, _)| seen.insert((from, symbol)))
    }

    /// Targets grouped by `(state, symbol)`, in storage order
    pub fn grouped(&self) -> HashMap<(StateId, T), Vec<StateId>> {
        let mut grouped: HashMap<(StateId, T), Vec<StateId>> = HashMap::with_capacity(self.len());

        for (from, symbol, to) in self.iter() {
            grouped.entry((from, symbol.clone())).or_default().push(to);
        }

        grouped
    }
}
