//! Deterministic automata
//!
//! A [`Dfa`] is built either by running the subset construction over a
//! Thompson [`Nfa`] or from its text codification (see
//! [`codification`](crate::codification)). Automata built from an NFA are
//! canonical: states are numbered in discovery order, the sink state takes
//! the last id, and transitions are sorted. Compiling the same regex twice
//! therefore produces identical automata.

use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    fmt,
};

use crate::{
    compiler::Compiler,
    nfa::{Nfa, StateId, Symbol},
    syntax::RegexNode,
    transitions::Transitions,
    CompileResult,
};

/// Id given to the sink until the number of live states is known
const SINK_PENDING: StateId = StateId::MAX;

/// A set of NFA states standing for one DFA state
///
/// The ids are kept sorted and deduplicated, so equality and hashing are
/// structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(Vec<StateId>);

impl StateSet {
    pub fn contains(&self, state: StateId) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut states = iter.into_iter().collect::<Vec<_>>();

        states.sort_unstable();
        states.dedup();

        Self(states)
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.0 {
            write!(f, "{}", state)?;
        }

        Ok(())
    }
}

/// A deterministic automaton recognising the lexemes of one token kind
#[derive(Debug, Clone)]
pub struct Dfa {
    alphabet: Vec<char>,
    label: String,
    start: StateId,
    finals: BTreeSet<StateId>,
    states: BTreeSet<StateId>,
    transitions: Transitions<char>,
    sinks: BTreeSet<StateId>,
    lookup: HashMap<(StateId, char), StateId>,
}

impl Dfa {
    /// Compile infix regex text into a DFA labelled `label`
    pub fn from_regex(regex: &str, label: impl Into<String>) -> CompileResult<Self> {
        let node = RegexNode::parse(regex)?;
        let nfa = Compiler::new().compile(&node);

        Ok(Self::from_nfa(&nfa, label))
    }

    /// Subset construction
    pub fn from_nfa(nfa: &Nfa, label: impl Into<String>) -> Self {
        Determinizer::new(nfa).run(label.into())
    }

    /// Assemble a DFA from its parts
    ///
    /// The state set is whatever the transitions, the start state and the
    /// final states mention. Sink states are the states from which no final
    /// state can be reached. When several transitions share a state and a
    /// symbol, stepping follows the first one.
    pub fn new(
        alphabet: Vec<char>,
        label: impl Into<String>,
        start: StateId,
        finals: BTreeSet<StateId>,
        mut transitions: Transitions<char>,
    ) -> Self {
        let mut states = transitions.states();
        states.insert(start);
        states.extend(finals.iter().copied());

        let sinks = detect_sinks(&mut transitions, &states, &finals);

        Self::assemble(alphabet, label.into(), start, finals, states, transitions, sinks)
    }

    fn assemble(
        alphabet: Vec<char>,
        label: String,
        start: StateId,
        finals: BTreeSet<StateId>,
        states: BTreeSet<StateId>,
        transitions: Transitions<char>,
        sinks: BTreeSet<StateId>,
    ) -> Self {
        let mut lookup = HashMap::with_capacity(transitions.len());

        for (from, symbol, to) in transitions.iter() {
            lookup.entry((from, *symbol)).or_insert(to);
        }

        Self {
            alphabet,
            label,
            start,
            finals,
            states,
            transitions,
            sinks,
            lookup,
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Token label attached to every lexeme this automaton recognises
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transitions(&self) -> &Transitions<char> {
        &self.transitions
    }

    pub fn sinks(&self) -> &BTreeSet<StateId> {
        &self.sinks
    }

    /// Follow the transition leaving `state` on `symbol`, if there is one
    pub fn step(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.lookup.get(&(state, symbol)).copied()
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    pub fn is_sink(&self, state: StateId) -> bool {
        self.sinks.contains(&state)
    }

    /// Recompute the states that cannot reach a final state
    ///
    /// For automata built from an NFA this is exactly [`Dfa::sinks`].
    pub fn dead_states(&self) -> BTreeSet<StateId> {
        let mut transitions = self.transitions.clone();

        detect_sinks(&mut transitions, &self.states, &self.finals)
    }
}

/// Find the states that reach no final state
///
/// The relation is reversed for the backward search and restored before
/// returning.
fn detect_sinks(
    transitions: &mut Transitions<char>,
    states: &BTreeSet<StateId>,
    finals: &BTreeSet<StateId>,
) -> BTreeSet<StateId> {
    transitions.reverse();

    let mut reached = BTreeSet::new();

    for &accepting in finals {
        let mut stack = vec![accepting];

        while let Some(state) = stack.pop() {
            for previous in transitions.targets(state, None) {
                if reached.insert(previous) {
                    stack.push(previous);
                }
            }
        }
    }

    transitions.reverse();

    states
        .iter()
        .filter(|state| !reached.contains(state) && !finals.contains(state))
        .copied()
        .collect()
}

/// State of one subset construction run
struct Determinizer<'a> {
    nfa: &'a Nfa,
    /// Epsilon closure of every NFA state
    closures: Vec<StateSet>,
    ids: HashMap<StateSet, StateId>,
    sets: Vec<StateSet>,
    queue: VecDeque<StateId>,
}

impl<'a> Determinizer<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        let closures = (0..nfa.state_count())
            .map(|state| nfa.epsilon_closure(state).into_iter().collect())
            .collect();

        Self {
            nfa,
            closures,
            ids: HashMap::new(),
            sets: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Get the id of a state set, scheduling it when it is new
    fn intern(&mut self, set: StateSet) -> StateId {
        if let Some(&id) = self.ids.get(&set) {
            return id;
        }

        let id = self.sets.len();

        trace!("discovered DFA state {} = {{{}}}", id, set);

        self.ids.insert(set.clone(), id);
        self.sets.push(set);
        self.queue.push_back(id);

        id
    }

    /// Union of the closures of every state reached on `symbol`
    fn advance(&self, set: &StateSet, symbol: char) -> StateSet {
        let mut reached = Vec::new();

        for component in set.iter() {
            for &target in self.nfa.targets(component, Symbol::Char(symbol)) {
                reached.extend(self.closures[target].iter());
            }
        }

        reached.into_iter().collect()
    }

    fn run(mut self, label: String) -> Dfa {
        let alphabet = self.nfa.alphabet().iter().copied().collect::<Vec<_>>();
        let mut transitions = Transitions::new();

        let start = self.intern(self.closures[self.nfa.start()].clone());

        while let Some(id) = self.queue.pop_front() {
            let set = self.sets[id].clone();

            for &symbol in &alphabet {
                let reached = self.advance(&set, symbol);

                let to = if reached.is_empty() {
                    SINK_PENDING
                } else {
                    self.intern(reached)
                };

                transitions.insert(id, symbol, to);
            }
        }

        for &symbol in &alphabet {
            transitions.insert(SINK_PENDING, symbol, SINK_PENDING);
        }

        let sink = self.sets.len();

        transitions.remap(|state| if state == SINK_PENDING { sink } else { state });
        transitions.sort();

        let accept = self.nfa.accept();

        let finals = self
            .sets
            .iter()
            .enumerate()
            .filter(|(_, set)| set.contains(accept))
            .map(|(id, _)| id)
            .collect();

        debug!(
            "built DFA `{}` with {} states over {} symbols",
            label,
            sink + 1,
            alphabet.len()
        );

        Dfa::assemble(
            alphabet,
            label,
            start,
            finals,
            (0..=sink).collect(),
            transitions,
            BTreeSet::from([sink]),
        )
    }
}
