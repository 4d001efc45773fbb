use std::collections::BTreeSet;

use crate::{
    nfa::{Fragment, Nfa, StateId, Symbol},
    syntax::RegexNode,
    transitions::Transitions,
};

/// Compiler that converts a regex syntax tree to a Thompson NFA
///
/// The compiler owns the counter that hands out fresh state ids, so one
/// compiler builds exactly one automaton.
pub struct Compiler {
    next: StateId,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Compile a syntax tree to a Thompson NFA
    pub fn compile(mut self, node: &RegexNode) -> Nfa {
        let fragment = self.compile_node(node);

        debug!(
            "compiled NFA with {} states and {} transitions",
            self.next,
            fragment.transitions.len()
        );

        Nfa::from_fragment(fragment, self.next)
    }

    fn fresh(&mut self) -> StateId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Compile a syntax tree node to an NFA fragment
    fn compile_node(&mut self, node: &RegexNode) -> Fragment {
        match node {
            RegexNode::Literal(symbol) => self.compile_literal(*symbol),
            RegexNode::Concat(left, right) => self.compile_concat(left, right),
            RegexNode::Union(left, right) => self.compile_union(left, right),
            RegexNode::Star(inner) => self.compile_repetition(inner, true),
            RegexNode::Plus(inner) => self.compile_repetition(inner, false),
        }
    }

    /// Compile a single character
    fn compile_literal(&mut self, symbol: char) -> Fragment {
        let start = self.fresh();
        let end = self.fresh();

        Fragment {
            start,
            end,
            transitions: Transitions::from_triples([(start, Symbol::Char(symbol), end)]),
            alphabet: BTreeSet::from([symbol]),
        }
    }

    /// Chain the left fragment's end into the right fragment's start
    fn compile_concat(&mut self, left: &RegexNode, right: &RegexNode) -> Fragment {
        let mut left = self.compile_node(left);
        let right = self.compile_node(right);

        left.transitions.merge(right.transitions);
        left.alphabet.extend(right.alphabet);
        left.transitions.insert(left.end, Symbol::Epsilon, right.start);

        Fragment {
            start: left.start,
            end: right.end,
            transitions: left.transitions,
            alphabet: left.alphabet,
        }
    }

    /// Compile alternation with a fresh split state and a fresh join state
    fn compile_union(&mut self, left: &RegexNode, right: &RegexNode) -> Fragment {
        let mut left = self.compile_node(left);
        let right = self.compile_node(right);

        left.transitions.merge(right.transitions);
        left.alphabet.extend(right.alphabet);

        let start = self.fresh();
        let end = self.fresh();

        let transitions = &mut left.transitions;
        transitions.insert(start, Symbol::Epsilon, left.start);
        transitions.insert(start, Symbol::Epsilon, right.start);
        transitions.insert(right.end, Symbol::Epsilon, end);
        transitions.insert(left.end, Symbol::Epsilon, end);

        Fragment {
            start,
            end,
            transitions: left.transitions,
            alphabet: left.alphabet,
        }
    }

    /// Compile `*` (with `allow_empty`) or `+` (without)
    ///
    /// Both enter the inner fragment, leave it, and loop from its end back
    /// to its start. Only `*` may skip the inner fragment altogether.
    fn compile_repetition(&mut self, inner: &RegexNode, allow_empty: bool) -> Fragment {
        let mut inner = self.compile_node(inner);

        let start = self.fresh();
        let end = self.fresh();

        let transitions = &mut inner.transitions;
        transitions.insert(start, Symbol::Epsilon, inner.start);
        transitions.insert(inner.end, Symbol::Epsilon, end);

        if allow_empty {
            transitions.insert(start, Symbol::Epsilon, end);
        }

        transitions.insert(inner.end, Symbol::Epsilon, inner.start);

        Fragment {
            start,
            end,
            transitions: inner.transitions,
            alphabet: inner.alphabet,
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
