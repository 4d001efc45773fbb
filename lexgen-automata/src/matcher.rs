use crate::{dfa::Dfa, nfa::StateId};

/// Runs a single DFA over input text
pub struct Matcher<'a> {
    dfa: &'a Dfa,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given DFA
    pub fn new(dfa: &'a Dfa) -> Self {
        Self { dfa }
    }

    /// Feed every symbol to the automaton
    ///
    /// Returns the state reached, or `None` once a symbol has no transition.
    /// Entering a sink state does not stop the run, sinks absorb every
    /// symbol of the alphabet.
    pub fn run(&self, input: impl IntoIterator<Item = char>) -> Option<StateId> {
        input
            .into_iter()
            .try_fold(self.dfa.start(), |state, symbol| self.dfa.step(state, symbol))
    }

    /// Check if the entire input is a lexeme of the automaton
    pub fn is_match(&self, input: &str) -> bool {
        match self.run(input.chars()) {
            Some(state) => !self.dfa.is_sink(state) && self.dfa.is_final(state),
            None => false,
        }
    }

    /// Length in characters of the longest accepted prefix
    ///
    /// The walk stops at the first sink state or missing transition.
    pub fn longest_prefix(&self, input: &str) -> Option<usize> {
        let mut state = self.dfa.start();
        let mut longest = self.dfa.is_final(state).then_some(0);

        for (index, symbol) in input.chars().enumerate() {
            state = match self.dfa.step(state, symbol) {
                Some(next) if !self.dfa.is_sink(next) => next,
                _ => break,
            };

            if self.dfa.is_final(state) {
                longest = Some(index + 1);
            }
        }

        longest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_match() {
        let dfa = Dfa::from_regex("[a-z]([a-z]|[0-9])*", "ID").unwrap();
        let matcher = Matcher::new(&dfa);

        assert!(matcher.is_match("x1"));
        assert!(matcher.is_match("abc123"));
        assert!(!matcher.is_match("1x"));
        assert!(!matcher.is_match(""));
        assert!(!matcher.is_match("x-1"));
    }

    #[test]
    fn test_run_into_sink() {
        let dfa = Dfa::from_regex("ab", "AB").unwrap();
        let matcher = Matcher::new(&dfa);

        let state = matcher.run("abab".chars()).unwrap();
        assert!(dfa.is_sink(state));
        assert_eq!(matcher.run("abc".chars()), None);
    }

    #[test]
    fn test_longest_prefix() {
        let dfa = Dfa::from_regex("a+", "A").unwrap();
        let matcher = Matcher::new(&dfa);

        assert_eq!(matcher.longest_prefix("aaab"), Some(3));
        assert_eq!(matcher.longest_prefix("b"), None);

        let star = Dfa::from_regex("(ab)*", "AB").unwrap();
        let matcher = Matcher::new(&star);

        assert_eq!(matcher.longest_prefix("ababa"), Some(4));
        assert_eq!(matcher.longest_prefix("x"), Some(0));
    }
}
