/*!
A lexer generator built on deterministic finite automata.

Token rules are written as `LABEL regex` statements. Every regex is
compiled to a DFA by [`lexgen_automata`], and the resulting list of DFAs
splits input text into [`Token`]s: the longest lexeme any rule accepts
wins, and among equally long lexemes the rule declared first wins.

# Example

```
use lexgen::Lexer;

let lexer = Lexer::from_rules("INT [0-9]+;\nID [a-z]([a-z]|[0-9])*;\nWS ' '+;\n").unwrap();

let tokens = lexer.tokenize("x1 12").unwrap();
let tokens = tokens
    .iter()
    .map(|token| (token.label, token.lexeme))
    .collect::<Vec<_>>();

assert_eq!(tokens, vec![("ID", "x1"), ("WS", " "), ("INT", "12")]);
```

# Regex syntax

The regex language is small on purpose: `|`, `*`, `+`, grouping,
concatenation by juxtaposition, quoted literals such as `' '` or `'\n'`,
and the `[a-z]` and `[0-9]` shorthands. See [`lexgen_automata::syntax`].

# Crate features

* **logging** (enabled by default) - Emits messages through the `log`
crate about rule compilation, committed tokens and scan failures.
*/

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[macro_use]
mod macros;

mod rules;
mod scanner;

use std::str::FromStr;

pub use lexgen_automata::{self as automata, CodificationError, Dfa, SyntaxError};

pub use crate::{
    rules::{RuleError, RuleSet},
    scanner::{scan, ScanError, Token},
};

/// A compiled set of token rules, ready to scan text
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    rules: RuleSet,
}

impl Lexer {
    /// Compile a rule file, see [`RuleSet::parse`]
    pub fn from_rules(text: &str) -> Result<Self, RuleError> {
        Ok(Self {
            rules: RuleSet::parse(text)?,
        })
    }

    /// Load automata from their codification, see
    /// [`parse_list`](lexgen_automata::parse_list)
    pub fn from_codification(text: &str) -> Result<Self, CodificationError> {
        let dfas = lexgen_automata::parse_list(text)?;

        Ok(Self {
            rules: RuleSet::from(dfas),
        })
    }

    /// The compiled rules in priority order
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Split `input` into tokens
    pub fn tokenize<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>, ScanError> {
        scan(self.rules.dfas(), input)
    }

    /// Codification of every automaton, separated by blank lines
    pub fn codification(&self) -> String {
        self.rules
            .dfas()
            .iter()
            .map(Dfa::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl FromStr for Lexer {
    type Err = RuleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_rules(text)
    }
}
