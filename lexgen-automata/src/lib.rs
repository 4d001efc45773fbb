//! Regular expression to DFA compiler
//!
//! This library compiles a small infix regular expression language (union,
//! concatenation, star and plus over single characters) into a complete
//! deterministic finite automaton:
//!
//! - [`syntax`] turns regex text into a [`RegexNode`] tree
//! - [`compiler`] builds a Thompson [`Nfa`] out of the tree
//! - [`dfa`] runs the subset construction and produces a canonical [`Dfa`]
//!   with a designated sink state
//! - [`codification`] reads and writes the line oriented text form of both
//!   automata
//!
//! ```
//! use lexgen_automata::{Dfa, Matcher};
//!
//! let dfa = Dfa::from_regex("(a|b)*c", "WORD").unwrap();
//! let matcher = Matcher::new(&dfa);
//!
//! assert!(matcher.is_match("abbac"));
//! assert!(!matcher.is_match("abba"));
//! ```

#[macro_use]
mod macros;

pub mod codification;
pub mod compiler;
pub mod dfa;
pub mod matcher;
pub mod nfa;
pub mod reduce;
pub mod syntax;
pub mod transitions;

pub use codification::{parse_list, CodificationError};
pub use compiler::Compiler;
pub use dfa::{Dfa, StateSet};
pub use matcher::Matcher;
pub use nfa::{Fragment, Nfa, StateId, Symbol};
pub use reduce::{Arity, ReduceError, SlotOrder};
pub use syntax::{RegexNode, SyntaxError, Token};
pub use transitions::Transitions;

/// The result of turning regex text into an automaton
pub type CompileResult<T> = Result<T, SyntaxError>;
