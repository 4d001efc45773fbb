//! Line oriented text form of automata
//!
//! ```text
//! ab          alphabet, every symbol concatenated
//! WORD        token label
//! 0           start state
//! 0,'a',1     one transition per line
//! 0,'b',2
//! ...
//! 1 3         final states, space separated
//! ```
//!
//! Newlines, carriage returns, tabs and backslashes are written as `\n`,
//! `\r`, `\t` and `\\` both in the alphabet line and in transition
//! symbols. Several automata are separated by a blank line, see
//! [`parse_list`].
//!
//! NFAs share the format. They use the label `NFA` and the symbol `eps`
//! for epsilon edges, and their last line is the single accepting state.
//! Only DFAs can be read back.

use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{
    dfa::Dfa,
    nfa::{Nfa, StateId, Symbol},
    transitions::Transitions,
};

/// Errors produced while reading a codified DFA
///
/// Line numbers are 1-based and count from the start of the whole text, so
/// they stay meaningful for automata read by [`parse_list`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodificationError {
    #[error("line {line}: expected the {expected} line")]
    MissingLine { line: usize, expected: &'static str },
    #[error("line {line}: invalid state `{text}`")]
    InvalidState { line: usize, text: String },
    #[error("line {line}: invalid transition `{text}`")]
    InvalidTransition { line: usize, text: String },
    #[error("line {line}: invalid symbol `{text}`")]
    InvalidSymbol { line: usize, text: String },
}

/// A symbol as written in the codification
struct Escaped(char);

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            '\n' => f.write_str("\\n"),
            '\t' => f.write_str("\\t"),
            '\r' => f.write_str("\\r"),
            '\\' => f.write_str("\\\\"),
            symbol => write!(f, "{}", symbol),
        }
    }
}

fn unescape(escaped: char) -> Option<char> {
    match escaped {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        _ => None,
    }
}

fn write_alphabet(
    f: &mut fmt::Formatter<'_>,
    alphabet: impl Iterator<Item = char>,
) -> fmt::Result {
    for symbol in alphabet {
        write!(f, "{}", Escaped(symbol))?;
    }

    writeln!(f)
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_alphabet(f, self.alphabet().iter().copied())?;
        writeln!(f, "{}", self.label())?;
        writeln!(f, "{}", self.start())?;

        for (from, symbol, to) in self.transitions().iter() {
            writeln!(f, "{},'{}',{}", from, Escaped(*symbol), to)?;
        }

        let finals = self
            .finals()
            .iter()
            .map(StateId::to_string)
            .collect::<Vec<_>>();

        f.write_str(&finals.join(" "))
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_alphabet(f, self.alphabet().iter().copied())?;
        writeln!(f, "NFA")?;
        writeln!(f, "{}", self.start())?;

        for (from, symbol, to) in self.transitions().iter() {
            match symbol {
                Symbol::Epsilon => writeln!(f, "{},'eps',{}", from, to)?,
                Symbol::Char(symbol) => writeln!(f, "{},'{}',{}", from, Escaped(*symbol), to)?,
            }
        }

        write!(f, "{}", self.accept())
    }
}

impl FromStr for Dfa {
    type Err = CodificationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines = text.trim_end_matches('\n').lines().collect::<Vec<_>>();

        parse_block(&lines, 1)
    }
}

/// Read every automaton of a blank line separated codification
pub fn parse_list(text: &str) -> Result<Vec<Dfa>, CodificationError> {
    let mut dfas = Vec::new();
    let mut block = Vec::new();
    let mut first_line = 1;

    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            if !block.is_empty() {
                dfas.push(parse_block(&block, first_line)?);
                block.clear();
            }

            first_line = index + 2;
            continue;
        }

        block.push(line);
    }

    if !block.is_empty() {
        dfas.push(parse_block(&block, first_line)?);
    }

    debug!("read {} codified automata", dfas.len());

    Ok(dfas)
}

/// Parse the lines of a single automaton, `first_line` being the number of
/// `lines[0]` in the whole text
fn parse_block(lines: &[&str], first_line: usize) -> Result<Dfa, CodificationError> {
    let missing = |offset: usize, expected| CodificationError::MissingLine {
        line: first_line + offset,
        expected,
    };

    let alphabet = lines.first().ok_or_else(|| missing(0, "alphabet"))?;
    let label = lines.get(1).ok_or_else(|| missing(1, "label"))?;
    let start = lines.get(2).ok_or_else(|| missing(2, "start state"))?;

    if lines.len() < 4 {
        return Err(missing(3, "final states"));
    }

    let alphabet = parse_alphabet(first_line, alphabet)?;
    let start = parse_state(first_line + 2, start)?;

    let last = lines.len() - 1;
    let mut transitions = Transitions::new();

    for (offset, line) in lines.iter().enumerate().take(last).skip(3) {
        let (from, symbol, to) = parse_transition(first_line + offset, line)?;

        transitions.insert(from, symbol, to);
    }

    let finals = lines[last]
        .split_whitespace()
        .map(|state| parse_state(first_line + last, state))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Dfa::new(alphabet, *label, start, finals, transitions))
}

fn parse_alphabet(line: usize, text: &str) -> Result<Vec<char>, CodificationError> {
    let mut alphabet = Vec::new();
    let mut chars = text.chars();

    while let Some(symbol) = chars.next() {
        if symbol != '\\' {
            alphabet.push(symbol);
            continue;
        }

        let escaped = chars.next().and_then(unescape);

        alphabet.push(escaped.ok_or_else(|| CodificationError::InvalidSymbol {
            line,
            text: text.to_string(),
        })?);
    }

    Ok(alphabet)
}

fn parse_state(line: usize, text: &str) -> Result<StateId, CodificationError> {
    text.trim()
        .parse()
        .map_err(|_| CodificationError::InvalidState {
            line,
            text: text.to_string(),
        })
}

/// Parse `from,'symbol',to`
///
/// The symbol itself may be a comma or a quote, so the line is cut at the
/// first `,'` and the last `',`.
fn parse_transition(
    line: usize,
    text: &str,
) -> Result<(StateId, char, StateId), CodificationError> {
    let invalid = || CodificationError::InvalidTransition {
        line,
        text: text.to_string(),
    };

    let (from, rest) = text.split_once(",'").ok_or_else(invalid)?;
    let (symbol, to) = rest.rsplit_once("',").ok_or_else(invalid)?;

    let chars = symbol.chars().collect::<Vec<_>>();

    let symbol = match chars.as_slice() {
        ['\\', escaped] => unescape(*escaped),
        [symbol] => Some(*symbol),
        _ => None,
    }
    .ok_or_else(|| CodificationError::InvalidSymbol {
        line,
        text: symbol.to_string(),
    })?;

    Ok((parse_state(line, from)?, symbol, parse_state(line, to)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use crate::syntax::RegexNode;

    const TWO: &str = "\
ab
A
0
0,'a',1
0,'b',2
1,'a',1
1,'b',2
2,'a',2
2,'b',2
1

b
B
0
0,'b',1
1,'b',1
0 1";

    #[test]
    fn test_display_dfa() {
        let dfa = Dfa::from_regex("a", "A").unwrap();

        assert_eq!(dfa.to_string(), "a\nA\n0\n0,'a',1\n1,'a',2\n2,'a',2\n1");
    }

    #[test]
    fn test_display_nfa() {
        let nfa = Compiler::new().compile(&RegexNode::parse("a*").unwrap());

        assert_eq!(
            nfa.to_string(),
            "a\nNFA\n2\n0,'a',1\n2,'eps',0\n1,'eps',3\n2,'eps',3\n1,'eps',0\n3"
        );
    }

    #[test]
    fn test_escapes() {
        let dfa = Dfa::from_regex("'\\n'|'\\t'|x", "WS").unwrap();
        let text = dfa.to_string();

        assert!(text.starts_with("\\t\\nx\nWS\n"));
        assert!(text.contains(",'\\n',"));

        let parsed = text.parse::<Dfa>().unwrap();
        assert_eq!(parsed.alphabet(), &['\t', '\n', 'x']);
        assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn test_carriage_return_ends_alphabet() {
        let dfa = Dfa::from_regex("'\r'", "CR").unwrap();
        let text = dfa.to_string();

        assert!(text.starts_with("\\r\nCR\n"));

        let parsed = text.parse::<Dfa>().unwrap();
        assert_eq!(parsed.alphabet(), &['\r']);
        assert_eq!(parsed.step(0, '\r'), Some(1));
        assert_eq!(parsed.to_string(), text);

        let list = parse_list(&format!("{}\n\n{}", text, text)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].alphabet(), &['\r']);
    }

    #[test]
    fn test_roundtrip() {
        let dfa = Dfa::from_regex("(a|b)*c", "WORD").unwrap();
        let parsed = dfa.to_string().parse::<Dfa>().unwrap();

        assert_eq!(parsed.to_string(), dfa.to_string());
        assert_eq!(parsed.sinks(), dfa.sinks());
        assert_eq!(parsed.finals(), dfa.finals());
    }

    #[test]
    fn test_awkward_symbols() {
        let dfa = "',\n,\n0\n0,''',1\n0,',',1\n1".parse::<Dfa>().unwrap();

        assert_eq!(dfa.label(), ",");
        assert_eq!(dfa.step(0, '\''), Some(1));
        assert_eq!(dfa.step(0, ','), Some(1));
    }

    #[test]
    fn test_parse_list() {
        let dfas = parse_list(TWO).unwrap();

        assert_eq!(dfas.len(), 2);
        assert_eq!(dfas[0].label(), "A");
        assert_eq!(dfas[0].sinks(), &BTreeSet::from([2]));
        assert_eq!(dfas[1].label(), "B");
        assert!(dfas[1].sinks().is_empty());
        assert_eq!(dfas[1].finals(), &BTreeSet::from([0, 1]));

        assert!(parse_list("").unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            "ab\nA\n0".parse::<Dfa>().unwrap_err(),
            CodificationError::MissingLine {
                line: 4,
                expected: "final states"
            }
        );
        assert_eq!(
            "ab\nA\nx\n0".parse::<Dfa>().unwrap_err(),
            CodificationError::InvalidState {
                line: 3,
                text: "x".to_string()
            }
        );
        assert_eq!(
            "ab\nA\n0\n0 a 1\n1".parse::<Dfa>().unwrap_err(),
            CodificationError::InvalidTransition {
                line: 4,
                text: "0 a 1".to_string()
            }
        );
        assert_eq!(
            "ab\nA\n0\n0,'ab',1\n1".parse::<Dfa>().unwrap_err(),
            CodificationError::InvalidSymbol {
                line: 4,
                text: "ab".to_string()
            }
        );
    }

    #[test]
    fn test_error_lines_in_list() {
        let text = TWO.replace("0,'b',1", "0,'b',z");

        assert_eq!(
            parse_list(&text).unwrap_err(),
            CodificationError::InvalidState {
                line: 15,
                text: "z".to_string()
            }
        );
    }
}
