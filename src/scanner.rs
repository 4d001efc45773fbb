//! Maximal munch scanning over a list of DFAs
//!
//! Every token is found in a round. A round starts all automata at the
//! beginning of the remaining input and feeds them one character at a time,
//! each automaton remembering the last position at which it accepted. An
//! automaton drops out of the round when it enters a sink state or has no
//! transition for the current character. The round ends once every
//! automaton has dropped out or the last character of the input has been
//! fed, and the longest accepted lexeme becomes the next token. When two
//! automata accepted equally long lexemes, the one declared first wins.

use std::fmt;

use lexgen_automata::{Dfa, StateId};

/// A lexeme together with the label of the rule that matched it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub label: &'a str,
    pub lexeme: &'a str,
}

/// Renders `LABEL lexeme`, with newlines in the lexeme written as `\n`
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.lexeme.replace('\n', "\\n"))
    }
}

/// Reasons a scan stops before the end of the input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Every automaton dropped out before any of them accepted
    #[error("No viable alternative at character {character}, line {line}")]
    NoViableAlternative { character: usize, line: usize },
    /// The input ended while no automaton had accepted yet
    #[error("No viable alternative at character EOF, line {line}")]
    UnexpectedEof { line: usize },
    #[error("no automata to scan with")]
    NoRules,
}

/// Progress of one automaton within a round
#[derive(Debug, Clone, Copy)]
struct ScanConfig {
    state: StateId,
    /// Character index of the last accepting position
    last_accept: Option<usize>,
    dead: bool,
}

impl ScanConfig {
    fn new(dfa: &Dfa) -> Self {
        Self {
            state: dfa.start(),
            last_accept: None,
            dead: dfa.is_sink(dfa.start()),
        }
    }

    fn advance(&mut self, dfa: &Dfa, symbol: char, cursor: usize) {
        match dfa.step(self.state, symbol) {
            Some(next) if dfa.is_sink(next) => {
                self.state = next;
                self.dead = true;
            }
            Some(next) => {
                self.state = next;

                if dfa.is_final(next) {
                    self.last_accept = Some(cursor);
                }
            }
            None => self.dead = true,
        }
    }
}

fn start_round(dfas: &[Dfa]) -> Vec<ScanConfig> {
    dfas.iter().map(ScanConfig::new).collect()
}

/// The earliest automaton with the furthest accepting position
fn longest(configs: &[ScanConfig]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;

    for (index, config) in configs.iter().enumerate() {
        if let Some(end) = config.last_accept {
            if best.map_or(true, |(_, longest)| end > longest) {
                best = Some((index, end));
            }
        }
    }

    best
}

/// Number of newlines before byte `offset`
fn line_at(input: &str, offset: usize) -> usize {
    memchr::memchr_iter(b'\n', &input.as_bytes()[..offset]).count()
}

/// Split `input` into tokens
///
/// The order of `dfas` is the rule priority. Empty input always scans to no
/// tokens.
pub fn scan<'a>(dfas: &'a [Dfa], input: &'a str) -> Result<Vec<Token<'a>>, ScanError> {
    let chars = input.char_indices().collect::<Vec<_>>();

    if chars.is_empty() {
        return Ok(Vec::new());
    }

    if dfas.is_empty() {
        return Err(ScanError::NoRules);
    }

    let mut tokens = Vec::new();
    let mut configs = start_round(dfas);
    let mut start = 0;
    let mut cursor = 0;

    while cursor < chars.len() {
        let (offset, symbol) = chars[cursor];

        for (config, dfa) in configs.iter_mut().zip(dfas) {
            if !config.dead {
                config.advance(dfa, symbol, cursor);
            }
        }

        let all_dead = configs.iter().all(|config| config.dead);

        if !all_dead && cursor + 1 < chars.len() {
            cursor += 1;
            continue;
        }

        let (index, end) = match longest(&configs) {
            Some(best) => best,
            None => {
                let line = line_at(input, offset);

                let error = if all_dead {
                    ScanError::NoViableAlternative {
                        character: cursor,
                        line,
                    }
                } else {
                    ScanError::UnexpectedEof { line }
                };

                debug!("scan failed after {} tokens: {}", tokens.len(), error);

                return Err(error);
            }
        };

        let from = chars[start].0;
        let to = chars.get(end + 1).map_or(input.len(), |&(offset, _)| offset);

        let token = Token {
            label: dfas[index].label(),
            lexeme: &input[from..to],
        };

        trace!("token {:?} at character {}", token, start);

        tokens.push(token);

        start = end + 1;
        cursor = start;
        configs = start_round(dfas);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(rules: &[(&str, &str)]) -> Vec<Dfa> {
        rules
            .iter()
            .map(|(label, regex)| Dfa::from_regex(regex, *label).unwrap())
            .collect()
    }

    fn pairs<'a>(tokens: &[Token<'a>]) -> Vec<(&'a str, &'a str)> {
        tokens.iter().map(|token| (token.label, token.lexeme)).collect()
    }

    #[test]
    fn test_maximal_munch() {
        let dfas = rules(&[
            ("INT", "[0-9]+"),
            ("ID", "[a-z]([a-z]|[0-9])*"),
            ("WS", "' '+"),
        ]);

        let tokens = scan(&dfas, "x1 12").unwrap();

        assert_eq!(pairs(&tokens), vec![("ID", "x1"), ("WS", " "), ("INT", "12")]);
    }

    #[test]
    fn test_first_rule_wins_ties() {
        let dfas = rules(&[("A", "a+"), ("B", "aa")]);
        assert_eq!(pairs(&scan(&dfas, "aa").unwrap()), vec![("A", "aa")]);

        let dfas = rules(&[("B", "aa"), ("A", "a+")]);
        assert_eq!(pairs(&scan(&dfas, "aa").unwrap()), vec![("B", "aa")]);
    }

    #[test]
    fn test_backtracks_to_last_accept() {
        let dfas = rules(&[("AB", "ab"), ("A", "a"), ("ABC", "abc")]);

        let tokens = scan(&dfas, "aba").unwrap();

        assert_eq!(pairs(&tokens), vec![("AB", "ab"), ("A", "a")]);
    }

    #[test]
    fn test_no_viable_alternative() {
        let dfas = rules(&[("A", "a+")]);

        assert_eq!(
            scan(&dfas, "b"),
            Err(ScanError::NoViableAlternative {
                character: 0,
                line: 0
            })
        );

        let dfas = rules(&[("A", "a+"), ("NL", "'\\n'")]);

        let error = scan(&dfas, "a\naa\nb").unwrap_err();
        assert_eq!(
            error,
            ScanError::NoViableAlternative {
                character: 5,
                line: 2
            }
        );
        assert_eq!(error.to_string(), "No viable alternative at character 5, line 2");
    }

    #[test]
    fn test_unexpected_eof() {
        let dfas = rules(&[("AB", "ab")]);

        let error = scan(&dfas, "aba").unwrap_err();

        assert_eq!(error, ScanError::UnexpectedEof { line: 0 });
        assert_eq!(error.to_string(), "No viable alternative at character EOF, line 0");
    }

    #[test]
    fn test_empty() {
        assert_eq!(scan(&[], ""), Ok(Vec::new()));
        assert_eq!(scan(&rules(&[("A", "a")]), ""), Ok(Vec::new()));
        assert_eq!(scan(&[], "a"), Err(ScanError::NoRules));
    }

    #[test]
    fn test_multibyte_lexemes() {
        let dfas = rules(&[("GREEK", "(α|β)+"), ("WS", "' '")]);

        let tokens = scan(&dfas, "αβ β").unwrap();

        assert_eq!(pairs(&tokens), vec![("GREEK", "αβ"), ("WS", " "), ("GREEK", "β")]);
    }

    #[test]
    fn test_dead_start() {
        let transitions = lexgen_automata::Transitions::from_triples([(0, 'a', 0)]);
        let never = Dfa::new(vec!['a'], "NEVER", 0, Default::default(), transitions);

        assert!(never.is_sink(never.start()));
        assert_eq!(
            scan(&[never], "a"),
            Err(ScanError::NoViableAlternative {
                character: 0,
                line: 0
            })
        );
    }

    #[test]
    fn test_token_display() {
        let token = Token {
            label: "NL",
            lexeme: "\n",
        };

        assert_eq!(token.to_string(), "NL \\n");
    }
}
