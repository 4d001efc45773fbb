//! Regex text to syntax tree
//!
//! The accepted language is deliberately small:
//!
//! - `(` and `)` group
//! - `|` is union, `*` and `+` are postfix repetitions, juxtaposition is
//!   concatenation
//! - `'x'` quotes any single character, `'\n'` and `'\t'` stand for a
//!   newline and a tab
//! - `[a-z]` and `[0-9]` expand into the union of their characters
//! - every other character outside whitespace matches itself
//!
//! Parsing runs in three passes: [`tokenize`] produces operator and
//! literal tokens with explicit concatenations, [`to_prefix`] reorders them
//! by precedence, and the prefix sequence is folded into a [`RegexNode`]
//! by the [`reduce`](crate::reduce) module.

use std::fmt;

use crate::reduce::{self, Arity, ReduceError, SlotOrder};

const LOWERCASE: [char; 5] = ['[', 'a', '-', 'z', ']'];
const DIGITS: [char; 5] = ['[', '0', '-', '9', ']'];

/// Errors produced while turning regex text into a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unterminated quoted literal at character {position}")]
    UnterminatedLiteral { position: usize },
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("unknown token `{token}`")]
    UnknownToken { token: String },
    #[error("malformed expression: {0}")]
    Malformed(#[from] ReduceError),
}

/// A lexical unit of regex text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Open,
    Close,
    Union,
    Concat,
    Plus,
    Star,
    Literal(char),
}

impl Token {
    fn precedence(self) -> u8 {
        match self {
            Token::Union => 1,
            Token::Concat => 2,
            Token::Plus | Token::Star => 3,
            Token::Open | Token::Close | Token::Literal(_) => 0,
        }
    }

    /// Whether a concatenation may follow this token
    fn closes_operand(self) -> bool {
        matches!(
            self,
            Token::Literal(_) | Token::Close | Token::Plus | Token::Star
        )
    }

    /// Whether a concatenation may precede this token
    fn opens_operand(self) -> bool {
        matches!(self, Token::Literal(_) | Token::Open)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
            Token::Union => f.write_str("UNION"),
            Token::Concat => f.write_str("CONCAT"),
            Token::Plus => f.write_str("PLUS"),
            Token::Star => f.write_str("STAR"),
            Token::Literal('\n') => f.write_str("'\\n'"),
            Token::Literal('\t') => f.write_str("'\\t'"),
            Token::Literal(c) if c.is_whitespace() || "()|*+'".contains(*c) => {
                write!(f, "'{}'", c)
            }
            Token::Literal(c) => write!(f, "{}", c),
        }
    }
}

/// Regex syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegexNode {
    Literal(char),
    Star(Box<RegexNode>),
    Plus(Box<RegexNode>),
    Concat(Box<RegexNode>, Box<RegexNode>),
    Union(Box<RegexNode>, Box<RegexNode>),
}

impl RegexNode {
    /// Parses infix regex text
    pub fn parse(regex: &str) -> Result<Self, SyntaxError> {
        let prefix = to_prefix(&tokenize(regex)?)?;

        let productions = prefix
            .into_iter()
            .map(Production::from_token)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reduce::reduce(productions, SlotOrder::RightToLeft, assemble)?)
    }

    /// Parses whitespace separated prefix words such as `UNION a STAR b`
    pub fn parse_prefix(text: &str) -> Result<Self, SyntaxError> {
        let productions = text
            .split_whitespace()
            .map(Production::from_word)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reduce::reduce(productions, SlotOrder::LeftToRight, assemble)?)
    }
}

impl fmt::Display for RegexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexNode::Literal(symbol) => write!(f, "{}", symbol),
            RegexNode::Star(inner) => write!(f, "Star({})", inner),
            RegexNode::Plus(inner) => write!(f, "Plus({})", inner),
            RegexNode::Concat(left, right) => write!(f, "Concat({},{})", left, right),
            RegexNode::Union(left, right) => write!(f, "Union({},{})", left, right),
        }
    }
}

/// Tree node kinds as seen by the reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Production {
    Literal(char),
    Star,
    Plus,
    Concat,
    Union,
}

impl Production {
    fn from_token(token: Token) -> Result<Self, SyntaxError> {
        match token {
            Token::Literal(symbol) => Ok(Production::Literal(symbol)),
            Token::Star => Ok(Production::Star),
            Token::Plus => Ok(Production::Plus),
            Token::Concat => Ok(Production::Concat),
            Token::Union => Ok(Production::Union),
            Token::Open | Token::Close => Err(SyntaxError::UnknownToken {
                token: token.to_string(),
            }),
        }
    }

    fn from_word(word: &str) -> Result<Self, SyntaxError> {
        match word {
            "CONCAT" => return Ok(Production::Concat),
            "UNION" => return Ok(Production::Union),
            "STAR" => return Ok(Production::Star),
            "PLUS" => return Ok(Production::Plus),
            _ => {}
        }

        let chars = word.chars().collect::<Vec<_>>();

        let symbol = match chars.as_slice() {
            [symbol] => Some(*symbol),
            ['\'', symbol, '\''] => Some(*symbol),
            ['\'', '\\', escaped, '\''] => Some(unescape(*escaped)),
            _ => None,
        };

        symbol
            .map(Production::Literal)
            .ok_or_else(|| SyntaxError::UnknownToken {
                token: word.to_string(),
            })
    }
}

impl Arity for Production {
    fn arity(&self) -> usize {
        match self {
            Production::Literal(_) => 0,
            Production::Star | Production::Plus => 1,
            Production::Concat | Production::Union => 2,
        }
    }
}

fn assemble(production: Production, children: Vec<RegexNode>) -> Option<RegexNode> {
    let mut children = children.into_iter().map(Box::new);

    let node = match production {
        Production::Literal(symbol) => RegexNode::Literal(symbol),
        Production::Star => RegexNode::Star(children.next()?),
        Production::Plus => RegexNode::Plus(children.next()?),
        Production::Concat => RegexNode::Concat(children.next()?, children.next()?),
        Production::Union => RegexNode::Union(children.next()?, children.next()?),
    };

    Some(node)
}

fn unescape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        't' => '\t',
        other => other,
    }
}

/// Splits regex text into tokens and inserts the implicit concatenations
pub fn tokenize(regex: &str) -> Result<Vec<Token>, SyntaxError> {
    let chars = regex.chars().collect::<Vec<_>>();
    let mut raw = Vec::with_capacity(chars.len());
    let mut position = 0;

    while position < chars.len() {
        let rest = &chars[position..];

        if rest.starts_with(&LOWERCASE) {
            expand_range(&mut raw, 'a'..='z');
            position += LOWERCASE.len();
            continue;
        }

        if rest.starts_with(&DIGITS) {
            expand_range(&mut raw, '0'..='9');
            position += DIGITS.len();
            continue;
        }

        let (token, width) = match rest {
            ['\'', '\\', escaped, '\'', ..] => (Token::Literal(unescape(*escaped)), 4),
            ['\'', symbol, '\'', ..] => (Token::Literal(*symbol), 3),
            ['\'', ..] => return Err(SyntaxError::UnterminatedLiteral { position }),
            ['(', ..] => (Token::Open, 1),
            [')', ..] => (Token::Close, 1),
            ['|', ..] => (Token::Union, 1),
            ['+', ..] => (Token::Plus, 1),
            ['*', ..] => (Token::Star, 1),
            [space, ..] if space.is_whitespace() => {
                position += 1;
                continue;
            }
            [symbol, ..] => (Token::Literal(*symbol), 1),
            [] => break,
        };

        raw.push(token);
        position += width;
    }

    let mut tokens = Vec::with_capacity(raw.len() * 2);

    for token in raw {
        if let Some(previous) = tokens.last().copied() {
            if Token::closes_operand(previous) && token.opens_operand() {
                tokens.push(Token::Concat);
            }
        }

        tokens.push(token);
    }

    Ok(tokens)
}

fn expand_range(tokens: &mut Vec<Token>, range: std::ops::RangeInclusive<char>) {
    tokens.push(Token::Open);

    for (index, symbol) in range.enumerate() {
        if index > 0 {
            tokens.push(Token::Union);
        }

        tokens.push(Token::Literal(symbol));
    }

    tokens.push(Token::Close);
}

/// Reorders infix tokens into prefix order
///
/// This is the usual operator precedence conversion to postfix, reversed at
/// the end. Operands of a binary operator therefore appear right first.
pub fn to_prefix(tokens: &[Token]) -> Result<Vec<Token>, SyntaxError> {
    let mut operators = Vec::new();
    let mut output = Vec::with_capacity(tokens.len());

    for &token in tokens {
        match token {
            Token::Literal(_) => output.push(token),

            Token::Open => operators.push(token),

            Token::Close => loop {
                match operators.pop() {
                    Some(Token::Open) => break,
                    Some(operator) => output.push(operator),
                    None => return Err(SyntaxError::UnbalancedParenthesis),
                }
            },

            operator => {
                while let Some(&top) = operators.last() {
                    if top.precedence() < operator.precedence() {
                        break;
                    }

                    output.push(top);
                    operators.pop();
                }

                operators.push(operator);
            }
        }
    }

    while let Some(operator) = operators.pop() {
        if operator == Token::Open {
            return Err(SyntaxError::UnbalancedParenthesis);
        }

        output.push(operator);
    }

    output.reverse();

    Ok(output)
}
