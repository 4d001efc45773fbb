use lexgen::{Lexer, RuleSet, ScanError, Token};
use once_cell::sync::Lazy;

/// Tokens of a small imperative language
///
/// Keywords come before `VAR` so that they win ties against it.
const IMP: &str = "\
BEGIN begin;
END end;
IF if;
THEN then;
ELSE else;
WHILE while;
DO do;
OPEN '(';
CLOSE ')';
PLUS '+';
GREATER '>';
ASSIGN =;
SEMICOLON ';';
NUMBER [0-9]+;
VAR [a-z]+;
SPACE (' '|'\\t')+;
NEWLINE '\\n';
";

static LEXER: Lazy<Lexer> = Lazy::new(|| match Lexer::from_rules(IMP) {
    Ok(lexer) => lexer,
    Err(error) => panic!("rule file does not compile: {}", error),
});

fn pairs<'a>(tokens: &[Token<'a>]) -> Vec<(&'a str, &'a str)> {
    tokens.iter().map(|token| (token.label, token.lexeme)).collect()
}

fn significant<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|token| token.label != "SPACE" && token.label != "NEWLINE")
        .map(|token| token.label)
        .collect()
}

#[test]
fn maximal_munch() -> anyhow::Result<()> {
    super::init_logging();

    let lexer = Lexer::from_rules("INT [0-9]+;\nID [a-z]([a-z]|[0-9])*;\nWS ' '+;\n")?;
    let tokens = lexer.tokenize("x1 12")?;

    assert_eq!(pairs(&tokens), vec![("ID", "x1"), ("WS", " "), ("INT", "12")]);

    Ok(())
}

#[test]
fn earlier_rule_wins_tie() -> anyhow::Result<()> {
    let lexer = Lexer::from_rules("A 'a'+;\nB 'a''a';\n")?;

    assert_eq!(pairs(&lexer.tokenize("aa")?), vec![("A", "aa")]);
    assert_eq!(pairs(&lexer.tokenize("aaa")?), vec![("A", "aaa")]);

    Ok(())
}

#[test]
fn failure_position() -> anyhow::Result<()> {
    let lexer = Lexer::from_rules("A 'a'+;\n")?;

    assert_eq!(
        lexer.tokenize("b"),
        Err(ScanError::NoViableAlternative {
            character: 0,
            line: 0
        })
    );

    Ok(())
}

#[test]
fn program() -> anyhow::Result<()> {
    super::init_logging();

    let program = "begin\n\tif (x > 10) then\n\t\tx = x + 1;\n\telse y = 0;\nend";
    let tokens = LEXER.tokenize(program)?;

    assert_eq!(
        significant(&tokens),
        vec![
            "BEGIN", "IF", "OPEN", "VAR", "GREATER", "NUMBER", "CLOSE", "THEN", "VAR", "ASSIGN",
            "VAR", "PLUS", "NUMBER", "SEMICOLON", "ELSE", "VAR", "ASSIGN", "NUMBER", "SEMICOLON",
            "END",
        ]
    );

    let text = tokens.iter().map(|token| token.lexeme).collect::<String>();
    assert_eq!(text, program);

    Ok(())
}

#[test]
fn keywords_only_win_exact_ties() -> anyhow::Result<()> {
    let tokens = LEXER.tokenize("if iffy do done")?;

    assert_eq!(significant(&tokens), vec!["IF", "VAR", "DO", "VAR"]);
    assert_eq!(tokens[2].lexeme, "iffy");

    Ok(())
}

#[test]
fn failure_lines() {
    let error = LEXER.tokenize("x = 1;\ny = 2;\nz = #;").unwrap_err();

    assert_eq!(
        error,
        ScanError::NoViableAlternative {
            character: 18,
            line: 2
        }
    );
}

#[test]
fn lexer_is_shareable() -> anyhow::Result<()> {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    assert_send_sync(&*LEXER);

    let handles = (0..4)
        .map(|n| std::thread::spawn(move || LEXER.tokenize(&"x ".repeat(n + 1)).map(|t| t.len())))
        .collect::<Vec<_>>();

    for (n, handle) in handles.into_iter().enumerate() {
        let count = handle.join().map_err(|_| anyhow::anyhow!("scan panicked"))??;
        assert_eq!(count, 2 * (n + 1));
    }

    Ok(())
}

#[test]
fn codification_round_trip() -> anyhow::Result<()> {
    let reloaded = Lexer::from_codification(&LEXER.codification())?;

    assert_eq!(reloaded.rules().len(), LEXER.rules().len());
    assert_eq!(reloaded.codification(), LEXER.codification());

    let program = "while (n > 0) do n = n + 1;";
    assert_eq!(
        pairs(&reloaded.tokenize(program)?),
        pairs(&LEXER.tokenize(program)?)
    );

    Ok(())
}

#[test]
fn rule_set_from_pairs() -> anyhow::Result<()> {
    let rules = RuleSet::from_rules([("X", "x"), ("Y", "y+")])?;

    let tokens = lexgen::scan(rules.dfas(), "xyyx")?;

    assert_eq!(pairs(&tokens), vec![("X", "x"), ("Y", "yy"), ("X", "x")]);

    Ok(())
}
