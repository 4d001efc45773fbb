use lexgen_automata::{Dfa, SyntaxError};

/// Errors produced while compiling token rules
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule `{rule}` has no label")]
    MissingLabel { rule: String },
    #[error("invalid regex for rule {label}: {source}")]
    Syntax {
        label: String,
        #[source]
        source: SyntaxError,
    },
}

/// An ordered list of compiled token rules
///
/// Earlier rules take priority when two rules match lexemes of the same
/// length.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    dfas: Vec<Dfa>,
}

impl RuleSet {
    /// Compile a rule file
    ///
    /// Rules have the form `LABEL regex` and are terminated by `;` followed
    /// by a newline. Text after the last terminator is ignored.
    ///
    /// ```
    /// use lexgen::RuleSet;
    ///
    /// let rules = RuleSet::parse("INT [0-9]+;\nWS ' '+;\n").unwrap();
    ///
    /// assert_eq!(rules.len(), 2);
    /// assert_eq!(rules.dfas()[1].label(), "WS");
    /// ```
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let mut statements = text.split(";\n").collect::<Vec<_>>();
        statements.pop();

        let rules = statements
            .into_iter()
            .map(|statement| {
                let statement = statement.trim_start();

                statement
                    .split_once(' ')
                    .ok_or_else(|| RuleError::MissingLabel {
                        rule: statement.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rules(rules)
    }

    /// Compile `(label, regex)` pairs, keeping their order
    pub fn from_rules<'a>(
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, RuleError> {
        let dfas = rules
            .into_iter()
            .map(|(label, regex)| {
                let dfa = Dfa::from_regex(regex, label).map_err(|source| RuleError::Syntax {
                    label: label.to_string(),
                    source,
                })?;

                debug!(
                    "compiled rule {} into {} states",
                    label,
                    dfa.state_count()
                );

                Ok(dfa)
            })
            .collect::<Result<Vec<_>, RuleError>>()?;

        Ok(Self { dfas })
    }

    pub fn dfas(&self) -> &[Dfa] {
        &self.dfas
    }

    pub fn len(&self) -> usize {
        self.dfas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dfas.is_empty()
    }
}

impl From<Vec<Dfa>> for RuleSet {
    fn from(dfas: Vec<Dfa>) -> Self {
        Self { dfas }
    }
}
