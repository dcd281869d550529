use std::fmt;

/// A defect found while parsing a DIMACS CNF document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaDefect {
    /// The `p cnf <n> <m>` header is missing, or its two numbers don't parse.
    MissingOrInvalidHeader,
    /// A literal's variable id is `0` or exceeds the header's variable count.
    LiteralOutOfRange { literal: i64, num_variables: usize },
    /// End of input reached while a clause was still open (no terminating `0`).
    UnterminatedClause,
    /// The header promised `expected` clauses, the body contained `found`.
    ClauseCountMismatch { expected: usize, found: usize },
}

impl fmt::Display for FormulaDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaDefect::MissingOrInvalidHeader => {
                write!(f, "missing or invalid 'p cnf <n> <m>' header")
            }
            FormulaDefect::LiteralOutOfRange {
                literal,
                num_variables,
            } => write!(
                f,
                "literal {} refers to a variable outside 1..={}",
                literal, num_variables
            ),
            FormulaDefect::UnterminatedClause => {
                write!(f, "clause is missing its terminating 0")
            }
            FormulaDefect::ClauseCountMismatch { expected, found } => write!(
                f,
                "header promised {} clauses, but {} were found",
                expected, found
            ),
        }
    }
}

/// Errors that can surface from the core search engine and its parser.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The DIMACS input is malformed. Fatal; the run never starts.
    #[error("malformed DIMACS input at line {line}: {defect}")]
    MalformedFormula { line: usize, defect: FormulaDefect },

    /// A `GasatConfig` field combination cannot be honoured. Fatal before starting.
    #[error("bad configuration: {0}")]
    BadConfiguration(String),

    /// The diversification step needs to pick a variable from a clause all of
    /// whose literals are currently forbidden; the `max` over an empty set is
    /// undefined. See DESIGN.md's "Open-question decisions" for the rationale
    /// behind propagating this rather than relaxing the forbidden set.
    #[error("diversification found no eligible variable in clause {clause}")]
    EmptyChoiceSet { clause: usize },

    /// A second run was requested while one was already active on this
    /// `RunController`.
    #[error("a search is already running")]
    AlreadyRunning,
}
