//! CNF formula representation and DIMACS parsing.
//!
//! Unlike a CDCL solver's clause database, nothing here ever needs to mutate
//! a clause after load time, so `Formula` is a flat, order-preserving
//! structure: literal order inside a clause is part of the observable
//! contract (it drives the crossover tie-breaks in [`crate::crossover`]).

use rayon::prelude::*;

use crate::error::{FormulaDefect, SolverError};

/// Identifier of a logical variable, in `1..=n`.
pub type VarId = usize;

/// A signed literal: `v` for the positive occurrence of variable `v`, `-v`
/// for its negation. The magnitude is the variable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(i64);

impl Lit {
    #[inline]
    pub fn from_i64(v: i64) -> Lit {
        debug_assert!(v != 0);
        Lit(v)
    }

    /// The variable this literal refers to, regardless of sign.
    #[inline]
    pub fn var(self) -> VarId {
        self.0.unsigned_abs() as VarId
    }

    /// `true` for a positive literal (`v`), `false` for a negated one (`-v`).
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn to_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clause: a non-empty, order-preserving sequence of literals.
#[derive(Debug, Clone)]
pub struct Clause {
    pub literals: Vec<Lit>,
}

impl Clause {
    pub fn new(literals: Vec<Lit>) -> Clause {
        Clause { literals }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Where a variable occurs: clause indices mentioning it positively, and
/// clause indices mentioning it negatively. Built once at load time so
/// `improvement`/`weight` never have to rescan all `m` clauses per candidate
/// variable.
#[derive(Debug, Clone, Default)]
pub struct Occurrence {
    pub positive: Vec<usize>,
    pub negative: Vec<usize>,
}

/// A CNF formula: `num_variables` variables, an ordered list of clauses, and
/// the derived per-variable occurrence index.
#[derive(Debug, Clone)]
pub struct Formula {
    pub clauses: Vec<Clause>,
    pub num_variables: usize,
    /// Indexed `1..=num_variables`; `occurrences[0]` is unused padding so
    /// `VarId`s can index directly without an off-by-one.
    occurrences: Vec<Occurrence>,
}

impl Formula {
    /// Builds a formula from already-parsed clauses, computing the
    /// occurrence index. The one-shot, order-insensitive index build is the
    /// only place this crate reaches for `rayon` (see `SPEC_FULL.md` §10.4) —
    /// the search loop itself never runs in parallel.
    pub fn new(clauses: Vec<Clause>, num_variables: usize) -> Formula {
        let partials: Vec<(usize, Lit)> = clauses
            .par_iter()
            .enumerate()
            .flat_map_iter(|(idx, clause)| clause.literals.iter().map(move |&lit| (idx, lit)))
            .collect();

        let mut occurrences = vec![Occurrence::default(); num_variables + 1];
        for (clause_idx, lit) in partials {
            let entry = &mut occurrences[lit.var()];
            if lit.is_positive() {
                entry.positive.push(clause_idx);
            } else {
                entry.negative.push(clause_idx);
            }
        }

        Formula {
            clauses,
            num_variables,
            occurrences,
        }
    }

    #[inline]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[inline]
    pub fn occurrence(&self, var: VarId) -> &Occurrence {
        &self.occurrences[var]
    }

    /// All clause indices that mention `var`, either signed.
    pub fn clauses_mentioning(&self, var: VarId) -> impl Iterator<Item = usize> + '_ {
        let occ = &self.occurrences[var];
        occ.positive.iter().copied().chain(occ.negative.iter().copied())
    }

    /// Parses DIMACS CNF text into a `Formula`.
    ///
    /// - Lines starting with `c` are comments.
    /// - The header `p cnf <n> <m>` gives variable/clause counts; only the
    ///   3rd/4th whitespace-separated tokens are read.
    /// - A clause is a sequence of non-zero signed integers terminated by a
    ///   literal `0`; it may span multiple lines.
    pub fn from_dimacs(input: &str) -> Result<Formula, SolverError> {
        let mut num_variables = None;
        let mut expected_clauses = None;
        let mut clauses = Vec::new();
        let mut current = Vec::new();

        for (line_no, raw_line) in input.lines().enumerate() {
            let line_no = line_no + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if line.starts_with('p') {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                let (n, m) = tokens
                    .get(2)
                    .zip(tokens.get(3))
                    .and_then(|(n, m)| Some((n.parse::<usize>().ok()?, m.parse::<usize>().ok()?)))
                    .ok_or(SolverError::MalformedFormula {
                        line: line_no,
                        defect: FormulaDefect::MissingOrInvalidHeader,
                    })?;
                num_variables = Some(n);
                expected_clauses = Some(m);
                continue;
            }

            let n = num_variables.ok_or(SolverError::MalformedFormula {
                line: line_no,
                defect: FormulaDefect::MissingOrInvalidHeader,
            })?;

            for token in line.split_whitespace() {
                let value: i64 = token.parse().map_err(|_| SolverError::MalformedFormula {
                    line: line_no,
                    defect: FormulaDefect::MissingOrInvalidHeader,
                })?;
                if value == 0 {
                    if current.is_empty() {
                        continue;
                    }
                    clauses.push(Clause::new(std::mem::take(&mut current)));
                    continue;
                }
                if value.unsigned_abs() as usize > n {
                    return Err(SolverError::MalformedFormula {
                        line: line_no,
                        defect: FormulaDefect::LiteralOutOfRange {
                            literal: value,
                            num_variables: n,
                        },
                    });
                }
                current.push(Lit::from_i64(value));
            }
        }

        if !current.is_empty() {
            return Err(SolverError::MalformedFormula {
                line: input.lines().count().max(1),
                defect: FormulaDefect::UnterminatedClause,
            });
        }

        let num_variables = num_variables.ok_or(SolverError::MalformedFormula {
            line: 1,
            defect: FormulaDefect::MissingOrInvalidHeader,
        })?;
        let expected_clauses = expected_clauses.unwrap_or(clauses.len());

        if clauses.len() != expected_clauses {
            return Err(SolverError::MalformedFormula {
                line: input.lines().count().max(1),
                defect: FormulaDefect::ClauseCountMismatch {
                    expected: expected_clauses,
                    found: clauses.len(),
                },
            });
        }

        Ok(Formula::new(clauses, num_variables))
    }

    /// Renders the formula back into DIMACS CNF text.
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_variables, self.clauses.len());
        for clause in &self.clauses {
            for lit in &clause.literals {
                out.push_str(&lit.to_i64().to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> &'static str {
        // n=9, m=10, matches the fixture used in spec S3/S4/S5.
        "c fixture formula\n\
         p cnf 9 10\n\
         9 -5 0\n\
         1 3 6 0\n\
         -6 -4 0\n\
         1 2 0\n\
         2 3 0\n\
         3 4 0\n\
         4 5 0\n\
         5 6 0\n\
         6 7 0\n\
         7 8 -3 0\n"
    }

    #[test]
    fn parses_header_and_clause_count() {
        let formula = Formula::from_dimacs(fixture()).unwrap();
        assert_eq!(formula.num_variables, 9);
        assert_eq!(formula.num_clauses(), 10);
    }

    #[test]
    fn preserves_literal_order_within_a_clause() {
        let formula = Formula::from_dimacs(fixture()).unwrap();
        let lits: Vec<i64> = formula.clauses[1].literals.iter().map(|l| l.to_i64()).collect();
        assert_eq!(lits, vec![1, 3, 6]);
    }

    #[test]
    fn clause_spanning_multiple_lines() {
        let text = "p cnf 3 1\n1 2\n-3 0\n";
        let formula = Formula::from_dimacs(text).unwrap();
        assert_eq!(formula.num_clauses(), 1);
        assert_eq!(formula.clauses[0].len(), 3);
    }

    #[test]
    fn rejects_missing_header() {
        let err = Formula::from_dimacs("1 2 0\n").unwrap_err();
        assert!(matches!(
            err,
            SolverError::MalformedFormula {
                defect: FormulaDefect::MissingOrInvalidHeader,
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_literal() {
        let err = Formula::from_dimacs("p cnf 2 1\n5 0\n").unwrap_err();
        assert!(matches!(
            err,
            SolverError::MalformedFormula {
                defect: FormulaDefect::LiteralOutOfRange { literal: 5, .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_unterminated_clause() {
        let err = Formula::from_dimacs("p cnf 2 1\n1 2\n").unwrap_err();
        assert!(matches!(
            err,
            SolverError::MalformedFormula {
                defect: FormulaDefect::UnterminatedClause,
                ..
            }
        ));
    }

    #[test]
    fn rejects_clause_count_mismatch() {
        let err = Formula::from_dimacs("p cnf 2 2\n1 0\n").unwrap_err();
        assert!(matches!(
            err,
            SolverError::MalformedFormula {
                defect: FormulaDefect::ClauseCountMismatch {
                    expected: 2,
                    found: 1
                },
                ..
            }
        ));
    }

    #[test]
    fn occurrence_index_is_accurate() {
        let formula = Formula::from_dimacs(fixture()).unwrap();
        let occ = formula.occurrence(6);
        // variable 6 appears in clauses 1(+), 2(-), 6(+), 7(-) (0-indexed)
        assert!(occ.positive.contains(&1));
        assert!(occ.negative.contains(&2));
        assert!(occ.positive.contains(&6));
        assert!(occ.negative.contains(&7));
    }

    #[test]
    fn roundtrips_through_dimacs() {
        let formula = Formula::from_dimacs(fixture()).unwrap();
        let rendered = formula.to_dimacs();
        let reparsed = Formula::from_dimacs(&rendered).unwrap();
        assert_eq!(reparsed.num_variables, formula.num_variables);
        assert_eq!(reparsed.num_clauses(), formula.num_clauses());
    }
}
