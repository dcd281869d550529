//! Fitness and improvement: pure functions over `(Formula, Assignment)`.

use crate::assignment::{sat, Assignment};
use crate::cnf::{Clause, Formula, VarId};

/// Number of clauses *not* satisfied by `x`. Memoised on `x`'s fitness cache;
/// never stored by a caller that didn't just compute it.
pub fn evaluate(formula: &Formula, x: &Assignment) -> usize {
    if let Some(cached) = x.cached() {
        return cached;
    }
    let unsatisfied = formula.clauses.iter().filter(|c| !sat(x, c)).count();
    x.cache_fitness(unsatisfied);
    unsatisfied
}

/// `evaluate(X) - evaluate(flip(X, v))`: the reduction in unsatisfied-clause
/// count a flip of `v` would cause. Positive means the flip improves fitness.
/// Computed incrementally over the clauses mentioning `v`, using the
/// formula's occurrence index, rather than two full re-evaluations.
pub fn improvement(formula: &Formula, x: &Assignment, v: VarId) -> isize {
    let occ = formula.occurrence(v);
    let mut delta = 0isize;
    for &clause_idx in occ.positive.iter().chain(occ.negative.iter()) {
        let clause = &formula.clauses[clause_idx];
        let before = sat(x, clause);
        let after = sat_with_flip(x, clause, v);
        match (before, after) {
            (false, true) => delta += 1,
            (true, false) => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// `sat(X, c)` as if `X[v]` were flipped, without materialising a copy.
fn sat_with_flip(x: &Assignment, clause: &Clause, v: VarId) -> bool {
    clause.literals.iter().any(|lit| {
        let bit = if lit.var() == v {
            !x.get(v)
        } else {
            x.get(lit.var())
        };
        bit == lit.is_positive()
    })
}

/// Number of literals of `c` that evaluate true under `x`.
pub fn degree(x: &Assignment, clause: &Clause) -> usize {
    clause
        .literals
        .iter()
        .filter(|lit| x.get(lit.var()) == lit.is_positive())
        .count()
}

/// RVCF tie-break weight (`SPEC_FULL.md` §4.4): average degree of the
/// clauses mentioning `v`, under `x` exactly as it stands. `x[v]` is fixed,
/// so there's nothing to flip here; 0 if `v` isn't mentioned anywhere.
pub fn weight(formula: &Formula, x: &Assignment, v: VarId) -> f64 {
    let degrees: Vec<usize> = formula
        .clauses_mentioning(v)
        .map(|idx| degree(x, &formula.clauses[idx]))
        .collect();

    if degrees.is_empty() {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{Clause, Lit};

    fn fixture() -> Formula {
        Formula::from_dimacs(
            "p cnf 9 10\n\
             9 -5 0\n\
             1 3 6 0\n\
             -6 -4 0\n\
             1 2 0\n\
             2 3 0\n\
             3 4 0\n\
             4 5 0\n\
             5 6 0\n\
             6 7 0\n\
             7 8 -3 0\n",
        )
        .unwrap()
    }

    fn assignment_from_bits(bits: &[bool]) -> Assignment {
        let mut a = Assignment::all_false(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            a.set(i + 1, b);
        }
        a
    }

    // S3
    #[test]
    fn fitness_on_fixture_formula() {
        let formula = fixture();
        let all_true = assignment_from_bits(&[true; 9]);
        assert_eq!(evaluate(&formula, &all_true), 1);

        let mut flipped = all_true.clone();
        flipped.flip(9);
        assert_eq!(evaluate(&formula, &flipped), 2);
    }

    // S4
    #[test]
    fn improvement_on_fixture_formula() {
        let formula = fixture();
        let x = assignment_from_bits(&[false, false, false, true, false, false, false, false, false]);

        assert_eq!(improvement(&formula, &x, 1), 1);
        assert_eq!(improvement(&formula, &x, 6), 1);

        let mut flipped = x.clone();
        flipped.flip(6);
        assert_eq!(improvement(&formula, &flipped, 6), -1);
    }

    #[test]
    fn improvement_is_antisymmetric_under_flip() {
        let formula = fixture();
        let x = assignment_from_bits(&[true, false, true, false, true, false, true, false, true]);
        let gain = improvement(&formula, &x, 3);
        let mut flipped = x.clone();
        flipped.flip(3);
        assert_eq!(improvement(&formula, &flipped, 3), -gain);
    }

    // S5
    #[test]
    fn degree_on_fixture() {
        let x = assignment_from_bits(&[true, false, false, true, false, false, false, false, false]);
        let c1 = Clause::new(vec![Lit::from_i64(9), Lit::from_i64(-5)]);
        let c2 = Clause::new(vec![Lit::from_i64(1), Lit::from_i64(3), Lit::from_i64(6)]);
        assert_eq!(degree(&x, &c1), 0);
        assert_eq!(degree(&x, &c2), 1);

        let y = assignment_from_bits(&[false, false, true, false, false, false, true, true, false]);
        let c3 = Clause::new(vec![Lit::from_i64(7), Lit::from_i64(8), Lit::from_i64(-3)]);
        assert_eq!(degree(&y, &c3), 3);
    }

    #[test]
    fn evaluate_is_bounded_by_clause_count() {
        let formula = fixture();
        let all_false = Assignment::all_false(9);
        let score = evaluate(&formula, &all_false);
        assert!(score <= formula.num_clauses());
    }

    #[test]
    fn evaluate_zero_iff_every_clause_satisfied() {
        let formula = Formula::from_dimacs("p cnf 2 2\n1 0\n2 0\n").unwrap();
        let mut x = Assignment::all_false(2);
        x.set(1, true);
        x.set(2, true);
        assert_eq!(evaluate(&formula, &x), 0);
    }
}
