//! The three GASAT crossover operators: CC, CCTM, FF.
//!
//! Each takes two complete parents and returns a new complete child. All
//! three build the child's partial state first, then complete it with
//! `Assignment::allocate`.

use crate::assignment::{sat, sat_crossover, Assignment};
use crate::cnf::Formula;
use crate::fitness::improvement;

/// Selects which of the three crossover operators a run uses
/// (`SPEC_FULL.md` §6, `crossover_operator: 0|1|2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Corrective Clause.
    Cc,
    /// Corrective Clause with Truth Maintenance.
    Cctm,
    /// Fleurent–Ferland.
    Ff,
}

impl Operator {
    pub fn from_id(id: u8) -> Option<Operator> {
        match id {
            0 => Some(Operator::Cc),
            1 => Some(Operator::Cctm),
            2 => Some(Operator::Ff),
            _ => None,
        }
    }

    pub fn apply(self, formula: &Formula, x: &Assignment, y: &Assignment) -> Assignment {
        match self {
            Operator::Cc => corrective_clause(formula, x, y),
            Operator::Cctm => corrective_clause_truth_maintenance(formula, x, y),
            Operator::Ff => fleurent_ferland(formula, x, y),
        }
    }
}

/// Runs the shared first pass of CC/CCTM over `z`, mutating it in place.
fn corrective_clause_pass(formula: &Formula, x: &Assignment, y: &Assignment, z: &mut Assignment) {
    for clause in &formula.clauses {
        if sat(x, clause) || sat(y, clause) || sat_crossover(z, clause) {
            continue;
        }

        let mut best: Option<(isize, usize)> = None;
        for lit in &clause.literals {
            let v = lit.var();
            let gain = improvement(formula, x, v) + improvement(formula, y, v);
            // Non-strict `>=`: a later literal achieving the same gain wins.
            if best.map_or(true, |(best_gain, _)| gain >= best_gain) {
                best = Some((gain, v));
            }
        }

        if let Some((gain, v)) = best {
            if gain > 0 {
                z.set(v, x.get(v));
                z.set_defined(v);
                z.flip(v);
            }
        }
    }
}

/// CC: Corrective Clause (`SPEC_FULL.md` §4.3).
pub fn corrective_clause(formula: &Formula, x: &Assignment, y: &Assignment) -> Assignment {
    let mut z = Assignment::undefined(formula.num_variables);
    corrective_clause_pass(formula, x, y, &mut z);
    z.allocate(formula, x, y);
    z
}

/// CCTM: Corrective Clause with Truth Maintenance (`SPEC_FULL.md` §4.3).
pub fn corrective_clause_truth_maintenance(
    formula: &Formula,
    x: &Assignment,
    y: &Assignment,
) -> Assignment {
    let mut z = Assignment::undefined(formula.num_variables);
    corrective_clause_pass(formula, x, y, &mut z);

    for clause in &formula.clauses {
        if !(sat(x, clause) && sat(y, clause) && !sat_crossover(&z, clause)) {
            continue;
        }

        let mut best: Option<(isize, usize)> = None;
        for lit in &clause.literals {
            let v = lit.var();
            if !(x.get(v) || y.get(v)) {
                continue;
            }

            let mut probe = z.clone();
            probe.set(v, true);
            if !sat_crossover(&probe, clause) {
                continue;
            }

            let gain = improvement(formula, x, v) + improvement(formula, y, v);
            // Strict `<`: the earliest literal achieving the minimum gain wins.
            if best.map_or(true, |(best_gain, _)| gain < best_gain) {
                best = Some((gain, v));
            }
        }

        if let Some((_, v)) = best {
            z.set(v, true);
            z.set_defined(v);
        }
    }

    z.allocate(formula, x, y);
    z
}

/// FF: Fleurent–Ferland (`SPEC_FULL.md` §4.3, §9). Copies every literal's
/// variable from whichever parent alone satisfies the clause.
pub fn fleurent_ferland(formula: &Formula, x: &Assignment, y: &Assignment) -> Assignment {
    let mut z = Assignment::undefined(formula.num_variables);

    for clause in &formula.clauses {
        let x_sat = sat(x, clause);
        let y_sat = sat(y, clause);

        if x_sat && !y_sat {
            for lit in &clause.literals {
                z.set(lit.var(), x.get(lit.var()));
            }
        } else if !x_sat && y_sat {
            for lit in &clause.literals {
                z.set(lit.var(), y.get(lit.var()));
            }
        }
    }

    z.allocate(formula, x, y);
    z
}
