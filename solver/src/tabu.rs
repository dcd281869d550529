//! Tabu-list-guided local search over a single Assignment.

use std::collections::VecDeque;

use rand::Rng;

use crate::assignment::{sat, Assignment};
use crate::cnf::{Formula, VarId};
use crate::error::SolverError;
use crate::fitness::{evaluate, improvement, weight};

/// Bounded FIFO membership set: `VecDeque` for eviction order, `Vec<bool>`
/// for O(1) membership (`SPEC_FULL.md` §9).
#[derive(Debug, Clone)]
pub struct TabuList {
    order: VecDeque<VarId>,
    member: Vec<bool>,
    capacity: usize,
}

impl TabuList {
    pub fn new(num_variables: usize, capacity: usize) -> TabuList {
        TabuList {
            order: VecDeque::with_capacity(capacity),
            member: vec![false; num_variables + 1],
            capacity,
        }
    }

    pub fn contains(&self, v: VarId) -> bool {
        self.member[v]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn push(&mut self, v: VarId) {
        if self.order.len() == self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.member[evicted] = false;
            }
        }
        self.order.push_back(v);
        self.member[v] = true;
    }
}

/// Diversification's forbidden-flip age map (`SPEC_FULL.md` §3, §4.4).
#[derive(Debug, Clone, Default)]
pub struct Forbidden {
    age: std::collections::HashMap<VarId, u32>,
}

impl Forbidden {
    pub fn new() -> Forbidden {
        Forbidden::default()
    }

    pub fn contains(&self, v: VarId) -> bool {
        self.age.contains_key(&v)
    }

    pub fn insert(&mut self, v: VarId) {
        self.age.insert(v, 0);
    }

    /// Ages every entry by one, dropping those that reach `k`.
    pub fn age_all(&mut self, k: u32) {
        self.age.retain(|_, age| {
            *age += 1;
            *age < k
        });
    }
}

/// A (p, alternatives) pair returned by a choice function: only `p` drives
/// the descent, `alternatives` is exposed for testing.
pub struct Choice {
    pub p: VarId,
    pub alternatives: Vec<VarId>,
}

/// A pluggable variable-choice rule for the descent's inner step.
pub trait ChoiceFunction {
    fn choose(
        &self,
        formula: &Formula,
        current: &Assignment,
        tabu: &TabuList,
        best: &Assignment,
        rng: &mut dyn rand::RngCore,
    ) -> Choice;
}

/// Prefers non-tabu variables; a tabu variable is only considered if
/// flipping it would beat `best` (aspiration).
pub struct Standard;

impl ChoiceFunction for Standard {
    fn choose(
        &self,
        formula: &Formula,
        current: &Assignment,
        tabu: &TabuList,
        best: &Assignment,
        rng: &mut dyn rand::RngCore,
    ) -> Choice {
        let best_fitness = evaluate(formula, best);
        let current_fitness = evaluate(formula, current);

        let mut positions = candidate_positions(formula, current, |v| {
            let gain = improvement(formula, current, v);
            !tabu.contains(v) || (current_fitness as isize - gain) < best_fitness as isize
        });

        if positions.is_empty() {
            positions = candidate_positions(formula, current, |_| true);
        }

        let p = positions[rng.gen_range(0, positions.len())];
        Choice {
            p,
            alternatives: positions,
        }
    }
}

/// Picks the raw arg-max-improvement set, tie-broken by RVCF weight.
pub struct Rvcf;

impl ChoiceFunction for Rvcf {
    fn choose(
        &self,
        formula: &Formula,
        current: &Assignment,
        _tabu: &TabuList,
        _best: &Assignment,
        rng: &mut dyn rand::RngCore,
    ) -> Choice {
        let positions = candidate_positions(formula, current, |_| true);

        let mut best_weight = f64::NEG_INFINITY;
        let mut by_weight = Vec::new();
        for &v in &positions {
            let w = weight(formula, current, v);
            if w > best_weight {
                best_weight = w;
                by_weight.clear();
                by_weight.push(v);
            } else if w == best_weight {
                by_weight.push(v);
            }
        }

        let p = by_weight[rng.gen_range(0, by_weight.len())];
        Choice {
            p,
            alternatives: by_weight,
        }
    }
}

/// The arg-max set of `improvement(current, v)` over `v` satisfying `filter`.
fn candidate_positions(
    formula: &Formula,
    current: &Assignment,
    filter: impl Fn(VarId) -> bool,
) -> Vec<VarId> {
    let mut best_gain = isize::MIN;
    let mut positions = Vec::new();
    for v in 1..=formula.num_variables {
        if !filter(v) {
            continue;
        }
        let gain = improvement(formula, current, v);
        if gain > best_gain {
            best_gain = gain;
            positions.clear();
            positions.push(v);
        } else if gain == best_gain {
            positions.push(v);
        }
    }
    positions
}

/// Per-clause false-observation counters driving diversification
/// (`SPEC_FULL.md` §3).
#[derive(Debug, Clone)]
pub struct FalseCounts(Vec<u32>);

impl FalseCounts {
    pub fn new(num_clauses: usize) -> FalseCounts {
        FalseCounts(vec![0; num_clauses])
    }
}

/// Parameters governing one `tabu_local_search` call (`SPEC_FULL.md` §4.4, §6).
#[derive(Debug, Clone, Copy)]
pub struct TabuParams {
    pub max_flip: usize,
    pub tabu_list_length: usize,
    pub is_diversification: bool,
    pub max_false: u32,
    pub rec: usize,
    pub k: u32,
}

/// Runs the tabu descent from `seed`, returning the best Assignment found.
/// `should_stop` is polled once per iteration for cooperative cancellation
/// (`SPEC_FULL.md` §5).
pub fn tabu_local_search(
    formula: &Formula,
    seed: Assignment,
    choice_fn: &dyn ChoiceFunction,
    params: TabuParams,
    false_counts: &mut FalseCounts,
    rng: &mut dyn rand::RngCore,
    mut should_stop: impl FnMut() -> bool,
) -> Result<Assignment, SolverError> {
    let mut current = seed;
    let mut best = current.clone();
    let mut tabu = TabuList::new(formula.num_variables, params.tabu_list_length);
    let mut forbidden = Forbidden::new();
    let mut flips = 0usize;

    while evaluate(formula, &best) > 0 && flips < params.max_flip {
        if should_stop() {
            break;
        }

        let choice = choice_fn.choose(formula, &current, &tabu, &best, rng);
        let p = choice.p;

        if !tabu.contains(p) {
            current.flip(p);
            tabu.push(p);
            flips += 1;
            if evaluate(formula, &current) < evaluate(formula, &best) {
                best = current.clone();
            }
            if params.is_diversification {
                forbidden.age_all(params.k);
            }
        }

        if params.is_diversification {
            run_diversification(formula, &mut current, &mut forbidden, false_counts, params)?;
            if evaluate(formula, &current) < evaluate(formula, &best) {
                best = current.clone();
            }
        }
    }

    Ok(best)
}

/// The clause indices mentioning `v` that are unsatisfied right now.
fn unsatisfied_mentioning(formula: &Formula, current: &Assignment, v: VarId) -> Vec<usize> {
    formula
        .clauses_mentioning(v)
        .filter(|&idx| !sat(current, &formula.clauses[idx]))
        .collect()
}

fn run_diversification(
    formula: &Formula,
    current: &mut Assignment,
    forbidden: &mut Forbidden,
    false_counts: &mut FalseCounts,
    params: TabuParams,
) -> Result<(), SolverError> {
    for (clause_idx, clause) in formula.clauses.iter().enumerate() {
        if sat(current, clause) {
            continue;
        }

        false_counts.0[clause_idx] += 1;
        if false_counts.0[clause_idx] < params.max_false {
            continue;
        }

        let mut best_gain = isize::MIN;
        let mut v = None;
        for lit in &clause.literals {
            let gain = improvement(formula, current, lit.var());
            if gain > best_gain {
                best_gain = gain;
                v = Some(lit.var());
            }
        }
        let v = v.ok_or(SolverError::EmptyChoiceSet { clause: clause_idx })?;

        if forbidden.contains(v) {
            continue;
        }
        false_counts.0[clause_idx] = 0;
        forbidden.insert(v);

        let before = unsatisfied_mentioning(formula, current, v);
        current.flip(v);
        let mut newly_satisfied: Vec<usize> = before
            .into_iter()
            .filter(|&idx| sat(current, &formula.clauses[idx]))
            .collect();

        let mut cascades = 0usize;
        while cascades < params.rec && !newly_satisfied.is_empty() {
            let mut next_round = Vec::new();
            for nested_idx in newly_satisfied {
                let nested_clause = &formula.clauses[nested_idx];

                let mut best_gain = isize::MIN;
                let mut pick = None;
                for lit in &nested_clause.literals {
                    if forbidden.contains(lit.var()) {
                        continue;
                    }
                    let gain = improvement(formula, current, lit.var());
                    if gain > best_gain {
                        best_gain = gain;
                        pick = Some(lit.var());
                    }
                }
                let pick = pick.ok_or(SolverError::EmptyChoiceSet { clause: nested_idx })?;

                forbidden.insert(pick);
                let before = unsatisfied_mentioning(formula, current, pick);
                current.flip(pick);
                forbidden.age_all(params.k);
                next_round.extend(before.into_iter().filter(|&idx| sat(current, &formula.clauses[idx])));
            }
            newly_satisfied = next_round;
            cascades += 1;
        }
    }
    Ok(())
}
