//! The GASAT generation loop: selection, crossover, tabu refinement, replace.

use std::time::Instant;

use log::{debug, warn};
use rand::SeedableRng;

use crate::assignment::Assignment;
use crate::cnf::Formula;
use crate::config::GasatConfig;
use crate::error::SolverError;
use crate::fitness::evaluate;
use crate::population::create_population;
use crate::tabu::{tabu_local_search, FalseCounts, Rvcf, Standard, TabuParams};

/// Snapshot fired on every generation transition (`SPEC_FULL.md` §6).
/// Observers must not mutate core state; they see an owned copy.
#[derive(Debug, Clone)]
pub struct GenerationEvent {
    pub generation: usize,
    pub max_generations: usize,
    pub start_time: Instant,
    pub best_fitness: usize,
    pub best_assignment: Assignment,
    pub current_child_fitness: usize,
    pub current_child: Assignment,
    pub num_variables: usize,
    pub num_clauses: usize,
    pub clauses_satisfied_by_best: usize,
    pub clauses_satisfied_by_child: usize,
}

/// Fired once when the driver loop exits, win or not.
#[derive(Debug, Clone)]
pub struct TerminalEvent {
    pub solved: bool,
    pub final_fitness: usize,
    pub generation: usize,
    pub max_generations: usize,
    pub start_time: Instant,
    pub end_time: Instant,
    pub final_assignment: Assignment,
    pub clauses_satisfied_by_final: usize,
}

/// A subscriber to the driver's progress notifications. Invoked
/// synchronously on the driver thread; an observer that needs to do I/O is
/// expected to hand off to its own thread (`SPEC_FULL.md` §5).
pub trait Observer {
    fn on_generation(&mut self, event: &GenerationEvent);
    fn on_terminal(&mut self, event: &TerminalEvent);
}

/// Why the driver's loop stopped.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// A population member reached fitness 0.
    Satisfied(Assignment),
    /// `max_generations` was reached without a satisfying assignment.
    Exhausted(Assignment),
    /// The cooperative cancellation flag was observed set.
    Cancelled(Assignment),
}

impl RunOutcome {
    pub fn assignment(&self) -> &Assignment {
        match self {
            RunOutcome::Satisfied(a) | RunOutcome::Exhausted(a) | RunOutcome::Cancelled(a) => a,
        }
    }
}

/// Owns the population and drives the generation loop described in
/// `SPEC_FULL.md` §4.5.
pub struct GasatDriver<'a> {
    formula: &'a Formula,
    config: GasatConfig,
    rng: rand::rngs::StdRng,
}

impl<'a> GasatDriver<'a> {
    pub fn new(formula: &'a Formula, config: GasatConfig) -> GasatDriver<'a> {
        GasatDriver {
            formula,
            rng: rand::rngs::StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Runs the driver loop until a satisfying assignment is found,
    /// `max_generations` is exhausted, or `should_stop` reports cancellation
    /// (polled once per generation; `tabu_local_search` additionally polls
    /// it once per tabu iteration).
    pub fn run(
        &mut self,
        observers: &mut [Box<dyn Observer>],
        mut should_stop: impl FnMut() -> bool,
    ) -> Result<RunOutcome, SolverError> {
        let start_time = Instant::now();
        let mut population = create_population(self.formula, self.config.population_size, &mut self.rng);
        let mut false_counts = FalseCounts::new(self.formula.num_clauses());
        let mut generation = 0usize;

        let outcome = loop {
            if let Some(solution) = population.is_satisfied(self.formula) {
                break RunOutcome::Satisfied(solution.clone());
            }
            if generation >= self.config.max_generations {
                break RunOutcome::Exhausted(population.fittest(self.formula).clone());
            }
            if should_stop() {
                break RunOutcome::Cancelled(population.fittest(self.formula).clone());
            }

            let (x, y) = population.select(self.formula, self.config.sub_population_size, &mut self.rng);
            let child = self.config.crossover_operator.apply(self.formula, &x, &y);

            let refined = if self.config.is_rvcf {
                self.descend(&Rvcf, child, &mut false_counts, &mut should_stop)?
            } else {
                self.descend(&Standard, child, &mut false_counts, &mut should_stop)?
            };

            let child_fitness = evaluate(self.formula, &refined);
            population.replace(self.formula, self.config.sub_population_size, refined.clone());
            generation += 1;

            let best = population.fittest(self.formula).clone();
            let best_fitness = evaluate(self.formula, &best);
            debug!(
                "generation {}/{}: best_fitness={} child_fitness={}",
                generation, self.config.max_generations, best_fitness, child_fitness
            );

            let event = GenerationEvent {
                generation,
                max_generations: self.config.max_generations,
                start_time,
                best_fitness,
                best_assignment: best.clone(),
                current_child_fitness: child_fitness,
                current_child: refined,
                num_variables: self.formula.num_variables,
                num_clauses: self.formula.num_clauses(),
                clauses_satisfied_by_best: self.formula.num_clauses() - best_fitness,
                clauses_satisfied_by_child: self.formula.num_clauses() - child_fitness,
            };
            for observer in observers.iter_mut() {
                observer.on_generation(&event);
            }
        };

        let end_time = Instant::now();
        let final_assignment = outcome.assignment().clone();
        let final_fitness = evaluate(self.formula, &final_assignment);
        let terminal = TerminalEvent {
            solved: matches!(outcome, RunOutcome::Satisfied(_)),
            final_fitness,
            generation,
            max_generations: self.config.max_generations,
            start_time,
            end_time,
            final_assignment: final_assignment.clone(),
            clauses_satisfied_by_final: self.formula.num_clauses() - final_fitness,
        };
        for observer in observers.iter_mut() {
            observer.on_terminal(&terminal);
        }

        Ok(outcome)
    }

    fn descend(
        &mut self,
        choice_fn: &dyn crate::tabu::ChoiceFunction,
        seed: Assignment,
        false_counts: &mut FalseCounts,
        should_stop: &mut impl FnMut() -> bool,
    ) -> Result<Assignment, SolverError> {
        let params = TabuParams {
            max_flip: self.config.max_flip,
            tabu_list_length: self.config.tabu_list_length,
            is_diversification: self.config.is_diversification,
            max_false: self.config.max_false,
            rec: self.config.rec,
            k: self.config.k,
        };
        let result = tabu_local_search(
            self.formula,
            seed,
            choice_fn,
            params,
            false_counts,
            &mut self.rng,
            || should_stop(),
        );
        if result.is_err() {
            warn!("diversification step found no eligible variable; propagating EmptyChoiceSet");
        }
        result
    }
}
