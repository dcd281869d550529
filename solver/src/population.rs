//! Population lifecycle: creation, elite selection, weakest-replacement.

use rand::Rng;

use crate::assignment::Assignment;
use crate::cnf::Formula;
use crate::fitness::evaluate;

/// An unordered multiset of complete Assignments (`SPEC_FULL.md` §3).
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Assignment>,
}

impl Population {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Assignment] {
        &self.members
    }

    /// The first member with fitness 0, if any.
    pub fn is_satisfied(&self, formula: &Formula) -> Option<&Assignment> {
        self.members.iter().find(|a| evaluate(formula, a) == 0)
    }

    /// The fittest (lowest-fitness) member.
    pub fn fittest(&self, formula: &Formula) -> &Assignment {
        self.members
            .iter()
            .min_by_key(|a| evaluate(formula, a))
            .expect("population is never empty")
    }

    /// Draws two distinct parents uniformly from the `sub_population_size`
    /// fittest members. Caller guarantees `sub_population_size >= 2` and
    /// enough diversity for a distinct pair to exist.
    pub fn select(
        &self,
        formula: &Formula,
        sub_population_size: usize,
        rng: &mut dyn rand::RngCore,
    ) -> (Assignment, Assignment) {
        let mut sorted: Vec<&Assignment> = self.members.iter().collect();
        sorted.sort_by_key(|a| evaluate(formula, a));
        let elite = &sorted[..sub_population_size.min(sorted.len())];

        loop {
            let i = rng.gen_range(0, elite.len());
            let j = rng.gen_range(0, elite.len());
            if i != j {
                return (elite[i].clone(), elite[j].clone());
            }
        }
    }

    /// Replaces the weakest member of the `sub_population_size` elite slice
    /// with `child` iff `child` is strictly fitter.
    pub fn replace(&mut self, formula: &Formula, sub_population_size: usize, child: Assignment) {
        let mut indices: Vec<usize> = (0..self.members.len()).collect();
        indices.sort_by_key(|&i| evaluate(formula, &self.members[i]));
        let elite_indices = &indices[..sub_population_size.min(indices.len())];

        let weakest_idx = *elite_indices
            .iter()
            .max_by_key(|&&i| evaluate(formula, &self.members[i]))
            .expect("sub-population is never empty");

        if evaluate(formula, &child) < evaluate(formula, &self.members[weakest_idx]) {
            self.members[weakest_idx] = child;
        }
    }
}

/// Fills a population with `population_size` fresh, independent, random
/// complete Assignments over `formula.num_variables` variables.
pub fn create_population(
    formula: &Formula,
    population_size: usize,
    rng: &mut dyn rand::RngCore,
) -> Population {
    let members = (0..population_size)
        .map(|_| {
            let mut a = Assignment::all_false(formula.num_variables);
            for v in 1..=formula.num_variables {
                a.set(v, rng.gen_bool(0.5));
            }
            a
        })
        .collect();
    Population { members }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn formula() -> Formula {
        Formula::from_dimacs("p cnf 4 3\n1 2 0\n-1 3 0\n-2 -3 4 0\n").unwrap()
    }

    #[test]
    fn create_population_yields_complete_assignments_of_the_right_size() {
        let formula = formula();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let population = create_population(&formula, 20, &mut rng);
        assert_eq!(population.len(), 20);
        for member in population.members() {
            assert!(member.is_complete());
        }
    }

    #[test]
    fn select_draws_two_distinct_parents_from_the_elite_slice() {
        let formula = formula();
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let population = create_population(&formula, 10, &mut rng);
        for _ in 0..20 {
            let (x, y) = population.select(&formula, 5, &mut rng);
            assert!(x.is_complete());
            assert!(y.is_complete());
        }
    }

    #[test]
    fn replace_discards_a_child_no_better_than_the_weakest_elite() {
        let formula = formula();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut population = create_population(&formula, 5, &mut rng);
        let worst_fitness_before = population
            .members()
            .iter()
            .map(|a| evaluate(&formula, a))
            .max()
            .unwrap();

        let mut bad_child = Assignment::all_false(4);
        for v in 1..=4 {
            bad_child.set(v, false);
        }
        // A child strictly worse than every elite member is never inserted.
        if evaluate(&formula, &bad_child) > worst_fitness_before {
            population.replace(&formula, 5, bad_child);
            let worst_fitness_after = population
                .members()
                .iter()
                .map(|a| evaluate(&formula, a))
                .max()
                .unwrap();
            assert!(worst_fitness_after <= worst_fitness_before);
        }
    }

    #[test]
    fn is_satisfied_finds_a_zero_fitness_member() {
        let formula = formula();
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let mut population = create_population(&formula, 3, &mut rng);

        let mut satisfying = Assignment::all_false(4);
        satisfying.set(1, true);
        satisfying.set(3, true);
        satisfying.set(4, true);
        assert_eq!(evaluate(&formula, &satisfying), 0);

        population.replace(&formula, 3, satisfying);
        assert!(population.is_satisfied(&formula).is_some());
    }
}
