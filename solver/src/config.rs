//! Validated run configuration (`SPEC_FULL.md` §6, §10.3).

use crate::crossover::Operator;
use crate::error::SolverError;

/// The core search parameters, shared by the driver and any embedder
/// (CLI, benchmark harness, future UI) so the validation rules live in one
/// place instead of being duplicated by each caller.
#[derive(Debug, Clone, Copy)]
pub struct GasatConfig {
    pub population_size: usize,
    pub sub_population_size: usize,
    pub max_generations: usize,
    pub max_flip: usize,
    pub tabu_list_length: usize,
    pub crossover_operator: Operator,
    pub is_rvcf: bool,
    pub is_diversification: bool,
    pub max_false: u32,
    pub rec: usize,
    pub k: u32,
    pub seed: u64,
}

impl GasatConfig {
    /// Validates the raw field combination a caller assembled from flags or
    /// defaults, rejecting anything the driver/population/tabu search can't
    /// honour (`SPEC_FULL.md` §7 `BadConfiguration`).
    ///
    /// Does not and cannot rule out `EmptyChoiceSet` at diversification time:
    /// that depends on the formula's clause widths, not on these fields
    /// alone. Pick `k` small relative to the narrowest clause width to keep
    /// it unreachable in practice.
    pub fn validate(self) -> Result<GasatConfig, SolverError> {
        if self.population_size == 0 {
            return Err(SolverError::BadConfiguration(
                "population_size must be positive".into(),
            ));
        }
        if self.sub_population_size < 2 {
            return Err(SolverError::BadConfiguration(
                "sub_population_size must be at least 2 to draw distinct parents".into(),
            ));
        }
        if self.sub_population_size > self.population_size {
            return Err(SolverError::BadConfiguration(
                "sub_population_size must not exceed population_size".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(SolverError::BadConfiguration(
                "max_generations must be positive".into(),
            ));
        }
        if self.max_flip == 0 {
            return Err(SolverError::BadConfiguration(
                "max_flip must be positive".into(),
            ));
        }
        if self.tabu_list_length == 0 {
            return Err(SolverError::BadConfiguration(
                "tabu_list_length must be positive".into(),
            ));
        }
        if self.is_diversification && self.max_false == 0 {
            return Err(SolverError::BadConfiguration(
                "max_false must be positive when diversification is enabled".into(),
            ));
        }
        if self.is_diversification && self.k == 0 {
            return Err(SolverError::BadConfiguration(
                "k must be positive when diversification is enabled".into(),
            ));
        }
        Ok(self)
    }
}
