/// Candidate truth assignments, complete or partial.
pub mod assignment;
/// Validated run configuration shared by the driver and its embedders.
pub mod config;
/// The three GASAT crossover operators: CC, CCTM, FF.
pub mod crossover;
/// The GASAT generation loop: selection, crossover, tabu refinement, replace.
pub mod driver;
/// CNF formula representation and DIMACS parsing.
pub mod cnf;
/// The error taxonomy surfaced by the parser and the search engine.
pub mod error;
/// Fitness and improvement: pure functions over (Formula, Assignment).
pub mod fitness;
/// Population creation, elite selection, weakest-replacement.
pub mod population;
/// Tabu-list-guided local search over a single Assignment.
pub mod tabu;

pub use assignment::Assignment;
pub use cnf::Formula;
pub use config::GasatConfig;
pub use crossover::Operator;
pub use driver::{GasatDriver, GenerationEvent, Observer, RunOutcome, TerminalEvent};
pub use error::{FormulaDefect, SolverError};
