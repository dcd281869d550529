//! Process-wide single-active-run guard (`SPEC_FULL.md` §5, §10.7).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use solver::{GasatConfig, GasatDriver, Observer, RunOutcome, SolverError};

/// One process, at most one concurrently active run. Starting a second run
/// while one is active returns `SolverError::AlreadyRunning` rather than
/// queuing or blocking.
pub struct RunController {
    running: AtomicBool,
    stop: Mutex<bool>,
}

impl RunController {
    pub fn new() -> RunController {
        RunController {
            running: AtomicBool::new(false),
            stop: Mutex::new(false),
        }
    }

    /// Runs the driver to completion under the guard, releasing it whether
    /// the run finishes, exhausts its generations, or is cancelled.
    pub fn run(
        &self,
        formula: &solver::Formula,
        config: GasatConfig,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<RunOutcome, SolverError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SolverError::AlreadyRunning);
        }
        *self.stop.lock().unwrap() = false;

        let mut driver = GasatDriver::new(formula, config);
        let result = driver.run(observers, || *self.stop.lock().unwrap());

        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Requests cancellation of the currently active run, if any. Polled
    /// cooperatively by the driver at most once per generation/tabu iteration.
    pub fn request_stop(&self) {
        *self.stop.lock().unwrap() = true;
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for RunController {
    fn default() -> RunController {
        RunController::new()
    }
}
