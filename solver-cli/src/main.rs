mod cli;
mod controller;
mod plot;

use std::cell::RefCell;
use std::fs;
use std::process::exit;
use std::rc::Rc;

use solver::{Formula, GenerationEvent, Observer, RunOutcome, TerminalEvent};

use controller::RunController;

/// Renders a one-line progress update per generation, gated behind
/// `--verbose`, and collects the best-fitness history for `--plot` into a
/// handle `main` keeps after the observer itself is moved into the driver.
struct ConsoleObserver {
    verbose: bool,
    history: Rc<RefCell<Vec<(usize, usize)>>>,
}

impl Observer for ConsoleObserver {
    fn on_generation(&mut self, event: &GenerationEvent) {
        self.history.borrow_mut().push((event.generation, event.best_fitness));
        if self.verbose {
            println!(
                "generation {}/{}: best={} ({}/{} clauses satisfied), child={} ({}/{})",
                event.generation,
                event.max_generations,
                event.best_fitness,
                event.clauses_satisfied_by_best,
                event.num_clauses,
                event.current_child_fitness,
                event.clauses_satisfied_by_child,
                event.num_clauses,
            );
        }
    }

    fn on_terminal(&mut self, event: &TerminalEvent) {
        if self.verbose {
            let elapsed = event.end_time.duration_since(event.start_time);
            eprintln!(
                "run finished after {} generations in {:.2?}: solved={} final_fitness={}",
                event.generation, elapsed, event.solved, event.final_fitness
            );
        }
    }
}

fn main() {
    pretty_env_logger::init();
    let args = cli::parse_args();

    let config = match args.config.validate() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bad configuration: {}", err);
            exit(2);
        }
    };

    let text = match fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("could not read {}: {}", args.input, err);
            exit(2);
        }
    };

    let formula: Formula = match Formula::from_dimacs(&text) {
        Ok(formula) => formula,
        Err(err) => {
            eprintln!("{}", err);
            exit(2);
        }
    };

    let controller = RunController::new();
    let history = Rc::new(RefCell::new(Vec::new()));
    let observer = Box::new(ConsoleObserver {
        verbose: args.verbose,
        history: history.clone(),
    });
    let mut observers: Vec<Box<dyn Observer>> = vec![observer];

    let outcome = match controller.run(&formula, config, &mut observers) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{}", err);
            exit(2);
        }
    };

    if let Some(plot_path) = &args.plot {
        if let Err(err) = plot::plot_convergence(history.borrow().as_slice(), plot_path, (1280, 720)) {
            eprintln!("could not render convergence plot: {}", err);
        }
    }

    let assignment = outcome.assignment();
    match &outcome {
        RunOutcome::Satisfied(_) => {
            println!("s SATISFIABLE");
            print_valuation(assignment);
            exit(0);
        }
        RunOutcome::Exhausted(_) | RunOutcome::Cancelled(_) => {
            println!("s UNKNOWN");
            print_valuation(assignment);
            exit(1);
        }
    }
}

fn print_valuation(assignment: &solver::Assignment) {
    print!("v");
    for v in 1..=assignment.len() {
        let bit = if assignment.get(v) { v as i64 } else { -(v as i64) };
        print!(" {}", bit);
    }
    println!(" 0");
}
