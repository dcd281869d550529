//! Command-line argument parsing: flags/defaults into a `GasatConfig` plus
//! the CLI's own presentation options.

use clap::{App, Arg};
use solver::{GasatConfig, Operator};

pub struct Cli {
    pub input: String,
    pub verbose: bool,
    pub plot: Option<String>,
    pub config: GasatConfig,
}

pub fn parse_args() -> Cli {
    let matches = App::new("gasat")
        .version("0.1.0")
        .author("Alex&Korbi&Radek inc.")
        .about("Hybrid genetic-algorithm + tabu-search SAT solver")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Path to a DIMACS CNF file"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .takes_value(false)
                .help("Print a progress line per generation"),
        )
        .arg(
            Arg::with_name("plot")
                .long("plot")
                .takes_value(true)
                .help("Render the best-fitness convergence curve to this SVG path"),
        )
        .arg(
            Arg::with_name("population_size")
                .long("population-size")
                .takes_value(true)
                .default_value("50"),
        )
        .arg(
            Arg::with_name("sub_population_size")
                .long("sub-population-size")
                .takes_value(true)
                .default_value("10"),
        )
        .arg(
            Arg::with_name("max_generations")
                .long("max-generations")
                .takes_value(true)
                .default_value("200"),
        )
        .arg(
            Arg::with_name("max_flip")
                .long("max-flip")
                .takes_value(true)
                .default_value("500"),
        )
        .arg(
            Arg::with_name("tabu_list_length")
                .long("tabu-list-length")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name("crossover_operator")
                .long("crossover-operator")
                .takes_value(true)
                .default_value("0")
                .help("0=CC, 1=CCTM, 2=FF"),
        )
        .arg(
            Arg::with_name("rvcf")
                .long("rvcf")
                .takes_value(false)
                .help("Use the RVCF choice function instead of Standard"),
        )
        .arg(
            Arg::with_name("diversification")
                .long("diversification")
                .takes_value(false)
                .help("Enable the diversification branch of the tabu search"),
        )
        .arg(
            Arg::with_name("max_false")
                .long("max-false")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name("rec")
                .long("rec")
                .takes_value(true)
                .default_value("2"),
        )
        .arg(Arg::with_name("k").long("k").takes_value(true).default_value("3"))
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("42")
                .help("Seed for the run's single pseudo-random source"),
        )
        .get_matches();

    let parse = |name: &str| -> usize {
        matches
            .value_of(name)
            .unwrap()
            .parse()
            .unwrap_or_else(|_| panic!("--{} must be a non-negative integer", name.replace('_', "-")))
    };

    let operator_id: u8 = parse("crossover_operator") as u8;
    let crossover_operator = Operator::from_id(operator_id)
        .unwrap_or_else(|| panic!("--crossover-operator must be 0, 1, or 2, got {}", operator_id));

    let config = GasatConfig {
        population_size: parse("population_size"),
        sub_population_size: parse("sub_population_size"),
        max_generations: parse("max_generations"),
        max_flip: parse("max_flip"),
        tabu_list_length: parse("tabu_list_length"),
        crossover_operator,
        is_rvcf: matches.is_present("rvcf"),
        is_diversification: matches.is_present("diversification"),
        max_false: parse("max_false") as u32,
        rec: parse("rec"),
        k: parse("k") as u32,
        seed: matches.value_of("seed").unwrap().parse().unwrap_or(42),
    };

    Cli {
        input: matches.value_of("input").unwrap().to_string(),
        verbose: matches.is_present("verbose"),
        plot: matches.value_of("plot").map(String::from),
        config,
    }
}
