//! Optional SVG rendering of the best-fitness-per-generation curve.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

/// Renders `history` (one `(generation, best_fitness)` pair per generation)
/// as a convergence curve.
pub fn plot_convergence(
    history: &[(usize, usize)],
    path: impl AsRef<Path>,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let drawing_area = SVGBackend::new(path.as_ref(), size).into_drawing_area();
    drawing_area.fill(&WHITE)?;

    let max_generation = history.iter().map(|(g, _)| *g).max().unwrap_or(1);
    let max_fitness = history.iter().map(|(_, f)| *f).max().unwrap_or(1);

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption("GASAT convergence", ("sans-serif", 20))
        .x_label_area_size(30)
        .y_label_area_size(50)
        .margin(20)
        .build_cartesian_2d(0..max_generation, 0..max_fitness)?;

    chart
        .configure_mesh()
        .x_desc("generation")
        .y_desc("best fitness (unsatisfied clauses)")
        .draw()?;

    chart.draw_series(LineSeries::new(history.iter().copied(), &RED))?;

    Ok(())
}
