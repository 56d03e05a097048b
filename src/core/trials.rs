use rayon::prelude::*;

use super::errors::SimError;
use super::model::{Model, RunReport};

/// Build and run `n` independent replications in parallel, one model per
/// trial. Each trial gets its own model from the factory (seed variation
/// is the factory's business), so no state is shared across runs; a
/// single run remains strictly single-threaded. Reports come back in
/// trial order.
pub fn run_trials<F>(n: usize, factory: F) -> Result<Vec<RunReport>, SimError>
where
    F: Fn(usize) -> Result<Model, SimError> + Sync,
{
    (0..n)
        .into_par_iter()
        .map(|trial| {
            let mut model = factory(trial)?;
            model.run()
        })
        .collect()
}
