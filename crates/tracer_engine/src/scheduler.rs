//! Per-particle timestep scheduler.
//!
//! Particles carry their own native times, which may lag the global
//! clock (e.g. staggered release times). Each step, every particle gets
//! the signed increment that brings it exactly to the global time, or
//! zero if it is outside its validity window or already caught up. A
//! zero increment makes every dt-gated module skip the particle, which
//! is how particles with different offsets stay in lock-step with the
//! global loop.

use rayon::prelude::*;

use tracer_core::config::RunConfig;

/// Computes the signed per-particle time increments for the step ending
/// at global time `t`, writing them into `dt`.
///
/// A particle receives `t - time[i]` if its time lies within
/// `[t_start, t_stop]` (direction-aware) and strictly before `t` in the
/// direction of travel; otherwise zero.
///
/// # Panics
///
/// Panics if `dt` and `times` have different lengths.
pub fn compute_timesteps(
    config: &RunConfig,
    t_start: f64,
    t_stop: f64,
    t: f64,
    times: &[f64],
    dt: &mut [f64],
) {
    assert_eq!(times.len(), dt.len());
    let dir = config.direction().signum();

    times
        .par_iter()
        .zip(dt.par_iter_mut())
        .for_each(|(&time, dt)| {
            let in_window = dir * (time - t_start) >= 0.0 && dir * (time - t_stop) <= 0.0;
            *dt = if in_window && dir * (time - t) < 0.0 {
                t - time
            } else {
                0.0
            };
        });
}
