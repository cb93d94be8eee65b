//! Exponential decay of particle mass.
//!
//! The lifetime blends between tropospheric and stratospheric values
//! with the same tropopause-relative weight the turbulence module uses.

use rayon::prelude::*;

use tracer_core::config::RunConfig;
use tracer_core::ensemble::Ensemble;
use tracer_core::math::tropo_weight;
use tracer_core::met::Climatology;

/// Attenuates the mass column of every particle with a nonzero time
/// increment: `mass *= exp(-dt / tdec)` with the blended lifetime.
///
/// `mass_col` is the resolved mass column; the orchestrator only calls
/// this module when the column exists and both lifetimes are positive.
pub fn decay<C: Climatology>(
    config: &RunConfig,
    clim: &C,
    ensemble: &mut Ensemble,
    mass_col: usize,
    dt: &[f64],
) {
    let time = ensemble.time.clone();
    let lat = ensemble.lat.clone();
    let p = ensemble.p.clone();

    (
        ensemble.q_mut(mass_col).par_iter_mut(),
        time.par_iter(),
        lat.par_iter(),
        p.par_iter(),
        dt.par_iter(),
    )
        .into_par_iter()
        .for_each(|(mass, &time, &lat, &p, &dt)| {
            if dt == 0.0 {
                return;
            }

            let pt = clim.tropopause_pressure(time, lat);
            let w = tropo_weight(p, pt);
            let tdec = w * config.tdec_trop() + (1.0 - w) * config.tdec_strat();

            *mass *= (-dt / tdec).exp();
        });
}
