//! Turbulent diffusion.
//!
//! Uncorrelated Gaussian displacements with diffusivities blended
//! between tropospheric and stratospheric values by the
//! tropopause-relative weight. Requires one standard-normal triple per
//! particle, drawn immediately before the pass.

use rayon::prelude::*;

use tracer_core::config::RunConfig;
use tracer_core::ensemble::Ensemble;
use tracer_core::math::{dx2deg, dy2deg, dz2dp, tropo_weight};
use tracer_core::met::Climatology;

/// Applies turbulent diffusion to every particle with a nonzero time
/// increment.
///
/// `rs` holds one standard-normal triple per particle. With horizontal
/// diffusivity `D` the displacement standard deviation is
/// `sqrt(2 D |dt|)`; vertical displacements pass through the
/// metres-to-pressure conversion.
pub fn diffuse<C: Climatology>(
    config: &RunConfig,
    clim: &C,
    ensemble: &mut Ensemble,
    dt: &[f64],
    rs: &[f64],
) {
    (
        ensemble.time.par_iter(),
        ensemble.lon.par_iter_mut(),
        ensemble.lat.par_iter_mut(),
        ensemble.p.par_iter_mut(),
        dt.par_iter(),
        rs.par_chunks_exact(3),
    )
        .into_par_iter()
        .for_each(|(&time, lon, lat, p, &dt, rs)| {
            if dt == 0.0 {
                return;
            }

            let pt = clim.tropopause_pressure(time, *lat);
            let w = tropo_weight(*p, pt);

            let dx = w * config.turb_dx_trop() + (1.0 - w) * config.turb_dx_strat();
            let dz = w * config.turb_dz_trop() + (1.0 - w) * config.turb_dz_strat();

            if dx > 0.0 {
                let sigma = (2.0 * dx * dt.abs()).sqrt();
                *lon += dx2deg(rs[0] * sigma / 1000.0, *lat);
                *lat += dy2deg(rs[1] * sigma / 1000.0);
            }

            if dz > 0.0 {
                let sigma = (2.0 * dz * dt.abs()).sqrt();
                *p += dz2dp(rs[2] * sigma / 1000.0, *p);
            }
        });
}
