//! Mesoscale diffusion.
//!
//! Temporally correlated wind fluctuations modelled as a first-order
//! autoregressive process. The fluctuation amplitude scales with the
//! local wind variability read from the per-cell cache; the fluctuation
//! state lives on the particle and persists across steps, which is what
//! gives the process memory.

use rayon::prelude::*;

use crate::cache::WindVariability;
use tracer_core::config::RunConfig;
use tracer_core::ensemble::Ensemble;
use tracer_core::grid::{locate_irr, locate_reg};
use tracer_core::math::{dx2deg, dy2deg};
use tracer_core::met::SnapshotPair;

/// Applies mesoscale wind fluctuations to every particle with a nonzero
/// time increment.
///
/// The autoregressive correlation is `r = 1 - 2 |dt| / dt_met`, the
/// innovation scale `sqrt(1 - r^2)`. Horizontal fluctuations perturb
/// longitude/latitude through the metric conversion; the vertical
/// fluctuation adds to pressure directly, accumulating like a fall
/// velocity.
pub fn diffuse(
    config: &RunConfig,
    pair: SnapshotPair<'_>,
    cache: &WindVariability,
    ensemble: &mut Ensemble,
    dt: &[f64],
    rs: &[f64],
) {
    (
        ensemble.lon.par_iter_mut(),
        ensemble.lat.par_iter_mut(),
        ensemble.p.par_iter_mut(),
        ensemble.up.par_iter_mut(),
        ensemble.vp.par_iter_mut(),
        ensemble.wp.par_iter_mut(),
        dt.par_iter(),
        rs.par_chunks_exact(3),
    )
        .into_par_iter()
        .for_each(|(lon, lat, p, up, vp, wp, &dt, rs)| {
            if dt == 0.0 {
                return;
            }

            let met0 = pair.first;
            let ix = locate_reg(&met0.lons, *lon);
            let iy = locate_reg(&met0.lats, *lat);
            let iz = locate_irr(&met0.levels, *p);

            let (usig, vsig, wsig) = cache.fetch(pair, ix, iy, iz);

            // Temporal correlation over the fraction of the field update
            // interval this step covers.
            let r = 1.0 - 2.0 * dt.abs() / config.dt_met();
            let r2 = (1.0 - r * r).sqrt();

            if config.turb_mesox() > 0.0 {
                *up = r * *up + r2 * rs[0] * config.turb_mesox() * usig;
                *lon += dx2deg(*up * dt / 1000.0, *lat);

                *vp = r * *vp + r2 * rs[1] * config.turb_mesox() * vsig;
                *lat += dy2deg(*vp * dt / 1000.0);
            }

            if config.turb_mesoz() > 0.0 {
                *wp = r * *wp + r2 * rs[2] * config.turb_mesoz() * wsig;
                *p += *wp * dt;
            }
        });
}
