//! Position and boundary enforcement.
//!
//! Runs twice per step, before and after the dynamical modules.
//! Longitude/latitude are wrapped back into range, with latitude
//! reflected across the poles (flipping longitude by 180 degrees); the
//! pressure coordinate is clamped against the model top and, near the
//! ground, against the interpolated surface pressure. Domain excursions
//! are corrections, never errors.

use rayon::prelude::*;

use tracer_core::ensemble::Ensemble;
use tracer_core::met::{MetSampler, SnapshotPair};

/// Pressure threshold [hPa] above which the surface-pressure clamp is
/// evaluated.
const SURFACE_CHECK_PRESSURE: f64 = 300.0;

/// Wraps and clamps the position of every particle with a nonzero time
/// increment.
pub fn check_position<S: MetSampler>(
    sampler: &S,
    pair: SnapshotPair<'_>,
    ensemble: &mut Ensemble,
    dt: &[f64],
) {
    let p_top = pair.first.top_pressure();

    (
        ensemble.time.par_iter(),
        ensemble.lon.par_iter_mut(),
        ensemble.lat.par_iter_mut(),
        ensemble.p.par_iter_mut(),
        dt.par_iter(),
    )
        .into_par_iter()
        .for_each(|(&time, lon, lat, p, &dt)| {
            if dt == 0.0 {
                return;
            }

            *lon %= 360.0;
            *lat %= 360.0;

            // A single reflection may still be out of range for very
            // large excursions.
            while *lat < -90.0 || *lat > 90.0 {
                if *lat > 90.0 {
                    *lat = 180.0 - *lat;
                    *lon += 180.0;
                }
                if *lat < -90.0 {
                    *lat = -180.0 - *lat;
                    *lon += 180.0;
                }
            }

            while *lon < -180.0 {
                *lon += 360.0;
            }
            while *lon >= 180.0 {
                *lon -= 360.0;
            }

            if *p < p_top {
                *p = p_top;
            } else if *p > SURFACE_CHECK_PRESSURE {
                let ps = sampler.surface_pressure(pair, time, *p, *lon, *lat);
                if *p > ps {
                    *p = ps;
                }
            }
        });
}
