//! Gravitational sedimentation.
//!
//! Stokes settling with the Cunningham slip-flow correction
//! (coefficients after Kasten, 1968), evaluated from the interpolated
//! temperature and the particle's radius and density quantities. Pure
//! function of local state; no memory across steps.

use rayon::prelude::*;

use tracer_core::constants::{AIR_MOLECULE_MASS, G0, KB, RA};
use tracer_core::ensemble::Ensemble;
use tracer_core::math::dz2dp;
use tracer_core::met::{MetSampler, SnapshotPair};

/// Cunningham slip-flow correction coefficients (Kasten, 1968).
const CUNNINGHAM_A: f64 = 1.249;
const CUNNINGHAM_B: f64 = 0.42;
const CUNNINGHAM_C: f64 = 0.87;

/// Sedimentation (fall) velocity [m/s] of a spherical particle.
///
/// * `p` - air pressure [hPa]
/// * `t` - temperature [K]
/// * `r_p` - particle radius [micrometre]
/// * `rho_p` - particle density [kg/m^3]
pub fn fall_velocity(p: f64, t: f64, r_p: f64, rho_p: f64) -> f64 {
    // SI units.
    let p_si = 100.0 * p;
    let r_si = 1e-6 * r_p;

    // Density of dry air.
    let rho = p_si / (RA * t);

    // Dynamic viscosity of air.
    let eta = 1.8325e-5 * (416.16 / (t + 120.0)) * (t / 296.16).powf(1.5);

    // Thermal velocity of an air molecule.
    let v = (8.0 * KB * t / (std::f64::consts::PI * AIR_MOLECULE_MASS)).sqrt();

    // Mean free path and Knudsen number.
    let lambda = 2.0 * eta / (rho * v);
    let kn = lambda / r_si;

    // Cunningham slip-flow correction.
    let g = 1.0 + kn * (CUNNINGHAM_A + CUNNINGHAM_B * (-CUNNINGHAM_C / kn).exp());

    2.0 * r_si * r_si * (rho_p - rho) * G0 / (9.0 * eta) * g
}

/// Applies sedimentation to every particle with a nonzero time
/// increment, shifting its pressure by the fall distance over `dt`.
///
/// `radius_col` and `density_col` are the resolved quantity columns; the
/// orchestrator only calls this module when both exist.
pub fn settle<S: MetSampler>(
    sampler: &S,
    pair: SnapshotPair<'_>,
    ensemble: &mut Ensemble,
    radius_col: usize,
    density_col: usize,
    dt: &[f64],
) {
    let (radius, density) = {
        let (a, b) = ensemble.q_pair(radius_col, density_col);
        (a.to_vec(), b.to_vec())
    };

    (
        ensemble.time.par_iter(),
        ensemble.lon.par_iter(),
        ensemble.lat.par_iter(),
        ensemble.p.par_iter_mut(),
        radius.par_iter(),
        density.par_iter(),
        dt.par_iter(),
    )
        .into_par_iter()
        .for_each(|(&time, &lon, &lat, p, &r_p, &rho_p, &dt)| {
            if dt == 0.0 {
                return;
            }

            let t = sampler.temperature(pair, time, *p, lon, lat);
            let v_p = fall_velocity(*p, t, r_p, rho_p);

            // Convert the fall distance to a pressure shift.
            *p += dz2dp(v_p * dt / 1000.0, *p);
        });
}
