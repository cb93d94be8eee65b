//! Coordinate and unit conversion maths.
//!
//! These helpers map metric displacements onto the spherical
//! longitude/latitude grid and onto the pressure coordinate, and provide
//! the tropopause-relative blend weight shared by the turbulence and
//! decay modules.

use num_traits::Float;

use crate::constants::{EARTH_RADIUS, KAPPA, P_REF, SCALE_HEIGHT, TROPO_LAYER};

/// Converts a zonal displacement [km] into degrees of longitude at the
/// given latitude [deg].
///
/// The meridian scaling shrinks with `cos(lat)`; callers must keep the
/// latitude away from the poles (the position module reflects particles
/// back into range each step).
#[inline]
pub fn dx2deg(dx: f64, lat: f64) -> f64 {
    dx * 180.0 / (std::f64::consts::PI * EARTH_RADIUS * (lat.to_radians()).cos())
}

/// Converts a meridional displacement [km] into degrees of latitude.
#[inline]
pub fn dy2deg(dy: f64) -> f64 {
    dy * 180.0 / (std::f64::consts::PI * EARTH_RADIUS)
}

/// Converts a vertical displacement [km] at pressure `p` [hPa] into a
/// pressure change [hPa], using the constant-scale-height approximation.
///
/// Upward displacements (positive `dz`) reduce pressure.
#[inline]
pub fn dz2dp(dz: f64, p: f64) -> f64 {
    -dz * p / SCALE_HEIGHT
}

/// Potential temperature [K] at pressure `p` [hPa] and temperature `t` [K].
#[inline]
pub fn theta(p: f64, t: f64) -> f64 {
    t * (P_REF / p).powf(KAPPA)
}

/// Pressure [hPa] on the isentrope with potential temperature `th` [K]
/// and local temperature `t` [K]. Inverse of [`theta`].
#[inline]
pub fn theta2p(th: f64, t: f64) -> f64 {
    P_REF * (th / t).powf(-1.0 / KAPPA)
}

/// Linear interpolation through the points `(x0, y0)` and `(x1, y1)`.
#[inline]
pub fn lin<T: Float>(x0: T, y0: T, x1: T, y1: T, x: T) -> T {
    y0 + (y1 - y0) / (x1 - x0) * (x - x0)
}

/// Tropopause-relative blend weight.
///
/// Returns 1 for pressures denser than `pt / TROPO_LAYER` (troposphere),
/// 0 for pressures lighter than `pt * TROPO_LAYER` (stratosphere), and a
/// linear ramp in between. `pt` is the local tropopause pressure [hPa].
#[inline]
pub fn tropo_weight(p: f64, pt: f64) -> f64 {
    let p1 = pt * TROPO_LAYER;
    let p0 = pt / TROPO_LAYER;
    if p > p0 {
        1.0
    } else if p < p1 {
        0.0
    } else {
        lin(p0, 1.0, p1, 0.0, p)
    }
}

/// Sample standard deviation of a slice.
///
/// Returns 0 for slices with fewer than two elements.
pub fn stddev(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let var = data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}
