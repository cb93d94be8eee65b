//! Physical constants used throughout the transport engine.
//!
//! Units follow the meteorological conventions of the engine: pressure in
//! hPa, horizontal distances in km, time in seconds.

/// Mean radius of the Earth [km].
pub const EARTH_RADIUS: f64 = 6367.421;

/// Scale height of the atmosphere [km].
pub const SCALE_HEIGHT: f64 = 7.0;

/// Reference pressure for potential temperature [hPa].
pub const P_REF: f64 = 1000.0;

/// Standard gravitational acceleration [m/s^2].
pub const G0: f64 = 9.80665;

/// Specific gas constant of dry air [J/(kg K)].
pub const RA: f64 = 287.058;

/// Boltzmann constant [kg m^2/(K s^2)].
pub const KB: f64 = 1.3806504e-23;

/// Poisson exponent (R/c_p) of dry air.
pub const KAPPA: f64 = 0.286;

/// Fixed log-pressure offset from the tropopause used to blend
/// tropospheric and stratospheric coefficients.
///
/// The blend weight is 1 below `pt / TROPO_LAYER` and 0 above
/// `pt * TROPO_LAYER` (in altitude terms), with the transition linear in
/// pressure between the two thresholds.
pub const TROPO_LAYER: f64 = 0.866877899;

/// Conversion factor from hPa to torr.
pub const HPA_TO_TORR: f64 = 1.333224;

/// Average mass of an air molecule [kg].
pub const AIR_MOLECULE_MASS: f64 = 4.8096e-26;
