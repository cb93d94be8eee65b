//! Run configuration.
//!
//! [`RunConfig`] is immutable for a run and read-only to every module.
//! Use [`RunConfig::builder`] to construct instances; validation happens
//! at build time so the hot integration loop never re-checks parameters.

use thiserror::Error;

use crate::quantities::QuantitySlots;

/// Direction of trajectory integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Integrate forward in time.
    #[default]
    Forward,
    /// Integrate backward in time.
    Backward,
}

impl Direction {
    /// Returns the sign of the direction: `1.0` forward, `-1.0` backward.
    #[inline]
    pub fn signum(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Constraint surface a particle is forced onto each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsosurfaceMode {
    /// Constant pressure surface.
    Pressure,
    /// Constant density surface.
    Density,
    /// Constant potential temperature surface.
    PotentialTemperature,
    /// Externally supplied pressure/time track.
    PressureTrack,
}

/// Configuration error raised at build time.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Model time step must be positive and finite.
    #[error("invalid model time step {0}: must be positive and finite")]
    InvalidTimeStep(f64),

    /// Meteorological update interval must be positive and finite.
    #[error("invalid meteorological update interval {0}: must be positive and finite")]
    InvalidMetInterval(f64),

    /// Diagnostics output interval must be non-negative.
    #[error("invalid diagnostics output interval {0}: must be non-negative")]
    InvalidOutputInterval(f64),

    /// A physical coefficient was negative.
    #[error("invalid parameter '{name}': {value} must be non-negative")]
    NegativeParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Immutable configuration of an integration run.
///
/// Time is measured in seconds, pressure in hPa, diffusivities in m^2/s
/// and decay lifetimes in seconds.
///
/// # Examples
///
/// ```rust
/// use tracer_core::config::{Direction, RunConfig};
///
/// let config = RunConfig::builder()
///     .direction(Direction::Forward)
///     .dt_mod(180.0)
///     .dt_met(21_600.0)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.dt_mod(), 180.0);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    direction: Direction,
    t_stop: Option<f64>,
    dt_mod: f64,
    dt_met: f64,
    met_dt_out: f64,
    turb_dx_trop: f64,
    turb_dx_strat: f64,
    turb_dz_trop: f64,
    turb_dz_strat: f64,
    turb_mesox: f64,
    turb_mesoz: f64,
    tdec_trop: f64,
    tdec_strat: f64,
    isosurface: Option<IsosurfaceMode>,
    psc_h2o: Option<f64>,
    psc_hno3: Option<f64>,
    quantities: QuantitySlots,
}

impl RunConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Direction of integration.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Global stop time [s], or `None` to derive it from the ensemble's
    /// particle times at run start.
    #[inline]
    pub fn t_stop(&self) -> Option<f64> {
        self.t_stop
    }

    /// Model time step [s].
    #[inline]
    pub fn dt_mod(&self) -> f64 {
        self.dt_mod
    }

    /// Meteorological field update interval [s]. Sets the correlation
    /// scale of the mesoscale fluctuation process.
    #[inline]
    pub fn dt_met(&self) -> f64 {
        self.dt_met
    }

    /// Diagnostics output interval [s]; zero disables the diagnostics
    /// module.
    #[inline]
    pub fn met_dt_out(&self) -> f64 {
        self.met_dt_out
    }

    /// Tropospheric horizontal diffusivity [m^2/s].
    #[inline]
    pub fn turb_dx_trop(&self) -> f64 {
        self.turb_dx_trop
    }

    /// Stratospheric horizontal diffusivity [m^2/s].
    #[inline]
    pub fn turb_dx_strat(&self) -> f64 {
        self.turb_dx_strat
    }

    /// Tropospheric vertical diffusivity [m^2/s].
    #[inline]
    pub fn turb_dz_trop(&self) -> f64 {
        self.turb_dz_trop
    }

    /// Stratospheric vertical diffusivity [m^2/s].
    #[inline]
    pub fn turb_dz_strat(&self) -> f64 {
        self.turb_dz_strat
    }

    /// Horizontal mesoscale fluctuation coefficient (fraction of the
    /// local wind variability).
    #[inline]
    pub fn turb_mesox(&self) -> f64 {
        self.turb_mesox
    }

    /// Vertical mesoscale fluctuation coefficient.
    #[inline]
    pub fn turb_mesoz(&self) -> f64 {
        self.turb_mesoz
    }

    /// Tropospheric decay lifetime [s]; decay is active only when both
    /// lifetimes are positive and a mass column exists.
    #[inline]
    pub fn tdec_trop(&self) -> f64 {
        self.tdec_trop
    }

    /// Stratospheric decay lifetime [s].
    #[inline]
    pub fn tdec_strat(&self) -> f64 {
        self.tdec_strat
    }

    /// Isosurface constraint mode, if enabled.
    #[inline]
    pub fn isosurface(&self) -> Option<IsosurfaceMode> {
        self.isosurface
    }

    /// Fixed water vapour volume mixing ratio for polar stratospheric
    /// cloud diagnostics; `None` uses the interpolated humidity.
    #[inline]
    pub fn psc_h2o(&self) -> Option<f64> {
        self.psc_h2o
    }

    /// Fixed nitric acid volume mixing ratio for polar stratospheric
    /// cloud diagnostics; `None` uses the climatology.
    #[inline]
    pub fn psc_hno3(&self) -> Option<f64> {
        self.psc_hno3
    }

    /// Resolved quantity-column mapping.
    #[inline]
    pub fn quantities(&self) -> &QuantitySlots {
        &self.quantities
    }

    /// Returns true if any turbulent diffusivity is positive.
    #[inline]
    pub fn turbulence_enabled(&self) -> bool {
        self.turb_dx_trop > 0.0
            || self.turb_dz_trop > 0.0
            || self.turb_dx_strat > 0.0
            || self.turb_dz_strat > 0.0
    }

    /// Returns true if any mesoscale fluctuation coefficient is positive.
    #[inline]
    pub fn mesoscale_enabled(&self) -> bool {
        self.turb_mesox > 0.0 || self.turb_mesoz > 0.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt_mod > 0.0 && self.dt_mod.is_finite()) {
            return Err(ConfigError::InvalidTimeStep(self.dt_mod));
        }
        if !(self.dt_met > 0.0 && self.dt_met.is_finite()) {
            return Err(ConfigError::InvalidMetInterval(self.dt_met));
        }
        if !(self.met_dt_out >= 0.0 && self.met_dt_out.is_finite()) {
            return Err(ConfigError::InvalidOutputInterval(self.met_dt_out));
        }
        for (name, value) in [
            ("turb_dx_trop", self.turb_dx_trop),
            ("turb_dx_strat", self.turb_dx_strat),
            ("turb_dz_trop", self.turb_dz_trop),
            ("turb_dz_strat", self.turb_dz_strat),
            ("turb_mesox", self.turb_mesox),
            ("turb_mesoz", self.turb_mesoz),
            ("tdec_trop", self.tdec_trop),
            ("tdec_strat", self.tdec_strat),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::NegativeParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Builder for [`RunConfig`].
///
/// Coefficient defaults follow the reference control settings: 50 m^2/s
/// tropospheric horizontal diffusivity, 0.1 m^2/s stratospheric vertical
/// diffusivity, mesoscale coefficients 0.16, decay disabled.
#[derive(Clone, Debug)]
pub struct RunConfigBuilder {
    direction: Direction,
    t_stop: Option<f64>,
    dt_mod: Option<f64>,
    dt_met: Option<f64>,
    met_dt_out: f64,
    turb_dx_trop: f64,
    turb_dx_strat: f64,
    turb_dz_trop: f64,
    turb_dz_strat: f64,
    turb_mesox: f64,
    turb_mesoz: f64,
    tdec_trop: f64,
    tdec_strat: f64,
    isosurface: Option<IsosurfaceMode>,
    psc_h2o: Option<f64>,
    psc_hno3: Option<f64>,
    quantities: QuantitySlots,
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            t_stop: None,
            dt_mod: None,
            dt_met: None,
            met_dt_out: 0.0,
            turb_dx_trop: 50.0,
            turb_dx_strat: 0.0,
            turb_dz_trop: 0.0,
            turb_dz_strat: 0.1,
            turb_mesox: 0.16,
            turb_mesoz: 0.16,
            tdec_trop: 0.0,
            tdec_strat: 0.0,
            isosurface: None,
            psc_h2o: None,
            psc_hno3: None,
            quantities: QuantitySlots::default(),
        }
    }
}

impl RunConfigBuilder {
    /// Sets the direction of integration.
    #[inline]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the global stop time [s].
    #[inline]
    pub fn t_stop(mut self, t_stop: f64) -> Self {
        self.t_stop = Some(t_stop);
        self
    }

    /// Sets the model time step [s].
    #[inline]
    pub fn dt_mod(mut self, dt_mod: f64) -> Self {
        self.dt_mod = Some(dt_mod);
        self
    }

    /// Sets the meteorological field update interval [s].
    #[inline]
    pub fn dt_met(mut self, dt_met: f64) -> Self {
        self.dt_met = Some(dt_met);
        self
    }

    /// Sets the diagnostics output interval [s]; zero disables the
    /// diagnostics module.
    #[inline]
    pub fn met_dt_out(mut self, met_dt_out: f64) -> Self {
        self.met_dt_out = met_dt_out;
        self
    }

    /// Sets the turbulent diffusivities [m^2/s]: horizontal and vertical,
    /// tropospheric and stratospheric.
    #[inline]
    pub fn turbulence(mut self, dx_trop: f64, dx_strat: f64, dz_trop: f64, dz_strat: f64) -> Self {
        self.turb_dx_trop = dx_trop;
        self.turb_dx_strat = dx_strat;
        self.turb_dz_trop = dz_trop;
        self.turb_dz_strat = dz_strat;
        self
    }

    /// Sets the mesoscale fluctuation coefficients (horizontal, vertical).
    #[inline]
    pub fn mesoscale(mut self, mesox: f64, mesoz: f64) -> Self {
        self.turb_mesox = mesox;
        self.turb_mesoz = mesoz;
        self
    }

    /// Sets the decay lifetimes [s] (tropospheric, stratospheric).
    #[inline]
    pub fn decay(mut self, tdec_trop: f64, tdec_strat: f64) -> Self {
        self.tdec_trop = tdec_trop;
        self.tdec_strat = tdec_strat;
        self
    }

    /// Enables the isosurface constraint.
    #[inline]
    pub fn isosurface(mut self, mode: IsosurfaceMode) -> Self {
        self.isosurface = Some(mode);
        self
    }

    /// Fixes the water vapour volume mixing ratio used by the polar
    /// stratospheric cloud diagnostics.
    #[inline]
    pub fn psc_h2o(mut self, vmr: f64) -> Self {
        self.psc_h2o = Some(vmr);
        self
    }

    /// Fixes the nitric acid volume mixing ratio used by the polar
    /// stratospheric cloud diagnostics.
    #[inline]
    pub fn psc_hno3(mut self, vmr: f64) -> Self {
        self.psc_hno3 = Some(vmr);
        self
    }

    /// Sets the resolved quantity-column mapping.
    #[inline]
    pub fn quantities(mut self, quantities: QuantitySlots) -> Self {
        self.quantities = quantities;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `dt_mod` or `dt_met` is missing or
    /// non-positive, or any coefficient is negative or non-finite.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let config = RunConfig {
            direction: self.direction,
            t_stop: self.t_stop,
            dt_mod: self.dt_mod.ok_or(ConfigError::InvalidTimeStep(f64::NAN))?,
            dt_met: self.dt_met.ok_or(ConfigError::InvalidMetInterval(f64::NAN))?,
            met_dt_out: self.met_dt_out,
            turb_dx_trop: self.turb_dx_trop,
            turb_dx_strat: self.turb_dx_strat,
            turb_dz_trop: self.turb_dz_trop,
            turb_dz_strat: self.turb_dz_strat,
            turb_mesox: self.turb_mesox,
            turb_mesoz: self.turb_mesoz,
            tdec_trop: self.tdec_trop,
            tdec_strat: self.tdec_strat,
            isosurface: self.isosurface,
            psc_h2o: self.psc_h2o,
            psc_hno3: self.psc_hno3,
            quantities: self.quantities,
        };
        config.validate()?;
        Ok(config)
    }
}
