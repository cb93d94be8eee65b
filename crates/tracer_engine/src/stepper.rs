//! Run orchestration.
//!
//! [`Stepper`] owns the collaborators and drives the global time loop.
//! Each step applies the physics modules in a fixed order:
//! timestep scheduling, position check, advection, turbulent diffusion,
//! mesoscale diffusion, sedimentation, isosurface enforcement, a second
//! position check, diagnostics, decay, and finally the output handoff.
//! Module activation is decided once per step from the configuration and
//! the resolved quantity columns, never per particle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::WindVariability;
use crate::error::EngineError;
use crate::modules::isosurface::{Isosurface, PressureTrack};
use crate::modules::{advection, decay, diagnostics, mesoscale, position, sedimentation, turbulence};
use crate::rng::RngPool;
use crate::scheduler;
use tracer_core::config::RunConfig;
use tracer_core::ensemble::Ensemble;
use tracer_core::met::{Climatology, MetSampler, MetSnapshot, SnapshotPair};
use tracer_core::quantities::Quantity;

/// Provider of bracketing snapshot pairs.
///
/// Called once per step with the global time; the returned snapshots
/// must bracket it. Implementations typically keep two snapshots loaded
/// and swap in a new one when the time crosses the field interval.
pub trait SnapshotSource {
    /// Returns the snapshot pair bracketing time `t`, leading snapshot
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] when `t` cannot be bracketed.
    fn bracket(&mut self, t: f64) -> Result<(Arc<MetSnapshot>, Arc<MetSnapshot>), EngineError>;
}

/// Consumer of per-step ensemble state.
pub trait OutputSink {
    /// Hands over the ensemble state at the end of the step ending at
    /// global time `t`.
    ///
    /// # Errors
    ///
    /// A sink failure aborts the run.
    fn write(&mut self, t: f64, ensemble: &Ensemble) -> Result<(), EngineError>;
}

/// The integration driver.
///
/// Construct with [`Stepper::new`], optionally attach a pressure track
/// with [`Stepper::with_track`], then call [`Stepper::run`].
pub struct Stepper<Samp, Clim, Src, Snk> {
    config: RunConfig,
    sampler: Samp,
    clim: Clim,
    source: Src,
    sink: Snk,
    cache: WindVariability,
    pool: RngPool,
    isosurface: Option<Isosurface>,
    track: Option<PressureTrack>,
    mass_col: Option<usize>,
    radius_col: Option<usize>,
    density_col: Option<usize>,
}

impl<Samp, Clim, Src, Snk> Stepper<Samp, Clim, Src, Snk>
where
    Samp: MetSampler,
    Clim: Climatology,
    Src: SnapshotSource,
    Snk: OutputSink,
{
    /// Creates a stepper with one random stream per worker thread.
    ///
    /// # Errors
    ///
    /// Fails if the worker count exceeds the random stream pool
    /// capacity.
    pub fn new(
        config: RunConfig,
        sampler: Samp,
        clim: Clim,
        source: Src,
        sink: Snk,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let pool = RngPool::per_worker(seed)?;
        let slots = config.quantities();
        let mass_col = slots.get(Quantity::Mass);
        let radius_col = slots.get(Quantity::Radius);
        let density_col = slots.get(Quantity::Density);
        Ok(Self {
            config,
            sampler,
            clim,
            source,
            sink,
            cache: WindVariability::new(1, 1, 1),
            pool,
            isosurface: None,
            track: None,
            mass_col,
            radius_col,
            density_col,
        })
    }

    /// Attaches the pressure track used by the track-following
    /// isosurface mode. The stepper keeps the track, so repeated runs
    /// follow the same series.
    pub fn with_track(mut self, track: PressureTrack) -> Self {
        self.track = Some(track);
        self
    }

    /// Run configuration.
    #[inline]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Integrates the ensemble over its full time window.
    ///
    /// The start time is the earliest particle time (latest for backward
    /// runs), rounded to a step-size multiple towards the window
    /// exterior; the stop time comes from the configuration or, when
    /// absent, from the opposite extreme of the particle times. The
    /// final step is clamped to end exactly at the stop time.
    ///
    /// # Errors
    ///
    /// Fails on an ensemble without particles, an empty integration
    /// window, missing snapshot data, a missing pressure track in track
    /// mode, or a sink failure.
    pub fn run(&mut self, ensemble: &mut Ensemble) -> Result<(), EngineError> {
        if ensemble.is_empty() {
            return Err(EngineError::EmptyEnsemble);
        }

        let dir = self.config.direction().signum();
        let dt_mod = self.config.dt_mod();

        let t_min = ensemble.time.iter().cloned().fold(f64::INFINITY, f64::min);
        let t_max = ensemble
            .time
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        let (mut t_start, t_stop) = if dir > 0.0 {
            (t_min, self.config.t_stop().unwrap_or(t_max))
        } else {
            (t_max, self.config.t_stop().unwrap_or(t_min))
        };

        if dir * (t_stop - t_start) <= 0.0 {
            return Err(EngineError::EmptyWindow {
                start: t_start,
                stop: t_stop,
            });
        }

        // Round the start time towards the window exterior so the first
        // step lands on the global step raster.
        t_start = if dir > 0.0 {
            (t_start / dt_mod).floor() * dt_mod
        } else {
            (t_start / dt_mod).ceil() * dt_mod
        };

        info!(
            particles = ensemble.len(),
            t_start, t_stop, "starting integration"
        );

        let (mut met0, mut met1) = self.source.bracket(t_start)?;
        self.cache.ensure_shape(met0.nx(), met0.ny(), met0.nz());

        if met0.lons.len() > 1 && dt_mod > (met0.lons[1] - met0.lons[0]).abs() * 111_132.0 / 150.0 {
            warn!(dt_mod, "time step violates the CFL criterion");
        }

        if let Some(mode) = self.config.isosurface() {
            let pair = SnapshotPair::new(&met0, &met1);
            self.isosurface = Some(Isosurface::init(
                mode,
                &self.sampler,
                pair,
                ensemble,
                self.track.clone(),
            )?);
        }

        let mut dt = vec![0.0; ensemble.len()];
        let mut rs = vec![0.0; 3 * ensemble.len()];

        let mut t = t_start;
        while dir * (t - t_stop) < dt_mod {
            // The last step ends exactly at the stop time.
            if dir * (t - t_stop) > 0.0 {
                t = t_stop;
            }
            debug!(t, "step");

            if t != t_start {
                let (m0, m1) = self.source.bracket(t)?;
                met0 = m0;
                met1 = m1;
                self.cache.ensure_shape(met0.nx(), met0.ny(), met0.nz());
            }
            let pair = SnapshotPair::new(&met0, &met1);

            scheduler::compute_timesteps(&self.config, t_start, t_stop, t, &ensemble.time, &mut dt);

            position::check_position(&self.sampler, pair, ensemble, &dt);

            advection::advect(&self.sampler, pair, ensemble, &dt);

            if self.config.turbulence_enabled() {
                self.pool.fill_normal(&mut rs);
                turbulence::diffuse(&self.config, &self.clim, ensemble, &dt, &rs);
            }

            if self.config.mesoscale_enabled() {
                self.pool.fill_normal(&mut rs);
                mesoscale::diffuse(&self.config, pair, &self.cache, ensemble, &dt, &rs);
            }

            if let (Some(radius_col), Some(density_col)) = (self.radius_col, self.density_col) {
                sedimentation::settle(&self.sampler, pair, ensemble, radius_col, density_col, &dt);
            }

            if let Some(iso) = &self.isosurface {
                iso.enforce(&self.sampler, pair, ensemble);
            }

            position::check_position(&self.sampler, pair, ensemble, &dt);

            let met_dt_out = self.config.met_dt_out();
            if met_dt_out > 0.0 && (met_dt_out < dt_mod || t % met_dt_out == 0.0) {
                diagnostics::sample_meteo(&self.config, &self.sampler, &self.clim, pair, ensemble);
            }

            if let Some(mass_col) = self.mass_col {
                if self.config.tdec_trop() > 0.0 && self.config.tdec_strat() > 0.0 {
                    decay::decay(&self.config, &self.clim, ensemble, mass_col, &dt);
                }
            }

            self.sink.write(t, ensemble)?;

            t += dir * dt_mod;
        }

        info!(t_stop, "integration finished");
        Ok(())
    }
}
