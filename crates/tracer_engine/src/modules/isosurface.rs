//! Isosurface constraint.
//!
//! Two-phase module: [`Isosurface::init`] runs once before the time loop
//! and captures each particle's target surface value; the per-step
//! [`Isosurface::enforce`] overwrites the particle's pressure to satisfy
//! that target. Enforcement is a constraint, not an incremental process,
//! so it runs for every particle each step regardless of its time
//! increment.

use std::io::BufRead;

use rayon::prelude::*;

use crate::error::EngineError;
use tracer_core::config::IsosurfaceMode;
use tracer_core::ensemble::Ensemble;
use tracer_core::grid::locate_irr;
use tracer_core::math::{lin, theta, theta2p};
use tracer_core::met::{MetSampler, SnapshotPair};

/// Maximum number of samples in an external pressure track.
pub const MAX_TRACK_POINTS: usize = 10_000_000;

/// Externally supplied pressure/time series with a monotonic time axis.
#[derive(Clone, Debug)]
pub struct PressureTrack {
    times: Vec<f64>,
    pressures: Vec<f64>,
}

impl PressureTrack {
    /// Builds a track from `(time, pressure)` samples. The time axis
    /// must be strictly increasing; interpolation relies on it.
    ///
    /// # Errors
    ///
    /// Fails if the series is empty, exceeds [`MAX_TRACK_POINTS`], or
    /// has an unordered time axis.
    pub fn new(samples: Vec<(f64, f64)>) -> Result<Self, EngineError> {
        if samples.is_empty() {
            return Err(EngineError::EmptyTrack);
        }
        if samples.len() > MAX_TRACK_POINTS {
            return Err(EngineError::TrackOverflow(MAX_TRACK_POINTS));
        }
        if samples.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(EngineError::UnorderedTrack);
        }
        let (times, pressures) = samples.into_iter().unzip();
        Ok(Self { times, pressures })
    }

    /// Reads a track from whitespace-separated `time pressure` lines.
    /// Lines that do not parse as two numbers are skipped.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, an empty series, an unordered time axis, or
    /// capacity overflow.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, EngineError> {
        let mut samples = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let mut fields = line.split_whitespace();
            if let (Some(t), Some(p)) = (fields.next(), fields.next()) {
                if let (Ok(t), Ok(p)) = (t.parse::<f64>(), p.parse::<f64>()) {
                    samples.push((t, p));
                    if samples.len() > MAX_TRACK_POINTS {
                        return Err(EngineError::TrackOverflow(MAX_TRACK_POINTS));
                    }
                }
            }
        }
        Self::new(samples)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the track holds no samples (never the case for a
    /// successfully constructed track).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Track pressure at the given time: clamped at the endpoints,
    /// linearly interpolated between bracketing samples.
    pub fn pressure_at(&self, time: f64) -> f64 {
        let n = self.times.len();
        if time <= self.times[0] {
            self.pressures[0]
        } else if time >= self.times[n - 1] {
            self.pressures[n - 1]
        } else {
            let i = locate_irr(&self.times, time);
            lin(
                self.times[i],
                self.pressures[i],
                self.times[i + 1],
                self.pressures[i + 1],
                time,
            )
        }
    }
}

/// The initialised isosurface constraint.
pub struct Isosurface {
    mode: IsosurfaceMode,
    targets: Vec<f64>,
    track: Option<PressureTrack>,
}

impl Isosurface {
    /// Captures each particle's target surface value.
    ///
    /// Modes: pressure saves the current pressure; density saves
    /// pressure/temperature; potential temperature saves theta; the
    /// track mode takes the externally supplied series instead of
    /// per-particle targets.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::MissingTrack`] if the track mode is
    /// requested without a track.
    pub fn init<S: MetSampler>(
        mode: IsosurfaceMode,
        sampler: &S,
        pair: SnapshotPair<'_>,
        ensemble: &Ensemble,
        track: Option<PressureTrack>,
    ) -> Result<Self, EngineError> {
        let targets = match mode {
            IsosurfaceMode::Pressure => ensemble.p.clone(),
            IsosurfaceMode::Density => (
                ensemble.time.par_iter(),
                ensemble.lon.par_iter(),
                ensemble.lat.par_iter(),
                ensemble.p.par_iter(),
            )
                .into_par_iter()
                .map(|(&time, &lon, &lat, &p)| p / sampler.temperature(pair, time, p, lon, lat))
                .collect(),
            IsosurfaceMode::PotentialTemperature => (
                ensemble.time.par_iter(),
                ensemble.lon.par_iter(),
                ensemble.lat.par_iter(),
                ensemble.p.par_iter(),
            )
                .into_par_iter()
                .map(|(&time, &lon, &lat, &p)| {
                    theta(p, sampler.temperature(pair, time, p, lon, lat))
                })
                .collect(),
            IsosurfaceMode::PressureTrack => Vec::new(),
        };

        let track = match mode {
            IsosurfaceMode::PressureTrack => Some(track.ok_or(EngineError::MissingTrack)?),
            _ => track,
        };

        Ok(Self {
            mode,
            targets,
            track,
        })
    }

    /// Constraint mode.
    #[inline]
    pub fn mode(&self) -> IsosurfaceMode {
        self.mode
    }

    /// Forces every particle back onto its surface, overwriting its
    /// pressure. Runs unconditionally; not gated by the per-particle
    /// time increment.
    pub fn enforce<S: MetSampler>(
        &self,
        sampler: &S,
        pair: SnapshotPair<'_>,
        ensemble: &mut Ensemble,
    ) {
        match self.mode {
            IsosurfaceMode::Pressure => {
                ensemble
                    .p
                    .par_iter_mut()
                    .zip(self.targets.par_iter())
                    .for_each(|(p, &target)| *p = target);
            }
            IsosurfaceMode::Density => {
                self.enforce_sampled(sampler, pair, ensemble, |target, t| target * t);
            }
            IsosurfaceMode::PotentialTemperature => {
                self.enforce_sampled(sampler, pair, ensemble, theta2p);
            }
            IsosurfaceMode::PressureTrack => {
                let track = self
                    .track
                    .as_ref()
                    .expect("track mode initialised with a track");
                ensemble
                    .p
                    .par_iter_mut()
                    .zip(ensemble.time.par_iter())
                    .for_each(|(p, &time)| *p = track.pressure_at(time));
            }
        }
    }

    fn enforce_sampled<S: MetSampler>(
        &self,
        sampler: &S,
        pair: SnapshotPair<'_>,
        ensemble: &mut Ensemble,
        restore: impl Fn(f64, f64) -> f64 + Sync,
    ) {
        (
            ensemble.time.par_iter(),
            ensemble.lon.par_iter(),
            ensemble.lat.par_iter(),
            ensemble.p.par_iter_mut(),
            self.targets.par_iter(),
        )
            .into_par_iter()
            .for_each(|(&time, &lon, &lat, p, &target)| {
                let t = sampler.temperature(pair, time, *p, lon, lat);
                *p = restore(target, t);
            });
    }
}
