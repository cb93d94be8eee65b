//! Error types for the integration engine.
//!
//! The engine has no retry policy: every variant here is fatal for the
//! run. Physical-domain excursions are never errors; the position module
//! corrects them in place each step.

use thiserror::Error;

use crate::rng::MAX_STREAMS;
use tracer_core::config::ConfigError;

/// Fatal engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The ensemble holds no particles: nothing to do.
    #[error("ensemble holds no particles")]
    EmptyEnsemble,

    /// The integration window is empty: nothing to do.
    #[error("empty integration window: start {start}, stop {stop}")]
    EmptyWindow {
        /// Derived start time [s].
        start: f64,
        /// Derived stop time [s].
        stop: f64,
    },

    /// Requested more random streams than the pool supports.
    #[error("worker count {0} exceeds random stream pool capacity {MAX_STREAMS}")]
    TooManyStreams(usize),

    /// The external pressure track contained no samples.
    #[error("pressure track is empty")]
    EmptyTrack,

    /// The external pressure track's time axis is not strictly
    /// increasing.
    #[error("pressure track time axis is not strictly increasing")]
    UnorderedTrack,

    /// The external pressure track exceeds the fixed capacity.
    #[error("pressure track exceeds capacity of {0} points")]
    TrackOverflow(usize),

    /// The external pressure track could not be read.
    #[error("cannot read pressure track: {0}")]
    TrackIo(#[from] std::io::Error),

    /// The isosurface constraint was enabled in track mode but no track
    /// source was supplied.
    #[error("isosurface track mode requires a pressure track source")]
    MissingTrack,

    /// The snapshot source could not bracket the requested time.
    #[error("meteorological data unavailable at t = {0}")]
    Snapshot(f64),

    /// The output sink rejected a step's data.
    #[error("output sink failure: {0}")]
    Output(String),
}
