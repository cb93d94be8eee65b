//! Shared fixtures for the end-to-end transport tests.

#![allow(dead_code)]

use std::sync::Arc;

use tracer_core::ensemble::Ensemble;
use tracer_core::met::{Climatology, MetSample, MetSampler, MetSnapshot, SnapshotPair};
use tracer_engine::error::EngineError;
use tracer_engine::stepper::{OutputSink, SnapshotSource};

/// Installs a test subscriber so engine tracing shows up under
/// `RUST_LOG`. Safe to call from every test; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sampler returning the same field values at every query point.
#[derive(Clone, Copy, Debug)]
pub struct ConstantSampler {
    pub ps: f64,
    pub pt: f64,
    pub z: f64,
    pub t: f64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
    pub pv: f64,
    pub h2o: f64,
    pub o3: f64,
}

impl Default for ConstantSampler {
    fn default() -> Self {
        Self {
            ps: 1013.25,
            pt: 200.0,
            z: 5.0,
            t: 250.0,
            u: 0.0,
            v: 0.0,
            w: 0.0,
            pv: 0.0,
            h2o: 0.0,
            o3: 0.0,
        }
    }
}

impl MetSampler for ConstantSampler {
    fn sample(&self, _pair: SnapshotPair<'_>, _time: f64, _p: f64, _lon: f64, _lat: f64) -> MetSample {
        MetSample {
            ps: self.ps,
            pt: self.pt,
            z: self.z,
            t: self.t,
            u: self.u,
            v: self.v,
            w: self.w,
            pv: self.pv,
            h2o: self.h2o,
            o3: self.o3,
        }
    }
}

/// Climatology returning fixed values everywhere.
#[derive(Clone, Copy, Debug)]
pub struct FixedClimatology {
    pub tropopause: f64,
    pub hno3: f64,
}

impl Default for FixedClimatology {
    fn default() -> Self {
        Self {
            tropopause: 100.0,
            hno3: 5.0,
        }
    }
}

impl Climatology for FixedClimatology {
    fn tropopause_pressure(&self, _time: f64, _lat: f64) -> f64 {
        self.tropopause
    }

    fn hno3_vmr(&self, _time: f64, _lat: f64, _p: f64) -> f64 {
        self.hno3
    }
}

/// Source handing out the same zero-wind snapshot pair for every step.
pub struct FixedSource {
    met0: Arc<MetSnapshot>,
    met1: Arc<MetSnapshot>,
}

impl FixedSource {
    pub fn new(t0: f64, t1: f64) -> Self {
        let lons = vec![0.0, 5.0, 10.0, 15.0, 20.0];
        let lats = vec![-10.0, -5.0, 0.0, 5.0, 10.0];
        let levels = vec![1000.0, 850.0, 700.0, 500.0, 300.0, 200.0, 100.0, 50.0, 10.0];
        Self {
            met0: Arc::new(MetSnapshot::zero_wind(t0, lons.clone(), lats.clone(), levels.clone())),
            met1: Arc::new(MetSnapshot::zero_wind(t1, lons, lats, levels)),
        }
    }
}

impl SnapshotSource for FixedSource {
    fn bracket(&mut self, _t: f64) -> Result<(Arc<MetSnapshot>, Arc<MetSnapshot>), EngineError> {
        Ok((self.met0.clone(), self.met1.clone()))
    }
}

/// Sink recording the step times and the first particle's pressure.
#[derive(Default)]
pub struct RecordingSink {
    pub times: Vec<f64>,
    pub pressures: Vec<f64>,
}

impl OutputSink for RecordingSink {
    fn write(&mut self, t: f64, ensemble: &Ensemble) -> Result<(), EngineError> {
        self.times.push(t);
        if !ensemble.is_empty() {
            self.pressures.push(ensemble.p[0]);
        }
        Ok(())
    }
}
