//! Shared test doubles for the engine's unit tests.

use tracer_core::met::{Climatology, MetSample, MetSampler, MetSnapshot, SnapshotPair};

/// Sampler returning the same field values at every query point.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ConstantSampler {
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
pub(crate) struct FixedClimatology {
    /// Tropopause pressure [hPa].
    pub tropopause: f64,
    /// Nitric acid volume mixing ratio [ppbv].
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

fn grid_axes() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (
        vec![0.0, 5.0, 10.0, 15.0, 20.0],
        vec![-10.0, -5.0, 0.0, 5.0, 10.0],
        vec![1000.0, 850.0, 700.0, 500.0, 300.0, 200.0, 100.0, 50.0, 10.0],
    )
}

/// A bracketing pair of zero-wind snapshots on a small test grid. The
/// uppermost level is 10 hPa.
pub(crate) fn grid_pair(t0: f64, t1: f64) -> (MetSnapshot, MetSnapshot) {
    let (lons, lats, levels) = grid_axes();
    (
        MetSnapshot::zero_wind(t0, lons.clone(), lats.clone(), levels.clone()),
        MetSnapshot::zero_wind(t1, lons, lats, levels),
    )
}

/// Like [`grid_pair`] but with wind values varying from grid point to
/// grid point by `spread`. With `spread == 0` the wind is uniform, so
/// every cell's local variability is exactly zero.
pub(crate) fn grid_pair_with_wind(t0: f64, t1: f64, spread: f64) -> (MetSnapshot, MetSnapshot) {
    let (lons, lats, levels) = grid_axes();
    let mut met0 = MetSnapshot::zero_wind(t0, lons.clone(), lats.clone(), levels.clone());
    let mut met1 = MetSnapshot::zero_wind(t1, lons, lats, levels);

    for (snap, offset) in [(&mut met0, 0), (&mut met1, 1)] {
        for i in 0..snap.u.len() {
            let j = i + offset;
            snap.u[i] = 10.0 + spread * ((j % 5) as f64 - 2.0);
            snap.v[i] = -5.0 + 0.5 * spread * ((j % 7) as f64 - 3.0);
            snap.w[i] = 0.001 + 1e-4 * spread * ((j % 3) as f64 - 1.0);
        }
    }
    (met0, met1)
}
