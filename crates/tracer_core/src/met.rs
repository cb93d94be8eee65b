//! Meteorological snapshot types and collaborator trait contracts.
//!
//! The engine never ingests field files itself; it is handed two
//! immutable snapshots bracketing the current time and queries them
//! through the [`MetSampler`] trait. The interpolation algorithm's
//! internals belong to the collaborator implementing the trait; only the
//! call contract is fixed here.

/// One immutable 3-D gridded field snapshot
/// (longitude x latitude x pressure level).
///
/// Wind arrays are flat, indexed `(ix * ny + iy) * nz + iz`. The level
/// axis is ordered surface to model top (descending pressure); the
/// longitude and latitude axes are regular.
#[derive(Clone, Debug)]
pub struct MetSnapshot {
    /// Snapshot timestamp [s].
    pub time: f64,
    /// Longitude axis [deg], regular.
    pub lons: Vec<f64>,
    /// Latitude axis [deg], regular.
    pub lats: Vec<f64>,
    /// Pressure level axis [hPa], descending.
    pub levels: Vec<f64>,
    /// Zonal wind [m/s], `nx * ny * nz`.
    pub u: Vec<f64>,
    /// Meridional wind [m/s], `nx * ny * nz`.
    pub v: Vec<f64>,
    /// Vertical velocity [hPa/s], `nx * ny * nz`.
    pub w: Vec<f64>,
}

impl MetSnapshot {
    /// Creates a snapshot with zero wind everywhere.
    pub fn zero_wind(time: f64, lons: Vec<f64>, lats: Vec<f64>, levels: Vec<f64>) -> Self {
        let n = lons.len() * lats.len() * levels.len();
        Self {
            time,
            lons,
            lats,
            levels,
            u: vec![0.0; n],
            v: vec![0.0; n],
            w: vec![0.0; n],
        }
    }

    /// Number of longitude grid points.
    #[inline]
    pub fn nx(&self) -> usize {
        self.lons.len()
    }

    /// Number of latitude grid points.
    #[inline]
    pub fn ny(&self) -> usize {
        self.lats.len()
    }

    /// Number of pressure levels.
    #[inline]
    pub fn nz(&self) -> usize {
        self.levels.len()
    }

    /// Flat index of a grid cell corner.
    #[inline]
    pub fn idx(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.ny() + iy) * self.nz() + iz
    }

    /// Pressure of the uppermost model level [hPa].
    #[inline]
    pub fn top_pressure(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }
}

/// Two immutable snapshots bracketing the current simulation time.
///
/// `first` carries the leading timestamp of the pair; its timestamp keys
/// the wind-variability cache invalidation.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotPair<'a> {
    /// Snapshot with the leading timestamp.
    pub first: &'a MetSnapshot,
    /// Snapshot with the trailing timestamp.
    pub second: &'a MetSnapshot,
}

impl<'a> SnapshotPair<'a> {
    /// Creates a bracketing pair.
    #[inline]
    pub fn new(first: &'a MetSnapshot, second: &'a MetSnapshot) -> Self {
        Self { first, second }
    }
}

/// One interpolated meteorological sample at a query point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetSample {
    /// Surface pressure [hPa].
    pub ps: f64,
    /// Tropopause pressure [hPa].
    pub pt: f64,
    /// Geopotential height [km].
    pub z: f64,
    /// Temperature [K].
    pub t: f64,
    /// Zonal wind [m/s].
    pub u: f64,
    /// Meridional wind [m/s].
    pub v: f64,
    /// Vertical velocity [hPa/s].
    pub w: f64,
    /// Potential vorticity [PVU].
    pub pv: f64,
    /// Water vapour volume mixing ratio.
    pub h2o: f64,
    /// Ozone volume mixing ratio.
    pub o3: f64,
}

/// Field interpolation contract.
///
/// Implementations must interpolate across the two bracketing snapshots
/// in time and across the grid in space. The narrow accessors default to
/// a full sample; implementations may override them when a cheaper
/// partial interpolation is available.
pub trait MetSampler: Sync {
    /// Interpolates the full meteorological vector at a query point.
    fn sample(&self, pair: SnapshotPair<'_>, time: f64, p: f64, lon: f64, lat: f64) -> MetSample;

    /// Interpolated wind components `(u, v, w)` at a query point.
    #[inline]
    fn wind(&self, pair: SnapshotPair<'_>, time: f64, p: f64, lon: f64, lat: f64) -> (f64, f64, f64) {
        let s = self.sample(pair, time, p, lon, lat);
        (s.u, s.v, s.w)
    }

    /// Interpolated temperature [K] at a query point.
    #[inline]
    fn temperature(&self, pair: SnapshotPair<'_>, time: f64, p: f64, lon: f64, lat: f64) -> f64 {
        self.sample(pair, time, p, lon, lat).t
    }

    /// Interpolated surface pressure [hPa] at a query point.
    #[inline]
    fn surface_pressure(&self, pair: SnapshotPair<'_>, time: f64, p: f64, lon: f64, lat: f64) -> f64 {
        self.sample(pair, time, p, lon, lat).ps
    }
}

/// Climatology lookup contract: scalar functions with no side effects.
pub trait Climatology: Sync {
    /// Tropopause pressure [hPa] at the given time and latitude.
    fn tropopause_pressure(&self, time: f64, lat: f64) -> f64;

    /// Nitric acid volume mixing ratio [ppbv] at the given time,
    /// latitude and pressure.
    fn hno3_vmr(&self, time: f64, lat: f64, p: f64) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_dimensions() {
        let snap = MetSnapshot::zero_wind(
            0.0,
            vec![-180.0, -90.0, 0.0, 90.0],
            vec![-45.0, 0.0, 45.0],
            vec![1000.0, 500.0],
        );
        assert_eq!(snap.nx(), 4);
        assert_eq!(snap.ny(), 3);
        assert_eq!(snap.nz(), 2);
        assert_eq!(snap.u.len(), 24);
        assert_eq!(snap.top_pressure(), 500.0);
    }

    #[test]
    fn test_flat_index_is_injective() {
        let snap = MetSnapshot::zero_wind(
            0.0,
            vec![0.0, 10.0, 20.0],
            vec![0.0, 10.0],
            vec![1000.0, 500.0],
        );
        let mut seen = std::collections::HashSet::new();
        for ix in 0..snap.nx() {
            for iy in 0..snap.ny() {
                for iz in 0..snap.nz() {
                    assert!(seen.insert(snap.idx(ix, iy, iz)));
                }
            }
        }
        assert_eq!(seen.len(), 12);
    }
}
