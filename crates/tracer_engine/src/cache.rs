//! Per-grid-cell cache of local wind variability.
//!
//! The mesoscale diffusion module scales its fluctuations by the
//! standard deviation of the 16 wind values surrounding a grid cell
//! (2 snapshots x 2x2x2 spatial corners). That statistic only changes
//! when the bracketing snapshot pair changes, so it is computed lazily
//! per cell and cached with the leading snapshot's timestamp.
//!
//! Concurrent particles mapping to the same stale cell may recompute the
//! entry redundantly; the recomputation is deterministic for a fixed
//! snapshot pair, so the race is benign and accepted instead of locking
//! a hot path. The cell state is held in atomics: sigma stores are
//! relaxed, the timestamp store is release and its load acquire, so a
//! reader that observes a fresh stamp also observes the sigmas written
//! before it.

use std::sync::atomic::{AtomicU64, Ordering};

use tracer_core::math::stddev;
use tracer_core::met::SnapshotPair;

/// Cache of per-cell wind standard deviations, same shape as the
/// meteorological grid.
///
/// Not persisted across runs; reallocated whenever the grid shape
/// changes.
pub struct WindVariability {
    nx: usize,
    ny: usize,
    nz: usize,
    stamp: Vec<AtomicU64>,
    sig_u: Vec<AtomicU64>,
    sig_v: Vec<AtomicU64>,
    sig_w: Vec<AtomicU64>,
}

impl WindVariability {
    /// Creates an empty cache for a grid of the given shape. Every cell
    /// starts stale.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        let n = nx * ny * nz;
        let fresh = || (0..n).map(|_| AtomicU64::new(f64::NAN.to_bits())).collect();
        Self {
            nx,
            ny,
            nz,
            stamp: fresh(),
            sig_u: fresh(),
            sig_v: fresh(),
            sig_w: fresh(),
        }
    }

    /// Grid shape `(nx, ny, nz)` the cache was built for.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Reallocates the cache if the grid shape changed; otherwise keeps
    /// existing entries (their timestamps still guard staleness).
    pub fn ensure_shape(&mut self, nx: usize, ny: usize, nz: usize) {
        if (nx, ny, nz) != (self.nx, self.ny, self.nz) {
            *self = Self::new(nx, ny, nz);
        }
    }

    #[inline]
    fn cell(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.ny + iy) * self.nz + iz
    }

    /// Returns the cached wind standard deviations `(sigma_u, sigma_v,
    /// sigma_w)` for the cell with lower corner `(ix, iy, iz)`,
    /// recomputing the entry if it is stale relative to the pair's
    /// leading timestamp.
    pub fn fetch(
        &self,
        pair: SnapshotPair<'_>,
        ix: usize,
        iy: usize,
        iz: usize,
    ) -> (f64, f64, f64) {
        let cell = self.cell(ix, iy, iz);
        let stamp_bits = pair.first.time.to_bits();

        if self.stamp[cell].load(Ordering::Acquire) != stamp_bits {
            let mut u = [0.0; 16];
            let mut v = [0.0; 16];
            let mut w = [0.0; 16];

            let mut k = 0;
            for snap in [pair.first, pair.second] {
                for dz in 0..2 {
                    for dy in 0..2 {
                        for dx in 0..2 {
                            let idx = snap.idx(ix + dx, iy + dy, iz + dz);
                            u[k] = snap.u[idx];
                            v[k] = snap.v[idx];
                            w[k] = snap.w[idx];
                            k += 1;
                        }
                    }
                }
            }

            self.sig_u[cell].store(stddev(&u).to_bits(), Ordering::Relaxed);
            self.sig_v[cell].store(stddev(&v).to_bits(), Ordering::Relaxed);
            self.sig_w[cell].store(stddev(&w).to_bits(), Ordering::Relaxed);
            self.stamp[cell].store(stamp_bits, Ordering::Release);
        }

        (
            f64::from_bits(self.sig_u[cell].load(Ordering::Relaxed)),
            f64::from_bits(self.sig_v[cell].load(Ordering::Relaxed)),
            f64::from_bits(self.sig_w[cell].load(Ordering::Relaxed)),
        )
    }
}
