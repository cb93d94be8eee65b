//! Random-stream pool feeding the stochastic modules.
//!
//! One reproducibly seeded generator per concurrent worker, initialised
//! once at run start. The stochastic modules request one batch of
//! `3 * particles` standard-normal variates immediately before use; the
//! batch is filled in parallel, each stream owning a fixed contiguous
//! slice of the buffer so the output is independent of thread
//! scheduling.
//!
//! A pool of one stream covers the bulk single-generator mode used when
//! the whole step is offloaded to an accelerator-style executor.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

use crate::error::EngineError;

/// Maximum number of random streams in a pool.
pub const MAX_STREAMS: usize = 512;

/// Pool of deterministically seeded standard-normal streams.
///
/// Stream `i` is seeded with `base_seed + i`, so a run is reproducible
/// for a fixed stream count regardless of how rayon schedules the fill.
///
/// # Examples
///
/// ```rust
/// use tracer_engine::rng::RngPool;
///
/// let mut pool = RngPool::new(42, 4).unwrap();
/// let mut batch = vec![0.0; 3 * 1000];
/// pool.fill_normal(&mut batch);
/// ```
pub struct RngPool {
    streams: Vec<StdRng>,
    base_seed: u64,
}

impl RngPool {
    /// Creates a pool of `n_streams` generators seeded from `base_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TooManyStreams`] if `n_streams` is zero or
    /// exceeds [`MAX_STREAMS`].
    pub fn new(base_seed: u64, n_streams: usize) -> Result<Self, EngineError> {
        if n_streams == 0 || n_streams > MAX_STREAMS {
            return Err(EngineError::TooManyStreams(n_streams));
        }
        let streams = (0..n_streams)
            .map(|i| StdRng::seed_from_u64(base_seed.wrapping_add(i as u64)))
            .collect();
        Ok(Self { streams, base_seed })
    }

    /// Creates a pool with one stream per rayon worker thread.
    pub fn per_worker(base_seed: u64) -> Result<Self, EngineError> {
        Self::new(base_seed, rayon::current_num_threads().max(1))
    }

    /// Returns the base seed.
    #[inline]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Number of independent streams.
    #[inline]
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Fills the buffer with independent standard-normal variates.
    ///
    /// The buffer is split into one contiguous chunk per stream; each
    /// stream fills its own chunk in parallel. Zero allocations, and the
    /// result depends only on the seed and the stream count.
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        if buffer.is_empty() {
            return;
        }
        let chunk = buffer.len().div_ceil(self.streams.len());
        self.streams
            .par_iter_mut()
            .zip(buffer.par_chunks_mut(chunk))
            .for_each(|(stream, chunk)| {
                for value in chunk.iter_mut() {
                    *value = StandardNormal.sample(stream);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_rejects_zero_streams() {
        assert!(matches!(
            RngPool::new(42, 0),
            Err(EngineError::TooManyStreams(0))
        ));
    }

    #[test]
    fn test_pool_rejects_oversized_pool() {
        assert!(matches!(
            RngPool::new(42, MAX_STREAMS + 1),
            Err(EngineError::TooManyStreams(_))
        ));
    }

    #[test]
    fn test_reproducible_for_fixed_stream_count() {
        let mut a = RngPool::new(123, 4).unwrap();
        let mut b = RngPool::new(123, 4).unwrap();
        let mut buf_a = vec![0.0; 3 * 100];
        let mut buf_b = vec![0.0; 3 * 100];
        a.fill_normal(&mut buf_a);
        b.fill_normal(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = RngPool::new(1, 2).unwrap();
        let mut b = RngPool::new(2, 2).unwrap();
        let mut buf_a = vec![0.0; 64];
        let mut buf_b = vec![0.0; 64];
        a.fill_normal(&mut buf_a);
        b.fill_normal(&mut buf_b);
        assert!(buf_a.iter().zip(&buf_b).any(|(x, y)| x != y));
    }

    #[test]
    fn test_single_stream_bulk_mode() {
        let mut pool = RngPool::new(7, 1).unwrap();
        let mut buf = vec![0.0; 301];
        pool.fill_normal(&mut buf);
        assert!(buf.iter().all(|x| x.is_finite()));
        assert!(buf.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn test_moments_are_standard_normal() {
        let mut pool = RngPool::new(42, 4).unwrap();
        let mut buf = vec![0.0; 120_000];
        pool.fill_normal(&mut buf);
        let n = buf.len() as f64;
        let mean = buf.iter().sum::<f64>() / n;
        let var = buf.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        assert!(mean.abs() < 0.02, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.03, "var = {var}");
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let mut pool = RngPool::new(42, 2).unwrap();
        pool.fill_normal(&mut []);
    }
}
