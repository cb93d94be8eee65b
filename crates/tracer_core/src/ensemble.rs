//! The mutable particle ensemble.
//!
//! State is laid out as a structure of arrays so each physics pass can
//! stream over exactly the columns it touches, and so the data-parallel
//! passes can zip mutable columns without aliasing.

/// A fixed-capacity ensemble of point-mass air parcels.
///
/// Column layout, one entry per particle:
/// - `time` [s], `lon` [deg], `lat` [deg], `p` [hPa]: dynamical state.
/// - `up`, `vp` [m/s] and `wp` [hPa/s]: mesoscale wind fluctuations,
///   carried across steps for temporal correlation.
/// - quantity columns of fixed width, resolved by
///   [`QuantitySlots`](crate::quantities::QuantitySlots).
///
/// The particle count and the quantity-row width never change during a
/// run.
///
/// # Examples
///
/// ```rust
/// use tracer_core::ensemble::Ensemble;
///
/// let mut ensemble = Ensemble::new(2, 1);
/// ensemble.p[0] = 500.0;
/// ensemble.q_mut(0)[0] = 1.0e3;
/// assert_eq!(ensemble.len(), 2);
/// assert_eq!(ensemble.width(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Ensemble {
    /// Particle time [s].
    pub time: Vec<f64>,
    /// Longitude [deg].
    pub lon: Vec<f64>,
    /// Latitude [deg].
    pub lat: Vec<f64>,
    /// Pressure [hPa], the vertical coordinate.
    pub p: Vec<f64>,
    /// Zonal mesoscale wind fluctuation [m/s].
    pub up: Vec<f64>,
    /// Meridional mesoscale wind fluctuation [m/s].
    pub vp: Vec<f64>,
    /// Vertical mesoscale fluctuation [hPa/s].
    pub wp: Vec<f64>,
    q: Vec<Vec<f64>>,
}

impl Ensemble {
    /// Creates a zero-initialised ensemble of `n` particles carrying
    /// `width` quantity columns.
    pub fn new(n: usize, width: usize) -> Self {
        Self {
            time: vec![0.0; n],
            lon: vec![0.0; n],
            lat: vec![0.0; n],
            p: vec![0.0; n],
            up: vec![0.0; n],
            vp: vec![0.0; n],
            wp: vec![0.0; n],
            q: vec![vec![0.0; n]; width],
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the ensemble holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Quantity-row width (number of columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.q.len()
    }

    /// Read access to a quantity column.
    #[inline]
    pub fn q(&self, col: usize) -> &[f64] {
        &self.q[col]
    }

    /// Write access to a quantity column.
    #[inline]
    pub fn q_mut(&mut self, col: usize) -> &mut [f64] {
        &mut self.q[col]
    }

    /// Mutable access to one column together with read access to the rest
    /// of the ensemble is already possible through the public position
    /// fields; this helper additionally hands out two distinct columns
    /// read-only, as needed by sedimentation (radius and density).
    #[inline]
    pub fn q_pair(&self, a: usize, b: usize) -> (&[f64], &[f64]) {
        (&self.q[a], &self.q[b])
    }
}
