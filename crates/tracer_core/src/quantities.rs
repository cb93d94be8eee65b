//! Named particle quantities and their column mapping.
//!
//! A run carries a fixed-width row of scalar quantities per particle
//! (mass, particle radius, diagnostic outputs, ...). Which quantities are
//! present is decided once, at configuration time; every module then asks
//! the resolved [`QuantitySlots`] mapping for an optional column index
//! instead of re-checking configuration flags per particle.

/// Named scalar quantities a particle may carry.
///
/// The first three feed back into the dynamics (decay and
/// sedimentation); the rest are diagnostic output channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantity {
    /// Particle mass [kg].
    Mass,
    /// Particle radius [micrometre].
    Radius,
    /// Particle density [kg/m^3].
    Density,
    /// Interpolated surface pressure [hPa].
    SurfacePressure,
    /// Interpolated tropopause pressure [hPa].
    TropopausePressure,
    /// Particle pressure [hPa].
    Pressure,
    /// Geopotential height [km].
    Height,
    /// Temperature [K].
    Temperature,
    /// Zonal wind [m/s].
    ZonalWind,
    /// Meridional wind [m/s].
    MeridionalWind,
    /// Vertical velocity [hPa/s].
    VerticalVelocity,
    /// Water vapour volume mixing ratio.
    WaterVapour,
    /// Ozone volume mixing ratio.
    Ozone,
    /// Horizontal wind speed [m/s].
    HorizontalWind,
    /// Vertical velocity [m/s].
    VerticalWindMs,
    /// Potential temperature [K].
    Theta,
    /// Potential vorticity [PVU].
    PotentialVorticity,
    /// Ice frost point temperature [K].
    IceTemperature,
    /// Nitric acid trihydrate equilibrium temperature [K].
    NatTemperature,
    /// Supercooled ternary solution temperature [K], the mean of the
    /// ice and NAT temperatures.
    StsTemperature,
}

/// Number of distinct [`Quantity`] variants.
pub const QUANTITY_COUNT: usize = 20;

impl Quantity {
    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Mapping from quantity name to an optional ensemble column.
///
/// Resolved once at initialisation; a quantity that was not requested
/// maps to `None` and every module that would write it is skipped for
/// the whole run.
///
/// # Examples
///
/// ```rust
/// use tracer_core::quantities::{Quantity, QuantitySlots};
///
/// let slots = QuantitySlots::new(&[Quantity::Mass, Quantity::Theta]);
/// assert_eq!(slots.width(), 2);
/// assert_eq!(slots.get(Quantity::Mass), Some(0));
/// assert_eq!(slots.get(Quantity::Theta), Some(1));
/// assert_eq!(slots.get(Quantity::Ozone), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantitySlots {
    slots: [Option<usize>; QUANTITY_COUNT],
    width: usize,
}

impl QuantitySlots {
    /// Resolves the requested quantities to sequential column indices, in
    /// the order given. Duplicate requests keep their first column.
    pub fn new(requested: &[Quantity]) -> Self {
        let mut slots = [None; QUANTITY_COUNT];
        let mut width = 0;
        for &q in requested {
            if slots[q.index()].is_none() {
                slots[q.index()] = Some(width);
                width += 1;
            }
        }
        Self { slots, width }
    }

    /// Returns the column index of a quantity, or `None` if it was not
    /// requested for this run.
    #[inline]
    pub fn get(&self, q: Quantity) -> Option<usize> {
        self.slots[q.index()]
    }

    /// Returns the fixed quantity-row width (number of columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
}
