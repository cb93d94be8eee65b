//! # tracer_core: foundation layer for Lagrangian particle transport
//!
//! ## Role
//!
//! tracer_core is the bottom layer of the two-crate workspace, providing:
//! - Physical constants and unit conversions (`constants`, `math`)
//! - Grid axis index lookups (`grid`)
//! - Run configuration with builder and validation (`config`)
//! - Quantity-slot mapping resolved once at initialisation (`quantities`)
//! - The mutable particle ensemble, stored as a structure of arrays
//!   (`ensemble`)
//! - Meteorological snapshot types and the sampler/climatology trait
//!   contracts consumed by the engine (`met`)
//!
//! ## Zero engine dependency
//!
//! This crate has no dependency on `tracer_engine`; the engine depends on
//! it. External dependencies are minimal: `num-traits`, `thiserror`, and
//! optionally `serde`.
//!
//! ## Usage example
//!
//! ```rust
//! use tracer_core::config::{Direction, RunConfig};
//! use tracer_core::quantities::{Quantity, QuantitySlots};
//! use tracer_core::ensemble::Ensemble;
//!
//! let slots = QuantitySlots::new(&[Quantity::Mass, Quantity::Temperature]);
//! let config = RunConfig::builder()
//!     .direction(Direction::Forward)
//!     .dt_mod(180.0)
//!     .dt_met(21_600.0)
//!     .quantities(slots)
//!     .build()
//!     .expect("valid configuration");
//!
//! let ensemble = Ensemble::new(1000, config.quantities().width());
//! assert_eq!(ensemble.len(), 1000);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod constants;
pub mod ensemble;
pub mod grid;
pub mod math;
pub mod met;
pub mod quantities;
