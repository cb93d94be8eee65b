//! # tracer_engine: data-parallel Lagrangian particle integration
//!
//! ## Role
//!
//! tracer_engine is the top layer of the two-crate workspace. It drives
//! an ensemble of air parcels through gridded wind fields:
//! - Physics passes over the ensemble (`modules`): midpoint advection,
//!   turbulent and mesoscale diffusion, sedimentation, isosurface
//!   constraints, position correction, mass decay and meteorological
//!   diagnostics
//! - Per-particle timestep scheduling (`scheduler`)
//! - A per-cell wind-variability cache shared by the mesoscale pass
//!   (`cache`)
//! - A pool of reproducibly seeded random streams (`rng`)
//! - The run orchestrator and its collaborator contracts (`stepper`)
//!
//! ## Collaborators
//!
//! The engine never reads field files or writes output itself. Field
//! access goes through the [`MetSampler`](tracer_core::met::MetSampler)
//! and [`Climatology`](tracer_core::met::Climatology) traits from
//! tracer_core; snapshot loading and output handoff go through
//! [`SnapshotSource`](stepper::SnapshotSource) and
//! [`OutputSink`](stepper::OutputSink).
//!
//! ## Usage example
//!
//! ```rust
//! use tracer_engine::rng::RngPool;
//!
//! let mut pool = RngPool::new(42, 4).expect("stream count within capacity");
//! let mut batch = vec![0.0; 3 * 1000];
//! pool.fill_normal(&mut batch);
//! assert!(batch.iter().all(|x| x.is_finite()));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod error;
pub mod modules;
pub mod rng;
pub mod scheduler;
pub mod stepper;

#[cfg(test)]
pub(crate) mod testing;
