//! Physics modules mutating particle state.
//!
//! Each module is a single data-parallel pass over the ensemble:
//! particles are processed independently with no ordering guarantee, and
//! per-particle state is disjoint except for the shared read-only
//! snapshots and the wind-variability cache. Modules run in strict
//! sequence within a step; the orchestrator owns that order.
//!
//! Every pass except the isosurface constraint and the diagnostics
//! writer is gated on a nonzero per-particle time increment.

pub mod advection;
pub mod decay;
pub mod diagnostics;
pub mod isosurface;
pub mod mesoscale;
pub mod position;
pub mod sedimentation;
pub mod turbulence;
