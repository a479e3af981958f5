// Couplings and fields are indexed 1-based to match the packed-offset math,
// so numeric loops use explicit indices.
#![allow(clippy::needless_range_loop)]

//! # hopnet-core
//!
//! Bipolar patterns, packed symmetric couplings, and synchronous recall
//! dynamics for a Hopfield associative memory.
//!
//! This crate provides the numeric core of the engine:
//! - **Pattern**: a ±1 vector with in-place corruption operators (sign
//!   noise, rectangular occlusion) used to build recall queries.
//! - **PackedSymMatrix**: the symmetric zero-diagonal coupling matrix,
//!   stored as a packed strict upper triangle and filled by the Hebbian
//!   rule `W[i,j] = (1/N) Σ_p p[i] p[j]`.
//! - **Dynamics**: local fields, the `sign(0) = +1` update rule, the
//!   Hopfield energy, and the synchronous update-to-fixed-point loop with
//!   period-2 cycle detection.
//!
//! Both patterns and matrices persist as whitespace-separated ASCII files;
//! the image front-end and the pipeline stages live in `hopnet-rs`.

pub mod dynamics;
pub mod error;
pub mod pattern;
mod textio;
pub mod weights;

pub use dynamics::{energy, local_field, sign, synchronous_step, DynamicsState, Outcome};
pub use error::{HopError, HopResult};
pub use pattern::Pattern;
pub use weights::{advance, packed_offset, PackedSymMatrix};
