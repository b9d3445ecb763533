//! `pd-spatial`: the plane every vehicle and parcel lives on.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`plane`]   | `PlaneModel`, `Bounds`, `EntityKind`                        |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Movement model
//!
//! Entities travel in straight lines at up to their maximum speed.  A call to
//! [`PlaneModel::move_toward`] covers `speed * time_left` distance units,
//! capped at the remaining distance.  Arrival snaps the entity exactly onto
//! the target so that downstream co-location checks (`==` on `Point`) hold
//! without any epsilon.  The time not needed to arrive stays in the
//! [`TimeLapse`][pd_core::TimeLapse] for the caller to spend on something else.

pub mod error;
pub mod plane;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use plane::{ARRIVAL_SLACK, Bounds, EntityKind, PlaneModel};
