//! `pd-pdp`: who carries what.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `ParcelSpec`, `ParcelState`, `VehicleState`                       |
//! | [`model`]   | `PdpModel`: contents, capacity, pickup / deliver operations       |
//! | [`error`]   | `PdpError`, `PdpResult<T>`                                        |
//!
//! # Service model
//!
//! Pickups and deliveries take time.  Starting one validates every
//! precondition up front, then spends the operation's duration from the
//! caller's [`TimeLapse`][pd_core::TimeLapse].  If the tick runs out first,
//! the remainder carries over: the vehicle reports `PickingUp` /
//! `Delivering` until [`PdpModel::continue_service`] has consumed the rest
//! in later ticks.
//!
//! ```text
//! parcel:  Available ──pickup──▶ PickingUp ──done──▶ InCargo
//!                                                      │
//!          Delivered ◀──done── Delivering ◀──deliver───┘
//! ```
//!
//! A parcel leaves the plane as soon as its pickup starts and never returns.

pub mod error;
pub mod model;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{PdpError, PdpResult};
pub use model::PdpModel;
pub use state::{ParcelSpec, ParcelState, VehicleState};
