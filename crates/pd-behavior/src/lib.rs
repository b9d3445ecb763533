//! `pd-behavior`: the agents and the protocol they speak.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`protocol`] | `Protocol`: the three message tags                            |
//! | [`world`]    | `World`: plane, transport and comm models for one tick         |
//! | [`listener`] | `TickListener` trait                                          |
//! | [`parcel`]   | `ParcelAgent`, `AllocationPhase`                              |
//! | [`vehicle`]  | `VehicleAgent`, `VehiclePhase`                                |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Allocation protocol
//!
//! ```text
//!  parcel                         vehicle (idle)
//!    │ ── WhoCanPickMeUp ──────────▶ │   tick T
//!    │ ◀───────────────── ICan ───── │   tick T+1
//!    │ ── PickMeUp ────────────────▶ │   tick T+2  (nearest bidder wins)
//!    │                               │   tick T+3  commit, start driving
//! ```
//!
//! Every arrow crosses a tick boundary because the comm model only flushes
//! between ticks.  The protocol is greedy: a parcel takes the nearest bidder
//! it has heard from and never reconsiders.

pub mod error;
pub mod listener;
pub mod parcel;
pub mod protocol;
pub mod vehicle;
pub mod world;


pub use error::{BehaviorError, BehaviorResult};
pub use listener::TickListener;
pub use parcel::{AllocationPhase, ParcelAgent};
pub use protocol::Protocol;
pub use vehicle::{VehicleAgent, VehiclePhase};
pub use world::World;
