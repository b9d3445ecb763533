//! `pd-core`: foundational types for the `rust_pdp` simulator.
//!
//! This crate is a dependency of every other `pd-*` crate.  It intentionally
//! has no `pd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`                                            |
//! | [`geo`]         | `Point`, Euclidean distance                           |
//! | [`time`]        | `Tick`, `SimClock`, `TimeLapse`                       |
//! | [`config`]      | `SimConfig`: every configuration input of a run       |
//! | [`rng`]         | `EntityRng` (per-entity), `SimRng` (global)           |
//! | [`error`]       | `PdError`, `PdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `pd-sim` to read TOML configuration.           |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{PdError, PdResult};
pub use geo::Point;
pub use ids::EntityId;
pub use rng::{EntityRng, SimRng};
pub use time::{SimClock, Tick, TimeLapse};
