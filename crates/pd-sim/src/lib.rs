//! `pd-sim`: the tick scheduler for the rust_pdp simulator.
//!
//! # Tick loop
//!
//! ```text
//! until stopped:
//!   ① Activate   entities registered or unregistered since the last tick
//!                 join or leave the world.
//!   ② Tick       every parcel agent, then every vehicle agent, in
//!                 registration order, each with a fresh TimeLapse.
//!   ③ After      after_tick on the same listeners, same order.
//!   ④ Flush      messages sent this tick land in their inboxes.
//!   ⑤ Retire     delivered parcels leave the world.
//!   ⑥ Spawn      with probability `parcel_spawn_probability`, queue a new
//!                 parcel for the next tick.
//!   ⑦ Advance    the clock moves on; the stop condition is checked.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`sim`]      | `Sim`, `StopHandle`                                          |
//! | [`builder`]  | `SimBuilder`                                                 |
//! | [`spawn`]    | `SpawnHook`: the per-tick random parcel generator            |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `WorldSnapshot`               |
//! | [`config`]   | TOML loading for `SimConfig`                                 |
//! | [`scenario`] | CSV loading of initial vehicles and parcels                  |
//! | [`error`]    | `SimError`, `ConfigError`                                    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pd_sim::{NoopObserver, SimBuilder};
//!
//! let config = pd_sim::config::load_config("run.toml".as_ref())?;
//! let mut sim = SimBuilder::new(config).random_fleet().build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;
pub mod spawn;


pub use builder::SimBuilder;
pub use error::{ConfigError, ConfigResult, SimError, SimResult};
pub use observer::{NoopObserver, ParcelView, SimObserver, VehicleView, WorldSnapshot};
pub use scenario::{ScenarioKind, ScenarioRow};
pub use sim::{Sim, StopHandle};
pub use spawn::SpawnHook;
