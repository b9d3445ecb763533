//! `pd-comm`: simulated radio between vehicles and parcels.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`message`] | `Message<C>`: payload tag + sender + send tick              |
//! | [`device`]  | `CommDevice<C>`, `DeviceConfig`: per-entity inbox           |
//! | [`model`]   | `CommModel<C>`: broadcast / send / tick-boundary flush      |
//! | [`error`]   | `CommError`, `CommResult<T>`                                |
//!
//! # Delivery rules
//!
//! 1. **Range**: a message reaches a device only if the sender-receiver
//!    distance, measured from [`PlaneModel`][pd_spatial::PlaneModel]
//!    positions at send time, is at most the smaller of the two devices'
//!    ranges.  `None` means unlimited.  An entity with no position is out of
//!    range of everything.
//! 2. **Reliability**: each in-range copy survives a roll against the
//!    sender's reliability (sender's RNG) and a roll against the recipient's
//!    reliability (recipient's RNG).  Reliability 0 on either side means
//!    nothing gets through.
//! 3. **Latency**: surviving copies are parked until
//!    [`CommModel::flush`] runs at the tick boundary.  A message sent during
//!    tick T is therefore first visible during tick T+1, never earlier.
//!
//! The payload type `C` is a closed tag set chosen by the application
//! (`pd-behavior` uses a three-variant enum).

pub mod device;
pub mod error;
pub mod message;
pub mod model;


pub use device::{CommDevice, DeviceConfig};
pub use error::{CommError, CommResult};
pub use message::Message;
pub use model::{CommModel, CommStats};
