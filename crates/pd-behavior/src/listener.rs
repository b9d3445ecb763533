//! The `TickListener` trait: anything the scheduler calls once per tick.

use pd_core::{EntityId, TimeLapse};
use pd_spatial::EntityKind;

use crate::{BehaviorResult, World};

/// A time-aware entity.
///
/// The scheduler keeps listeners in one ordered collection: every parcel
/// before every vehicle, insertion order within each kind.  Each tick it
/// calls [`tick`](Self::tick) on all of them, then
/// [`after_tick`](Self::after_tick) on all of them, then flushes the comm
/// model.
///
/// # Errors
///
/// An `Err` from `tick` is a broken contract (e.g. a pickup attempted away
/// from the parcel) and aborts the run.  Lost messages and missing bids are
/// never errors.
pub trait TickListener {
    fn id(&self) -> EntityId;

    /// Decides which group the scheduler places this listener in.
    fn kind(&self) -> EntityKind;

    /// Act for one tick, spending at most `time`.
    fn tick(&mut self, world: &mut World, time: &mut TimeLapse) -> BehaviorResult<()>;

    /// Bookkeeping after every listener has ticked.  Must not change anything
    /// other agents depend on.
    ///
    /// Default: does nothing.
    fn after_tick(&mut self, _world: &World, _time: &TimeLapse) {}
}
