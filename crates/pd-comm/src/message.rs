//! The unit of communication.

use pd_core::{EntityId, Tick};

/// An immutable message as it sits in a recipient's inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<C> {
    /// Who sent it.  Replies are addressed to this id.
    pub sender: EntityId,
    /// The payload tag.
    pub contents: C,
    /// The tick during which it was sent.  Always strictly earlier than any
    /// tick during which it can be read.
    pub sent_at: Tick,
}
