//! Per-entity comm device: configuration, RNG, and inbox.

use std::collections::VecDeque;

use pd_core::{EntityId, EntityRng};

use crate::{CommError, CommResult, Message};

/// Radio characteristics of one device.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeviceConfig {
    /// Maximum broadcast range.  `None` means unlimited.
    pub range: Option<f64>,
    /// Probability in `[0, 1]` that an otherwise deliverable message makes it.
    pub reliability: f64,
}

impl DeviceConfig {
    /// Unlimited range, perfect reliability.
    pub const PERFECT: DeviceConfig = DeviceConfig { range: None, reliability: 1.0 };

    pub fn validate(&self) -> CommResult<()> {
        if !(0.0..=1.0).contains(&self.reliability) {
            return Err(CommError::InvalidReliability(self.reliability));
        }
        if let Some(r) = self.range {
            if r.is_nan() || r < 0.0 {
                return Err(CommError::InvalidRange(r));
            }
        }
        Ok(())
    }

    /// Effective range between two devices: the smaller of the two.
    #[inline]
    pub fn shared_range(&self, other: &DeviceConfig) -> f64 {
        let a = self.range.unwrap_or(f64::INFINITY);
        let b = other.range.unwrap_or(f64::INFINITY);
        a.min(b)
    }
}

/// The comm device attached to exactly one entity.
///
/// Reading and consuming are separate: [`unread_messages`](Self::unread_messages)
/// is a plain view, and messages only leave the inbox when the owner calls
/// [`mark_read`](Self::mark_read) or [`take_unread`](Self::take_unread)
/// after committing to a decision based on them.
#[derive(Debug)]
pub struct CommDevice<C> {
    owner:    EntityId,
    config:   DeviceConfig,
    rng:      EntityRng,
    inbox:    VecDeque<Message<C>>,
    received: u64,
}

impl<C> CommDevice<C> {
    pub(crate) fn new(owner: EntityId, config: DeviceConfig, rng: EntityRng) -> Self {
        Self { owner, config, rng, inbox: VecDeque::new(), received: 0 }
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Unread messages in delivery order.  Does not consume them.
    pub fn unread_messages(&self) -> impl ExactSizeIterator<Item = &Message<C>> + '_ {
        self.inbox.iter()
    }

    #[inline]
    pub fn unread_count(&self) -> usize {
        self.inbox.len()
    }

    /// Messages ever delivered to this device.  Never decreases.
    #[inline]
    pub fn received_count(&self) -> u64 {
        self.received
    }

    /// Consume the oldest `count` unread messages (fewer if the inbox is
    /// shorter).
    pub fn mark_read(&mut self, count: usize) {
        let count = count.min(self.inbox.len());
        self.inbox.drain(..count);
    }

    /// Consume and return every unread message.
    pub fn take_unread(&mut self) -> Vec<Message<C>> {
        self.inbox.drain(..).collect()
    }

    /// Roll this device's reliability.
    pub(crate) fn roll(&mut self) -> bool {
        self.rng.gen_bool(self.config.reliability)
    }

    pub(crate) fn deliver(&mut self, message: Message<C>) {
        self.inbox.push_back(message);
        self.received += 1;
    }
}
