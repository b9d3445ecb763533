//! `CommModel`: owns every device and routes messages between them.

use std::collections::BTreeMap;
use std::fmt::Debug;

use pd_core::{EntityId, EntityRng, Tick};
use pd_spatial::PlaneModel;
use tracing::{debug, trace};

use crate::{CommDevice, CommError, CommResult, DeviceConfig, Message};

/// Cumulative traffic counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommStats {
    /// Copies that passed range and reliability and were queued.
    pub queued:            u64,
    /// Copies dropped because the pair was out of range.
    pub out_of_range:      u64,
    /// Copies dropped by a failed reliability roll.
    pub lost:              u64,
    /// Copies addressed to, or pending for, a device that no longer exists.
    pub undeliverable:     u64,
}

/// The messaging substrate.
///
/// Devices are keyed by owner id in a `BTreeMap`, so broadcast fan-out and
/// therefore RNG consumption follow ascending id order on every run.
pub struct CommModel<C> {
    devices: BTreeMap<EntityId, CommDevice<C>>,
    /// Copies accepted this tick, in send order, awaiting [`flush`](Self::flush).
    pending: Vec<(EntityId, Message<C>)>,
    stats:   CommStats,
}

impl<C> Default for CommModel<C> {
    fn default() -> Self {
        Self { devices: BTreeMap::new(), pending: Vec::new(), stats: CommStats::default() }
    }
}

impl<C: Clone + Debug> CommModel<C> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Device lifecycle ──────────────────────────────────────────────────

    /// Attach a device to `owner`.  `rng` drives this device's reliability
    /// rolls and must be the owner's own generator.
    pub fn register(&mut self, owner: EntityId, config: DeviceConfig, rng: EntityRng) -> CommResult<()> {
        config.validate()?;
        if self.devices.contains_key(&owner) {
            return Err(CommError::AlreadyRegistered(owner));
        }
        self.devices.insert(owner, CommDevice::new(owner, config, rng));
        Ok(())
    }

    /// Detach `owner`'s device.  Copies still pending for it are discarded.
    pub fn unregister(&mut self, owner: EntityId) -> Option<CommDevice<C>> {
        let before = self.pending.len();
        self.pending.retain(|(to, _)| *to != owner);
        self.stats.undeliverable += (before - self.pending.len()) as u64;
        self.devices.remove(&owner)
    }

    #[inline]
    pub fn device(&self, owner: EntityId) -> Option<&CommDevice<C>> {
        self.devices.get(&owner)
    }

    #[inline]
    pub fn device_mut(&mut self, owner: EntityId) -> Option<&mut CommDevice<C>> {
        self.devices.get_mut(&owner)
    }

    #[inline]
    pub fn stats(&self) -> CommStats {
        self.stats
    }

    /// Copies waiting for the next [`flush`](Self::flush).
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // ── Sending ───────────────────────────────────────────────────────────

    /// Send `contents` to every other device in range.  Returns how many
    /// copies survived range and reliability filtering.
    pub fn broadcast(
        &mut self,
        sender:   EntityId,
        contents: C,
        plane:    &PlaneModel,
        now:      Tick,
    ) -> CommResult<usize> {
        if !self.devices.contains_key(&sender) {
            return Err(CommError::UnknownDevice(sender));
        }
        let recipients: Vec<EntityId> =
            self.devices.keys().copied().filter(|&id| id != sender).collect();

        let mut queued = 0;
        for recipient in recipients {
            if self.try_enqueue(sender, recipient, &contents, plane, now) {
                queued += 1;
            }
        }
        debug!(%sender, ?contents, queued, "broadcast");
        Ok(queued)
    }

    /// Send `contents` to one recipient.  Returns `true` if the copy survived
    /// filtering.  A recipient without a device (already retired) is not an
    /// error: the message is simply lost.
    pub fn send(
        &mut self,
        sender:    EntityId,
        recipient: EntityId,
        contents:  C,
        plane:     &PlaneModel,
        now:       Tick,
    ) -> CommResult<bool> {
        if !self.devices.contains_key(&sender) {
            return Err(CommError::UnknownDevice(sender));
        }
        if !self.devices.contains_key(&recipient) {
            self.stats.undeliverable += 1;
            debug!(%sender, %recipient, ?contents, "recipient has no device; message lost");
            return Ok(false);
        }
        let queued = self.try_enqueue(sender, recipient, &contents, plane, now);
        debug!(%sender, %recipient, ?contents, queued, "send");
        Ok(queued)
    }

    /// Range and reliability filter for one (sender, recipient) pair; queues
    /// the copy on success.  Both devices must exist.
    fn try_enqueue(
        &mut self,
        sender:    EntityId,
        recipient: EntityId,
        contents:  &C,
        plane:     &PlaneModel,
        now:       Tick,
    ) -> bool {
        let (Some(from), Some(to)) = (plane.position(sender), plane.position(recipient)) else {
            self.stats.out_of_range += 1;
            return false;
        };
        let range = self.devices[&sender].config().shared_range(self.devices[&recipient].config());
        if from.distance(to) > range {
            self.stats.out_of_range += 1;
            return false;
        }

        let sender_ok = self.devices.get_mut(&sender).is_some_and(|d| d.roll());
        let recipient_ok = sender_ok && self.devices.get_mut(&recipient).is_some_and(|d| d.roll());
        if !recipient_ok {
            self.stats.lost += 1;
            trace!(%sender, %recipient, "lost to reliability");
            return false;
        }

        self.pending.push((recipient, Message { sender, contents: contents.clone(), sent_at: now }));
        self.stats.queued += 1;
        true
    }

    // ── Tick boundary ─────────────────────────────────────────────────────

    /// Move every pending copy into its recipient's inbox, preserving send
    /// order.  Called once per tick by the scheduler after all listeners
    /// have run.  Returns the number of messages delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        for (recipient, message) in self.pending.drain(..) {
            match self.devices.get_mut(&recipient) {
                Some(device) => {
                    device.deliver(message);
                    delivered += 1;
                }
                None => self.stats.undeliverable += 1,
            }
        }
        delivered
    }
}
