//! The `Sim` struct and its tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pd_behavior::{ParcelAgent, TickListener, VehicleAgent, World};
use pd_comm::DeviceConfig;
use pd_core::{EntityId, Point, SimClock, SimConfig, SimRng, Tick, TimeLapse};
use pd_pdp::{ParcelSpec, PdpError};
use pd_spatial::{EntityKind, SpatialError};
use tracing::{debug, info};

use crate::{SimError, SimObserver, SimResult, SpawnHook};

// ── StopHandle ────────────────────────────────────────────────────────────────

/// External stop flag.  Clone it, hand it to another thread or an observer,
/// and call [`stop`](Self::stop); the run halts at the next tick boundary.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── Pending registrations ─────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) enum Pending {
    Vehicle { id: EntityId, start: Point },
    Parcel { id: EntityId, start: Point, spec: ParcelSpec },
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Owns the [`World`] and every agent.  Parcel agents always tick before
/// vehicle agents; within each group the order is registration order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Run configuration.
    pub config: SimConfig,

    /// Tracks the tick about to be processed.
    pub clock: SimClock,

    /// The plane, transport, and comm models.
    pub world: World,

    parcels:  Vec<ParcelAgent>,
    vehicles: Vec<VehicleAgent>,

    /// Registered since the last tick; activated at the start of the next.
    pending:  Vec<Pending>,
    /// Unregistered since the last tick; removed at the start of the next.
    retiring: Vec<EntityId>,

    pub(crate) rng: SimRng,
    spawn:   SpawnHook,
    device:  DeviceConfig,
    next_id: u32,
    stop:    StopHandle,
}

impl Sim {
    pub(crate) fn new(config: SimConfig, world: World) -> Self {
        Self {
            clock:    SimClock::new(config.tick_length),
            world,
            parcels:  Vec::new(),
            vehicles: Vec::new(),
            pending:  Vec::new(),
            retiring: Vec::new(),
            rng:      SimRng::new(config.seed),
            spawn:    SpawnHook::from_config(&config),
            device:   DeviceConfig { range: config.comm_range, reliability: config.comm_reliability },
            next_id:  0,
            stop:     StopHandle::new(),
            config,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// A handle that stops [`run`](Self::run) at the next tick boundary.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn vehicle(&self, id: EntityId) -> Option<&VehicleAgent> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    pub fn parcel(&self, id: EntityId) -> Option<&ParcelAgent> {
        self.parcels.iter().find(|p| p.id() == id)
    }

    /// Active vehicles in tick order.
    pub fn vehicles(&self) -> &[VehicleAgent] {
        &self.vehicles
    }

    /// Active parcels in tick order.
    pub fn parcels(&self) -> &[ParcelAgent] {
        &self.parcels
    }

    /// Registrations waiting for the next tick.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Queue a vehicle starting at `start`.  It becomes active at the start
    /// of the next tick.
    pub fn register_vehicle(&mut self, start: Point) -> SimResult<EntityId> {
        self.check_in_bounds(start)?;
        let id = self.allocate_id();
        self.pending.push(Pending::Vehicle { id, start });
        Ok(id)
    }

    /// Queue a parcel waiting at `start`.  It becomes active at the start of
    /// the next tick.
    pub fn register_parcel(&mut self, start: Point, spec: ParcelSpec) -> SimResult<EntityId> {
        self.check_in_bounds(start)?;
        self.check_parcel(&spec)?;
        let id = self.allocate_id();
        self.pending.push(Pending::Parcel { id, start, spec });
        Ok(id)
    }

    /// Remove an entity at the next tick boundary.  A vehicle takes whatever
    /// it carries with it.
    pub fn unregister(&mut self, id: EntityId) -> SimResult<()> {
        let known = self.vehicle(id).is_some()
            || self.parcel(id).is_some()
            || self.pending.iter().any(|p| pending_id(p) == id);
        if !known {
            return Err(SimError::UnknownEntity(id));
        }
        self.retiring.push(id);
        Ok(())
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run until the configured end time passes or the stop handle fires.
    ///
    /// Without an `end_time` this only returns once stopped externally.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            seed = self.config.seed,
            vehicles = self.vehicles.len(),
            parcels = self.parcels.len(),
            end_time = ?self.config.end_time,
            "run started"
        );
        while !self.should_stop() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick, &self.world);
        let stats = self.world.comm.stats();
        info!(
            ticks = self.clock.current_tick.0,
            time = self.clock.current_time(),
            parcels_left = self.parcels.len(),
            messages = stats.queued,
            "run finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks, ignoring the stop condition.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.stop.is_stopped() || self.config.is_past_end(self.clock.current_time())
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        self.process_tick(now)?;
        observer.on_tick_end(now, &self.world);
        self.clock.advance();
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<()> {
        self.world.tick = now;

        // ── Phase 1: apply registrations from the previous boundary ───────
        for id in std::mem::take(&mut self.retiring) {
            self.retire(id);
        }
        for pending in std::mem::take(&mut self.pending) {
            self.activate(pending)?;
        }

        // ── Phase 2: tick every listener, parcels first ───────────────────
        // ── Phase 3: after-tick bookkeeping, same order ───────────────────
        {
            let lapse = self.clock.time_lapse();
            let world = &mut self.world;
            let mut listeners: Vec<&mut dyn TickListener> = self
                .parcels
                .iter_mut()
                .map(|p| p as &mut dyn TickListener)
                .chain(self.vehicles.iter_mut().map(|v| v as &mut dyn TickListener))
                .collect();

            let mut lapses: Vec<TimeLapse> = Vec::with_capacity(listeners.len());
            for listener in listeners.iter_mut() {
                let mut time = lapse.clone();
                listener.tick(world, &mut time)?;
                lapses.push(time);
            }
            for (listener, time) in listeners.iter_mut().zip(&lapses) {
                listener.after_tick(world, time);
            }
        }

        // ── Phase 4: messages sent this tick become readable ──────────────
        let delivered = self.world.comm.flush();

        // ── Phase 5: delivered parcels leave the world ────────────────────
        for parcel in self.world.pdp.take_delivered() {
            self.retire(parcel);
        }

        // ── Phase 6: maybe spawn a parcel for the next tick ───────────────
        if let Some((start, spec)) = self.spawn.roll(&mut self.rng, &self.world.plane) {
            let id = self.register_parcel(start, spec)?;
            debug!(tick = %now, parcel = %id, %start, destination = %spec.destination, "parcel spawned");
        }

        debug!(tick = %now, delivered, parcels = self.parcels.len(), "tick done");
        Ok(())
    }

    /// Put a queued entity into the world.
    pub(crate) fn activate(&mut self, pending: Pending) -> SimResult<()> {
        match pending {
            Pending::Vehicle { id, start } => {
                self.world.plane.place(id, EntityKind::Vehicle, start)?;
                self.world.pdp.add_vehicle(id, self.config.vehicle_capacity)?;
                self.world.comm.register(id, self.device, self.rng.entity_rng(id))?;
                self.vehicles.push(VehicleAgent::new(id, self.config.vehicle_speed));
                debug!(vehicle = %id, %start, "vehicle active");
            }
            Pending::Parcel { id, start, spec } => {
                self.world.plane.place(id, EntityKind::Parcel, start)?;
                self.world.pdp.add_parcel(id, spec)?;
                self.world.comm.register(id, self.device, self.rng.entity_rng(id))?;
                self.parcels.push(ParcelAgent::new(id));
                debug!(parcel = %id, %start, destination = %spec.destination, "parcel active");
            }
        }
        Ok(())
    }

    /// Take an entity out of every model and drop its agent.  Also cancels a
    /// registration that has not been activated yet.
    fn retire(&mut self, id: EntityId) {
        self.pending.retain(|p| pending_id(p) != id);
        // Not every entity is on the plane (carried and delivered parcels).
        let _ = self.world.plane.remove(id);
        self.world.comm.unregister(id);

        if let Some(carried) = self.world.pdp.remove_vehicle(id) {
            self.vehicles.retain(|v| v.id() != id);
            debug!(vehicle = %id, carried = carried.len(), "vehicle retired");
            for parcel in carried {
                self.retire(parcel);
            }
        } else if self.world.pdp.remove_parcel(id).is_some() {
            self.parcels.retain(|p| p.id() != id);
            debug!(parcel = %id, "parcel retired");
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_in_bounds(&self, at: Point) -> SimResult<()> {
        if !self.world.plane.bounds().contains(at) {
            return Err(SpatialError::OutOfBounds(at).into());
        }
        Ok(())
    }

    /// A parcel no vehicle could ever load would be bid on, driven to and
    /// then fail its pickup, so it is refused up front.
    pub(crate) fn check_parcel(&self, spec: &ParcelSpec) -> SimResult<()> {
        self.check_in_bounds(spec.destination)?;
        if !(spec.magnitude.is_finite() && spec.magnitude >= 0.0) {
            return Err(PdpError::InvalidMagnitude(spec.magnitude).into());
        }
        let capacity = self.config.vehicle_capacity;
        if spec.magnitude > capacity {
            return Err(SimError::ParcelTooLarge { magnitude: spec.magnitude, capacity });
        }
        Ok(())
    }
}

fn pending_id(p: &Pending) -> EntityId {
    match *p {
        Pending::Vehicle { id, .. } | Pending::Parcel { id, .. } => id,
    }
}

impl Pending {
    pub(crate) fn vehicle(id: EntityId, start: Point) -> Self {
        Pending::Vehicle { id, start }
    }

    pub(crate) fn parcel(id: EntityId, start: Point, spec: ParcelSpec) -> Self {
        Pending::Parcel { id, start, spec }
    }
}
