//! `PlaneModel`: positions of every placed entity on a bounded plane.

use std::collections::HashMap;

use pd_core::{EntityId, Point, SimRng, TimeLapse};
use tracing::trace;

use crate::{SpatialError, SpatialResult};

/// Shortfall, in plane units, still counted as arriving.  Repeated
/// straight-line steps drift by a few ULPs, so a trip that is an exact
/// multiple of the per-tick reach would otherwise end one tick late.
pub const ARRIVAL_SLACK: f64 = 1e-9;

// ── EntityKind ────────────────────────────────────────────────────────────────

/// What sort of entity occupies a position.  Used by
/// [`PlaneModel::nearest_of_kind`] and by observers that only care about one
/// population.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    Vehicle,
    Parcel,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Vehicle => "vehicle",
            EntityKind::Parcel  => "parcel",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle `[min, max]` (inclusive on both corners).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// # Errors
    /// `InvalidBounds` unless `min` lies strictly below and left of `max`.
    pub fn new(min: Point, max: Point) -> SpatialResult<Self> {
        if !(min.is_finite() && max.is_finite() && min.x < max.x && min.y < max.y) {
            return Err(SpatialError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

// ── PlaneModel ────────────────────────────────────────────────────────────────

/// The spatial model: owns the position of every placed entity.
///
/// Entities never cache their own position; they ask the model, and an
/// entity that is not currently placed (a parcel riding in a vehicle, a
/// delivered parcel) simply has no position.
///
/// Placement order is remembered and used as the tie-break for
/// [`nearest_of_kind`](Self::nearest_of_kind), so lookups are deterministic
/// regardless of hash iteration order.
pub struct PlaneModel {
    bounds:    Bounds,
    positions: HashMap<EntityId, Point>,
    kinds:     HashMap<EntityId, EntityKind>,
    /// Placed entities in placement order.
    order:     Vec<EntityId>,
}

impl PlaneModel {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            positions: HashMap::new(),
            kinds:     HashMap::new(),
            order:     Vec::new(),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of placed entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Put `entity` on the plane at `at`.
    pub fn place(&mut self, entity: EntityId, kind: EntityKind, at: Point) -> SpatialResult<()> {
        if self.positions.contains_key(&entity) {
            return Err(SpatialError::AlreadyPlaced(entity));
        }
        if !self.bounds.contains(at) {
            return Err(SpatialError::OutOfBounds(at));
        }
        self.positions.insert(entity, at);
        self.kinds.insert(entity, kind);
        self.order.push(entity);
        Ok(())
    }

    /// Take `entity` off the plane, returning its last position.
    pub fn remove(&mut self, entity: EntityId) -> SpatialResult<Point> {
        let at = self.positions.remove(&entity).ok_or(SpatialError::NotPlaced(entity))?;
        self.kinds.remove(&entity);
        self.order.retain(|&e| e != entity);
        Ok(at)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Current position, or `None` if the entity is not placed.
    #[inline]
    pub fn position(&self, entity: EntityId) -> Option<Point> {
        self.positions.get(&entity).copied()
    }

    #[inline]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.positions.contains_key(&entity)
    }

    #[inline]
    pub fn kind_of(&self, entity: EntityId) -> Option<EntityKind> {
        self.kinds.get(&entity).copied()
    }

    /// Exact co-location of two placed entities.  `false` if either is absent.
    pub fn equal_position(&self, a: EntityId, b: EntityId) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        }
    }

    /// Placed entities of `kind` with their positions, in placement order.
    pub fn objects_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = (EntityId, Point)> + '_ {
        self.order
            .iter()
            .filter(move |e| self.kinds.get(e) == Some(&kind))
            .map(|&e| (e, self.positions[&e]))
    }

    /// The placed entity of `kind` closest to `point` that satisfies
    /// `predicate`.  Exact distance ties go to the entity placed first.
    pub fn nearest_of_kind<F>(&self, point: Point, kind: EntityKind, predicate: F) -> Option<EntityId>
    where
        F: Fn(EntityId) -> bool,
    {
        let mut best: Option<(EntityId, f64)> = None;
        for (entity, at) in self.objects_of_kind(kind) {
            if !predicate(entity) {
                continue;
            }
            let d = point.distance(at);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((entity, d));
            }
        }
        best.map(|(entity, _)| entity)
    }

    /// A point drawn uniformly from the plane.
    pub fn random_position(&self, rng: &mut SimRng) -> Point {
        let (min, max) = (self.bounds.min, self.bounds.max);
        Point::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y))
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Move `entity` in a straight line toward `target` at `speed`, spending
    /// from `time`.
    ///
    /// Covers `speed * time.time_left()` distance, never overshooting.  When
    /// that is enough to arrive (within [`ARRIVAL_SLACK`], which absorbs the
    /// rounding left behind by earlier partial steps), the entity lands
    /// exactly on `target` and only
    /// the time needed to get there (rounded up to whole time units, capped
    /// at what is left) is consumed.  Otherwise the whole remaining budget is
    /// consumed.  Returns the time consumed.
    ///
    /// # Errors
    /// `NotPlaced` if the entity has no position, `OutOfBounds` if `target` is
    /// off the plane, `InvalidSpeed` for a non-positive or non-finite speed.
    pub fn move_toward(
        &mut self,
        entity: EntityId,
        target: Point,
        time:   &mut TimeLapse,
        speed:  f64,
    ) -> SpatialResult<u64> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SpatialError::InvalidSpeed(speed));
        }
        if !self.bounds.contains(target) {
            return Err(SpatialError::OutOfBounds(target));
        }
        let from = self.position(entity).ok_or(SpatialError::NotPlaced(entity))?;

        let remaining = from.distance(target);
        if remaining == 0.0 || !time.has_time_left() {
            return Ok(0);
        }

        let reach = speed * time.time_left() as f64;
        let (to, consumed) = if reach >= remaining - ARRIVAL_SLACK {
            let needed = (remaining / speed).ceil() as u64;
            (target, needed.clamp(1, time.time_left()))
        } else {
            (from.lerp(target, reach / remaining), time.time_left())
        };

        time.consume(consumed);
        self.positions.insert(entity, to);
        trace!(%entity, %from, %to, consumed, "moved");
        Ok(consumed)
    }
}
