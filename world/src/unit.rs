//! Squad member state machine.
//!
//! A unit is idle while its waypoint queue is empty and moving otherwise.
//! Movement is animated in screen space; the discrete cell only changes when
//! the final waypoint is reached.

use std::{collections::VecDeque, time::Duration};

use glam::Vec2;
use squad_tactics_core::{CellCoord, IsoProjection, OrderError, SquadRules, UnitId, UnitSnapshot};

#[derive(Clone, Copy, Debug)]
struct Waypoint {
    cell: CellCoord,
    position: Vec2,
}

/// Authoritative state of a single squad member.
#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    cell: CellCoord,
    position: Vec2,
    waypoints: VecDeque<Waypoint>,
    pending_ap_cost: u32,
    ap: u32,
    ap_max: u32,
    ammo: u32,
    clip_max: u32,
    overwatch: bool,
    speed: f32,
}

impl Unit {
    /// Creates an idle unit with full action points and a full clip.
    #[must_use]
    pub fn new(
        id: UnitId,
        cell: CellCoord,
        squad: &SquadRules,
        projection: &IsoProjection,
    ) -> Self {
        Self {
            id,
            cell,
            position: projection.tile_center(cell),
            waypoints: VecDeque::new(),
            pending_ap_cost: 0,
            ap: squad.ap_max,
            ap_max: squad.ap_max,
            ammo: squad.clip_max,
            clip_max: squad.clip_max,
            overwatch: false,
            speed: squad.move_speed,
        }
    }

    /// Identifier of the unit.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Cell the unit is standing on, or departed from while moving.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Animated pixel position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Action points left this turn.
    #[must_use]
    pub const fn ap(&self) -> u32 {
        self.ap
    }

    /// Rounds loaded.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Whether the unit is on overwatch.
    #[must_use]
    pub const fn overwatch(&self) -> bool {
        self.overwatch
    }

    /// Whether the unit is walking a path.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        !self.waypoints.is_empty()
    }

    /// Final cell of the path being walked.
    #[must_use]
    pub fn destination(&self) -> Option<CellCoord> {
        self.waypoints.back().map(|waypoint| waypoint.cell)
    }

    /// Reports whether a positive cost fits in the remaining action points.
    #[must_use]
    pub const fn can_afford(&self, ap_cost: u32) -> bool {
        ap_cost > 0 && ap_cost <= self.ap
    }

    /// Queues the tiles to walk. `ap_cost` is charged on arrival.
    pub fn set_path(&mut self, path: &[CellCoord], ap_cost: u32, projection: &IsoProjection) {
        self.waypoints = path
            .iter()
            .map(|cell| Waypoint {
                cell: *cell,
                position: projection.tile_center(*cell),
            })
            .collect();
        self.pending_ap_cost = ap_cost;
    }

    /// Advances along the path by `dt` worth of walking.
    ///
    /// Returns the new cell when the final waypoint was reached during this
    /// update. The pending action point cost is paid at that moment.
    pub fn update(&mut self, dt: Duration) -> Option<CellCoord> {
        if self.waypoints.is_empty() {
            return None;
        }

        let mut budget = self.speed * dt.as_secs_f32();
        let mut reached = None;
        while let Some(waypoint) = self.waypoints.front().copied() {
            let delta = waypoint.position - self.position;
            let distance = delta.length();
            if distance <= budget {
                self.position = waypoint.position;
                budget -= distance;
                reached = Some(waypoint.cell);
                let _ = self.waypoints.pop_front();
            } else {
                self.position += delta / distance * budget;
                break;
            }
        }

        if !self.waypoints.is_empty() {
            return None;
        }
        let arrival = reached?;
        self.ap = self.ap.saturating_sub(self.pending_ap_cost);
        self.pending_ap_cost = 0;
        self.cell = arrival;
        Some(arrival)
    }

    /// Snaps the unit onto a cell, discarding any queued movement.
    pub fn set_grid_immediate(&mut self, cell: CellCoord, projection: &IsoProjection) {
        self.waypoints.clear();
        self.pending_ap_cost = 0;
        self.cell = cell;
        self.position = projection.tile_center(cell);
    }

    /// Arms overwatch, paying `ap_cost` and then forfeiting remaining action points.
    pub fn set_overwatch(&mut self, ap_cost: u32) -> Result<(), OrderError> {
        if self.is_moving() {
            return Err(OrderError::UnitMoving);
        }
        if self.overwatch {
            return Err(OrderError::AlreadyOnOverwatch);
        }
        if self.ap < ap_cost {
            return Err(OrderError::InsufficientAp);
        }
        if self.ammo == 0 {
            return Err(OrderError::NoAmmo);
        }
        self.ap -= ap_cost;
        self.overwatch = true;
        self.ap = 0;
        Ok(())
    }

    /// Disarms overwatch. Returns whether it was armed.
    pub fn clear_overwatch(&mut self) -> bool {
        std::mem::replace(&mut self.overwatch, false)
    }

    /// Refills the clip for `ap_cost` action points.
    pub fn reload(&mut self, ap_cost: u32) -> Result<(), OrderError> {
        if self.is_moving() {
            return Err(OrderError::UnitMoving);
        }
        if self.ap < ap_cost {
            return Err(OrderError::InsufficientAp);
        }
        if self.ammo >= self.clip_max {
            return Err(OrderError::ClipFull);
        }
        self.ap -= ap_cost;
        self.ammo = self.clip_max;
        Ok(())
    }

    /// Consumes one round. Returns `false` when the clip is empty.
    pub fn spend_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub(crate) fn end_turn(&mut self) {
        self.ap = 0;
    }

    pub(crate) fn refresh_ap(&mut self) {
        self.ap = self.ap_max;
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            cell: self.cell,
            position: self.position,
            destination: self.destination(),
            ap: self.ap,
            ap_max: self.ap_max,
            ammo: self.ammo,
            clip_max: self.clip_max,
            overwatch: self.overwatch,
        }
    }
}
