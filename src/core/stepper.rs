//! Motion stepper for the intersection animation.
//!
//! Vehicles move in straight lines at a fixed per-direction velocity, are
//! dropped once they leave the region plus a margin, and at most one new
//! vehicle enters per tick.

use crate::domain::model::{BoundingRegion, Direction, Position, Vehicle, VehicleId};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{validate_positive_real, validate_range};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct StepperConfig {
    /// Pixels per tick along the direction of travel.
    pub speed_px: f64,
    pub despawn_margin: f64,
    pub spawn_probability: f64,
    /// Distance of each lane from the centre line.
    pub lane_offset: f64,
    pub base_delay: Duration,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            speed_px: 5.0,
            despawn_margin: 20.0,
            spawn_probability: 0.1,
            lane_offset: 10.0,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl StepperConfig {
    pub fn validate(&self) -> Result<()> {
        validate_positive_real("animation.speed_px", self.speed_px)?;
        validate_range("animation.despawn_margin", self.despawn_margin, 0.0, f64::MAX)?;
        validate_range("animation.spawn_probability", self.spawn_probability, 0.0, 1.0)?;
        validate_range("animation.lane_offset", self.lane_offset, 0.0, f64::MAX)?;
        Ok(())
    }
}

fn velocity(direction: Direction, speed: f64) -> (f64, f64) {
    match direction {
        Direction::Right => (speed, 0.0),
        Direction::Left => (-speed, 0.0),
        Direction::Down => (0.0, speed),
        Direction::Up => (0.0, -speed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub moved: usize,
    pub despawned: usize,
    pub spawned: Option<VehicleId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Advanced(StepReport),
    Paused,
    Stopped,
}

pub struct MotionStepper<R: Rng = ChaCha8Rng> {
    region: BoundingRegion,
    config: StepperConfig,
    vehicles: Vec<Vehicle>,
    next_id: u64,
    speed_multiplier: f64,
    paused: bool,
    active: bool,
    ticks: u64,
    rng: R,
}

impl MotionStepper<ChaCha8Rng> {
    pub fn seeded(region: BoundingRegion, config: StepperConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(region, config, rng)
    }
}

impl<R: Rng> MotionStepper<R> {
    pub fn new(region: BoundingRegion, config: StepperConfig, rng: R) -> Result<Self> {
        validate_positive_real("animation.width", region.width)?;
        validate_positive_real("animation.height", region.height)?;
        config.validate()?;

        Ok(Self {
            region,
            config,
            vehicles: Vec::new(),
            next_id: 0,
            speed_multiplier: 1.0,
            paused: false,
            active: true,
            ticks: 0,
            rng,
        })
    }

    /// Where a vehicle travelling in `direction` enters the region. Traffic
    /// keeps to one side of the centre lines so opposing flows don't overlap.
    pub fn entry_point(&self, direction: Direction) -> Position {
        let (w, h, lane) = (self.region.width, self.region.height, self.config.lane_offset);
        match direction {
            Direction::Right => Position::new(0.0, h / 2.0 + lane),
            Direction::Left => Position::new(w, h / 2.0 - lane),
            Direction::Down => Position::new(w / 2.0 - lane, 0.0),
            Direction::Up => Position::new(w / 2.0 + lane, h),
        }
    }

    pub fn step(&mut self) -> TickStatus {
        if !self.active {
            return TickStatus::Stopped;
        }
        if self.paused {
            return TickStatus::Paused;
        }

        let moved = self.vehicles.len();
        for vehicle in &mut self.vehicles {
            let (dx, dy) = velocity(vehicle.direction, self.config.speed_px);
            vehicle.position.x += dx;
            vehicle.position.y += dy;
        }

        let (region, margin) = (self.region, self.config.despawn_margin);
        self.vehicles
            .retain(|v| region.contains_with_margin(v.position, margin));
        let despawned = moved - self.vehicles.len();

        let spawned = if self.rng.gen_bool(self.config.spawn_probability) {
            let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
            Some(self.spawn(direction))
        } else {
            None
        };

        self.ticks += 1;
        TickStatus::Advanced(StepReport {
            moved,
            despawned,
            spawned,
        })
    }

    /// Places a vehicle at the entry point for `direction`.
    pub fn spawn(&mut self, direction: Direction) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        let position = self.entry_point(direction);
        tracing::trace!(?id, ?direction, x = position.x, y = position.y, "vehicle spawned");
        self.vehicles.push(Vehicle {
            id,
            direction,
            position,
        });
        id
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// No effect once stopped.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        if self.active {
            tracing::debug!(ticks = self.ticks, vehicles = self.vehicles.len(), "stepper stopped");
        }
        self.active = false;
        self.paused = false;
        self.vehicles.clear();
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<()> {
        validate_positive_real("speed", multiplier)?;
        // the resulting delay must still fit in a Duration
        Duration::try_from_secs_f64(self.config.base_delay.as_secs_f64() / multiplier).map_err(
            |_| SimError::invalid_input("speed", multiplier, "Tick delay would be too long"),
        )?;
        self.speed_multiplier = multiplier;
        Ok(())
    }

    pub fn tick_delay(&self) -> Duration {
        self.config.base_delay.div_f64(self.speed_multiplier)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn region(&self) -> BoundingRegion {
        self.region
    }

    pub fn speed(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
