use serde::{Deserialize, Serialize};

/// One named traffic-management option with fixed efficiency, cost and
/// wait-time parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub efficiency_multiplier: f64,
    pub implementation_cost: f64,
    pub annual_maintenance_cost: f64,
    pub baseline_wait_time_seconds: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub profile: &'static InterventionProfile,
    pub arrival_rate_per_minute: u32,
    pub duration_minutes: u32,
    pub peak_hour_enabled: bool,
}

/// What happened during one simulated minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinuteSample {
    pub minute: u32,
    pub efficiency: f64,
    pub passed_vehicles: f64,
    pub wait_seconds: f64,
}

impl MinuteSample {
    /// 0.0 (free flow) to 1.0 (a minute or more of waiting).
    pub fn congestion_level(&self) -> f64 {
        (self.wait_seconds / 60.0).min(1.0)
    }

    /// Number of flow markers (0..=10) shown for this minute; 100 vehicles
    /// per minute saturates the scale.
    pub fn flow_indicators(&self) -> u32 {
        ((self.passed_vehicles / 100.0).clamp(0.0, 1.0) * 10.0) as u32
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub total_vehicles_processed: u64,
    pub wait_times_seconds: Vec<f64>,
    pub samples: Vec<MinuteSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub profile_id: String,
    pub profile_name: String,
    pub arrival_rate_per_minute: u32,
    pub duration_minutes: u32,
    pub peak_hour_enabled: bool,
    pub total_vehicles_processed: u64,
    pub average_wait_seconds: f64,
    pub min_wait_seconds: f64,
    pub max_wait_seconds: f64,
    pub peak_minutes: u32,
    pub implementation_cost: f64,
    pub annual_maintenance_cost: f64,
    pub five_year_total_cost: f64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// One bar in the catalog comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub solution: String,
    pub efficiency_pct: f64,
    pub cost_millions: f64,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub summary: SimulationSummary,
    pub samples: Vec<MinuteSample>,
    pub comparison: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub direction: Direction,
    pub position: Position,
}

/// The drawable intersection area, origin top-left, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRegion {
    pub width: f64,
    pub height: f64,
}

impl BoundingRegion {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains_with_margin(&self, position: Position, margin: f64) -> bool {
        position.x >= -margin
            && position.x <= self.width + margin
            && position.y >= -margin
            && position.y <= self.height + margin
    }
}
