//! The fixed catalog of intervention profiles.
//!
//! Profiles are `'static` and never change after startup; lookups hand out
//! shared references into [`PROFILES`].

use crate::domain::model::InterventionProfile;
use crate::utils::error::{Result, SimError};

pub static PROFILES: [InterventionProfile; 6] = [
    InterventionProfile {
        id: "traffic_lights",
        name: "Traffic Lights",
        efficiency_multiplier: 0.8,
        implementation_cost: 2_500_000.0,
        annual_maintenance_cost: 100_000.0,
        baseline_wait_time_seconds: 45.0,
        description: "Traditional traffic lights with timer system and backup power",
    },
    InterventionProfile {
        id: "redesigned_lanes",
        name: "Redesigned Lanes",
        efficiency_multiplier: 1.2,
        implementation_cost: 7_500_000.0,
        annual_maintenance_cost: 200_000.0,
        baseline_wait_time_seconds: 30.0,
        description: "Optimized lane layout with dedicated turn lanes and improved signage",
    },
    InterventionProfile {
        id: "roundabout",
        name: "Roundabout",
        efficiency_multiplier: 1.0,
        implementation_cost: 10_000_000.0,
        annual_maintenance_cost: 300_000.0,
        baseline_wait_time_seconds: 20.0,
        description: "Modern roundabout with yield signs and proper lighting",
    },
    InterventionProfile {
        id: "smart_traffic_system",
        name: "Smart Traffic System",
        efficiency_multiplier: 1.4,
        implementation_cost: 15_000_000.0,
        annual_maintenance_cost: 500_000.0,
        baseline_wait_time_seconds: 18.0,
        description: "Adaptive signals driven by road sensors and a central controller",
    },
    InterventionProfile {
        id: "overpass",
        name: "Overpass Bridge",
        efficiency_multiplier: 1.6,
        implementation_cost: 25_000_000.0,
        annual_maintenance_cost: 800_000.0,
        baseline_wait_time_seconds: 10.0,
        description: "Elevated road structure with pedestrian walkway",
    },
    InterventionProfile {
        id: "underground_tunnel",
        name: "Underground Tunnel",
        efficiency_multiplier: 1.8,
        implementation_cost: 40_000_000.0,
        annual_maintenance_cost: 1_000_000.0,
        baseline_wait_time_seconds: 8.0,
        description: "Grade-separated tunnel carrying through traffic under the junction",
    },
];

pub fn all() -> &'static [InterventionProfile] {
    &PROFILES
}

pub fn get_profile(id: &str) -> Result<&'static InterventionProfile> {
    PROFILES
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| SimError::UnknownProfile { id: id.to_string() })
}

/// Accepts either the id or the display name, ignoring case.
pub fn find(key: &str) -> Result<&'static InterventionProfile> {
    let key = key.trim();
    PROFILES
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| SimError::UnknownProfile {
            id: key.to_string(),
        })
}
