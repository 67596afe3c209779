use crate::core::catalog;
use crate::core::estimator::is_peak_minute;
use crate::domain::model::{
    AnalysisResult, ComparisonRow, InterventionProfile, SimulationRequest, SimulationResult,
    SimulationSummary,
};

/// Years of maintenance included in the total cost projection.
pub const PROJECTION_YEARS: u32 = 5;

pub fn projected_cost(profile: &InterventionProfile, years: u32) -> f64 {
    profile.implementation_cost + profile.annual_maintenance_cost * f64::from(years)
}

pub fn summarize(request: &SimulationRequest, result: &SimulationResult) -> SimulationSummary {
    let waits = &result.wait_times_seconds;
    let average = if waits.is_empty() {
        0.0
    } else {
        waits.iter().sum::<f64>() / waits.len() as f64
    };
    let min = waits.iter().copied().fold(f64::INFINITY, f64::min);
    let max = waits.iter().copied().fold(0.0, f64::max);

    let peak_minutes = if request.peak_hour_enabled {
        (0..request.duration_minutes)
            .filter(|m| is_peak_minute(*m))
            .count() as u32
    } else {
        0
    };

    let profile = request.profile;
    SimulationSummary {
        profile_id: profile.id.to_string(),
        profile_name: profile.name.to_string(),
        arrival_rate_per_minute: request.arrival_rate_per_minute,
        duration_minutes: request.duration_minutes,
        peak_hour_enabled: request.peak_hour_enabled,
        total_vehicles_processed: result.total_vehicles_processed,
        average_wait_seconds: average,
        min_wait_seconds: if min.is_finite() { min } else { 0.0 },
        max_wait_seconds: max,
        peak_minutes,
        implementation_cost: profile.implementation_cost,
        annual_maintenance_cost: profile.annual_maintenance_cost,
        five_year_total_cost: projected_cost(profile, PROJECTION_YEARS),
        generated_at: chrono::Utc::now(),
    }
}

/// Efficiency and implementation cost of every catalog entry, in catalog order.
pub fn comparison() -> Vec<ComparisonRow> {
    catalog::all()
        .iter()
        .map(|p| ComparisonRow {
            solution: p.name.to_string(),
            efficiency_pct: p.efficiency_multiplier * 100.0,
            cost_millions: p.implementation_cost / 1_000_000.0,
        })
        .collect()
}

pub fn analyze(request: &SimulationRequest, result: SimulationResult) -> AnalysisResult {
    AnalysisResult {
        summary: summarize(request, &result),
        samples: result.samples,
        comparison: comparison(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// `₱1,234,567.89`
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}₱{}.{}", sign, group_thousands(whole), cents)
}

pub fn render_report(summary: &SimulationSummary) -> String {
    let mut lines = vec![
        "SIMULATION RESULTS".to_string(),
        "==================".to_string(),
        format!("Solution: {}", summary.profile_name),
        format!(
            "Total vehicles processed: {}",
            group_thousands(&summary.total_vehicles_processed.to_string())
        ),
        format!("Average wait time: {:.1} seconds", summary.average_wait_seconds),
        format!(
            "Wait time range: {:.1} - {:.1} seconds",
            summary.min_wait_seconds, summary.max_wait_seconds
        ),
    ];
    if summary.peak_hour_enabled {
        lines.push(format!("Peak-period minutes: {}", summary.peak_minutes));
    }
    lines.extend([
        String::new(),
        "COST ANALYSIS".to_string(),
        "==================".to_string(),
        format!("Implementation cost: {}", format_currency(summary.implementation_cost)),
        format!("Yearly maintenance: {}", format_currency(summary.annual_maintenance_cost)),
        format!(
            "{}-year total cost: {}",
            PROJECTION_YEARS,
            format_currency(summary.five_year_total_cost)
        ),
    ]);
    lines.join("\n")
}
