// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Everything a front end needs to render one estimate.
//!
//! An [`EstimateReport`] bundles the power curve, both charging profiles,
//! their merged time axis and the headline numbers. Reports serialize to
//! JSON for scripting.

use crate::merge::{self, MergedPoint};
use crate::simulator::{self, ChargeSession, ChargingProfile, PowerCurveSample};
use crate::store::CurveStore;
use crate::temperature::TemperatureModel;
use serde::{Deserialize, Serialize};

/// Shown when the SOC window is empty or reversed.
pub const INVALID_RANGE_NOTICE: &str = "Start SOC must be lower than end SOC";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateReport {
    /// Name of the curve that supplied charging power
    pub source: String,
    /// Session after normalization
    pub session: ChargeSession,
    pub temperature_multiplier: f64,
    pub power_curve: Vec<PowerCurveSample>,
    /// Absent when the SOC window is invalid
    pub result: Option<EstimateResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResult {
    pub total_minutes: f64,
    pub total_hours: f64,
    /// Human-readable total, e.g. "1h 5min"
    pub total_time: String,
    pub uncapped_total_minutes: f64,
    pub energy_added_kwh: f64,
    /// Percentage points of charge added
    pub charge_added_pct: u8,
    pub start_power_kw: f64,
    pub capped: ChargingProfile,
    pub uncapped: ChargingProfile,
    pub merged: Vec<MergedPoint>,
}

impl EstimateReport {
    pub fn is_available(&self) -> bool {
        self.result.is_some()
    }
}

/// Run the simulation and collect everything for display.
pub fn build_report(
    store: &CurveStore,
    temperature: &TemperatureModel,
    session: &ChargeSession,
) -> EstimateReport {
    let normalized = session.normalized();
    let temperature_multiplier = temperature.multiplier(
        normalized.ambient_temp_c,
        normalized.chemistry,
        normalized.preheated,
    );
    let power_curve = simulator::power_curve(store, temperature, &normalized);

    let result = simulator::simulate(store, temperature, &normalized).map(|est| {
        let merged = merge::merge_profiles(&est.capped, &est.uncapped);
        EstimateResult {
            total_time: format_duration(est.total_minutes),
            total_minutes: est.total_minutes,
            total_hours: est.total_hours,
            uncapped_total_minutes: est.uncapped_total_minutes,
            energy_added_kwh: est.energy_added_kwh,
            charge_added_pct: est.session.end_soc - est.session.start_soc,
            start_power_kw: est.start_power_kw,
            capped: est.capped,
            uncapped: est.uncapped,
            merged,
        }
    });
    let notice = result.is_none().then(|| INVALID_RANGE_NOTICE.to_string());

    EstimateReport {
        source: store.power_source().label().to_string(),
        session: normalized,
        temperature_multiplier,
        power_curve,
        result,
        notice,
    }
}

/// Format minutes as "42 min" below an hour, otherwise "1h 5min".
pub fn format_duration(minutes: f64) -> String {
    if !minutes.is_finite() || minutes < 0.0 {
        return "-".to_string();
    }
    if minutes < 60.0 {
        return format!("{} min", minutes.round() as u64);
    }
    let mut hours = (minutes / 60.0).floor() as u64;
    let mut mins = (minutes % 60.0).round() as u64;
    if mins == 60 {
        hours += 1;
        mins = 0;
    }
    format!("{hours}h {mins}min")
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// Encode a report (or any part of one) as a newline-terminated JSON string.
pub fn encode<T: Serialize>(msg: &T, pretty: bool) -> Result<String, serde_json::Error> {
    let mut s = if pretty {
        serde_json::to_string_pretty(msg)?
    } else {
        serde_json::to_string(msg)?
    };
    s.push('\n');
    Ok(s)
}
