// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Charging-time simulation.
//!
//! Walks the requested SOC window in 1% steps. Each step needs the energy
//! the reference session put in over that percent, delivered at the
//! temperature-corrected power of the active curve. Two profiles come out:
//! one limited by the charger's power cap and one unlimited.

use crate::curve::{ChargeCurve, UserCurve};
use crate::reference;
use crate::store::{CurveStore, PowerSource};
use crate::temperature::{Chemistry, DEFAULT_AMBIENT_TEMP_C, TemperatureModel};
use serde::{Deserialize, Serialize};

/// Charger power cap used when the input is missing or not usable.
pub const DEFAULT_MAX_POWER_KW: f64 = 250.0;

/// Highest valid state of charge.
pub const MAX_SOC: u8 = 100;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Parameters of one charging estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeSession {
    /// Starting state of charge in percent
    pub start_soc: u8,
    /// Target state of charge in percent
    pub end_soc: u8,
    /// Charger power cap in kW
    pub max_power_kw: f64,
    /// Ambient temperature in degrees Celsius
    pub ambient_temp_c: f64,
    pub chemistry: Chemistry,
    /// Battery was preconditioned before arriving at the charger
    pub preheated: bool,
}

impl Default for ChargeSession {
    fn default() -> Self {
        Self {
            start_soc: 20,
            end_soc: 80,
            max_power_kw: DEFAULT_MAX_POWER_KW,
            ambient_temp_c: DEFAULT_AMBIENT_TEMP_C,
            chemistry: Chemistry::default(),
            preheated: false,
        }
    }
}

impl ChargeSession {
    pub fn new(
        start_soc: u8,
        end_soc: u8,
        max_power_kw: f64,
        ambient_temp_c: f64,
        chemistry: Chemistry,
        preheated: bool,
    ) -> Self {
        Self {
            start_soc,
            end_soc,
            max_power_kw,
            ambient_temp_c,
            chemistry,
            preheated,
        }
    }

    /// Whether the SOC window can be simulated (`start < end`).
    pub fn is_valid(&self) -> bool {
        self.start_soc.min(MAX_SOC) < self.end_soc.min(MAX_SOC)
    }

    /// Copy with SOCs clamped to 100 and unusable numbers replaced by
    /// defaults, so the simulation never sees NaN or infinity.
    pub fn normalized(&self) -> Self {
        let max_power_kw = if self.max_power_kw.is_finite() && self.max_power_kw > 0.0 {
            self.max_power_kw
        } else {
            log::warn!(
                "Invalid max power {}, using {DEFAULT_MAX_POWER_KW} kW",
                self.max_power_kw
            );
            DEFAULT_MAX_POWER_KW
        };
        let ambient_temp_c = if self.ambient_temp_c.is_finite() {
            self.ambient_temp_c
        } else {
            log::warn!(
                "Invalid ambient temperature {}, using {DEFAULT_AMBIENT_TEMP_C}°C",
                self.ambient_temp_c
            );
            DEFAULT_AMBIENT_TEMP_C
        };
        Self {
            start_soc: self.start_soc.min(MAX_SOC),
            end_soc: self.end_soc.min(MAX_SOC),
            max_power_kw,
            ambient_temp_c,
            ..*self
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One sample of a charging profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub soc: u8,
    pub elapsed_minutes: f64,
    /// Power delivered during the step ending at this SOC, in kW
    pub power_kw: f64,
    pub elapsed_hours: f64,
}

/// SOC against elapsed time, one point per integer SOC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingProfile {
    pub points: Vec<ProfilePoint>,
}

impl ChargingProfile {
    fn push(&mut self, soc: u8, elapsed_minutes: f64, power_kw: f64) {
        self.points.push(ProfilePoint {
            soc,
            elapsed_minutes,
            power_kw,
            elapsed_hours: elapsed_minutes / 60.0,
        });
    }

    pub fn total_minutes(&self) -> f64 {
        self.points.last().map(|p| p.elapsed_minutes).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (elapsed minutes, SOC) pairs in time order.
    pub fn time_series(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.elapsed_minutes, p.soc as f64))
            .collect()
    }
}

/// Result of a charging simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeEstimate {
    /// The session actually simulated, after normalization
    pub session: ChargeSession,
    /// Charging time with the power cap applied
    pub total_minutes: f64,
    pub total_hours: f64,
    /// Charging time if the charger could deliver whatever the pack accepts
    pub uncapped_total_minutes: f64,
    /// Energy put into the pack between start and end SOC
    pub energy_added_kwh: f64,
    /// Capped, corrected power at the start SOC
    pub start_power_kw: f64,
    pub capped: ChargingProfile,
    pub uncapped: ChargingProfile,
}

/// Power at one SOC along the curve, before and after corrections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCurveSample {
    pub soc: u8,
    /// Power from the active curve
    pub base_power_kw: f64,
    /// After temperature derating
    pub corrected_power_kw: f64,
    /// After derating and the charger cap
    pub applied_power_kw: f64,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Simulate a session against the store's active power source.
///
/// Returns `None` when `start_soc >= end_soc`.
pub fn simulate(
    store: &CurveStore,
    temperature: &TemperatureModel,
    session: &ChargeSession,
) -> Option<ChargeEstimate> {
    run(store.reference(), store.power_source(), temperature, session)
}

/// Simulate with the built-in reference and derating tables, optionally
/// taking power from a user curve.
///
/// Returns `None` when `start_soc >= end_soc`.
pub fn estimate(session: &ChargeSession, user_curve: Option<&UserCurve>) -> Option<ChargeEstimate> {
    let reference = reference::reference_curve();
    let source = match user_curve {
        Some(curve) if !curve.is_empty() => PowerSource::User(curve),
        _ => PowerSource::Reference(reference),
    };
    run(reference, source, &TemperatureModel::default(), session)
}

fn run(
    reference: &ChargeCurve,
    source: PowerSource<'_>,
    temperature: &TemperatureModel,
    session: &ChargeSession,
) -> Option<ChargeEstimate> {
    let session = session.normalized();
    if !session.is_valid() {
        log::debug!(
            "Nothing to simulate: start SOC {} >= end SOC {}",
            session.start_soc,
            session.end_soc
        );
        return None;
    }

    let corrected = |soc: f64| {
        temperature.apply_correction(
            source.power_at(soc),
            session.ambient_temp_c,
            session.chemistry,
            session.preheated,
        )
    };
    let cap = session.max_power_kw;

    let mut capped = ChargingProfile::default();
    let mut uncapped = ChargingProfile::default();

    let start = session.start_soc as f64;
    let start_power = corrected(start);
    capped.push(session.start_soc, 0.0, start_power.min(cap));
    uncapped.push(session.start_soc, 0.0, start_power);

    let mut capped_minutes = 0.0;
    let mut uncapped_minutes = 0.0;
    let mut prev_energy = reference.energy_at(start);

    for soc in session.start_soc + 1..=session.end_soc {
        let s = soc as f64;
        let energy = reference.energy_at(s);
        let delta_kwh = energy - prev_energy;
        prev_energy = energy;

        let power = corrected(s);
        let capped_power = power.min(cap);

        capped_minutes += step_minutes(delta_kwh, capped_power);
        uncapped_minutes += step_minutes(delta_kwh, power);

        capped.push(soc, capped_minutes, capped_power);
        uncapped.push(soc, uncapped_minutes, power);
    }

    let energy_added_kwh = reference.energy_at(session.end_soc as f64) - reference.energy_at(start);

    log::debug!(
        "{}%->{}% on {}: {capped_minutes:.1} min capped, {uncapped_minutes:.1} min uncapped, {energy_added_kwh:.2} kWh",
        session.start_soc,
        session.end_soc,
        source.label()
    );

    Some(ChargeEstimate {
        session,
        total_minutes: capped_minutes,
        total_hours: capped_minutes / 60.0,
        uncapped_total_minutes: uncapped_minutes,
        energy_added_kwh,
        start_power_kw: start_power.min(cap),
        capped,
        uncapped,
    })
}

/// Minutes needed to deliver `energy_kwh` at `power_kw`. A step with no
/// power takes no time.
fn step_minutes(energy_kwh: f64, power_kw: f64) -> f64 {
    if power_kw > 0.0 {
        energy_kwh / power_kw * 60.0
    } else {
        0.0
    }
}

/// Power along the curve for every integer SOC between the session's start
/// and end (inclusive, in ascending order).
pub fn power_curve(
    store: &CurveStore,
    temperature: &TemperatureModel,
    session: &ChargeSession,
) -> Vec<PowerCurveSample> {
    let session = session.normalized();
    let source = store.power_source();
    let lo = session.start_soc.min(session.end_soc);
    let hi = session.start_soc.max(session.end_soc);

    (lo..=hi)
        .map(|soc| {
            let base_power_kw = source.power_at(soc as f64);
            let corrected_power_kw = temperature.apply_correction(
                base_power_kw,
                session.ambient_temp_c,
                session.chemistry,
                session.preheated,
            );
            PowerCurveSample {
                soc,
                base_power_kw,
                corrected_power_kw,
                applied_power_kw: corrected_power_kw.min(session.max_power_kw),
            }
        })
        .collect()
}
