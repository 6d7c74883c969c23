// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Cold-weather power derating.
//!
//! Each battery chemistry has a table of (temperature, multiplier)
//! breakpoints. The multiplier is linearly interpolated between breakpoints
//! and scales the charging power the pack will accept.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Ambient temperature assumed when the input is missing or not a number.
pub const DEFAULT_AMBIENT_TEMP_C: f64 = 20.0;

/// Battery cell chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Chemistry {
    Lfp,
    Nmc,
    Nca,
    #[default]
    Unknown,
}

impl Chemistry {
    pub const ALL: [Chemistry; 4] = [
        Chemistry::Lfp,
        Chemistry::Nmc,
        Chemistry::Nca,
        Chemistry::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Chemistry::Lfp => "LFP",
            Chemistry::Nmc => "NMC",
            Chemistry::Nca => "NCA",
            Chemistry::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Chemistry {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// Parsing never fails: anything unrecognised is [`Chemistry::Unknown`].
impl FromStr for Chemistry {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "LFP" | "LIFEPO4" => Chemistry::Lfp,
            "NMC" => Chemistry::Nmc,
            "NCA" => Chemistry::Nca,
            _ => Chemistry::Unknown,
        })
    }
}

/// A single derating breakpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Breakpoint {
    /// Ambient temperature in degrees Celsius
    pub temp_c: f64,
    /// Fraction of nominal power available at this temperature (0-1)
    pub multiplier: f64,
}

const fn bp(temp_c: f64, multiplier: f64) -> Breakpoint {
    Breakpoint { temp_c, multiplier }
}

const NMC_TABLE: [Breakpoint; 4] = [bp(0.0, 0.45), bp(10.0, 0.70), bp(20.0, 0.95), bp(25.0, 1.0)];
const NCA_TABLE: [Breakpoint; 4] = NMC_TABLE;
// LFP derates harder in the deep cold but recovers faster.
const LFP_TABLE: [Breakpoint; 4] = [bp(0.0, 0.35), bp(10.0, 0.60), bp(20.0, 0.93), bp(25.0, 1.0)];
const UNKNOWN_TABLE: [Breakpoint; 4] =
    [bp(0.0, 0.40), bp(10.0, 0.65), bp(20.0, 0.94), bp(25.0, 1.0)];

/// Built-in breakpoint table for a chemistry.
pub fn default_table(chemistry: Chemistry) -> &'static [Breakpoint] {
    match chemistry {
        Chemistry::Lfp => &LFP_TABLE,
        Chemistry::Nmc => &NMC_TABLE,
        Chemistry::Nca => &NCA_TABLE,
        Chemistry::Unknown => &UNKNOWN_TABLE,
    }
}

/// Per-chemistry derating tables.
#[derive(Debug, Clone)]
pub struct TemperatureModel {
    tables: HashMap<Chemistry, Vec<Breakpoint>>,
}

impl Default for TemperatureModel {
    fn default() -> Self {
        let tables = Chemistry::ALL
            .iter()
            .map(|&c| (c, default_table(c).to_vec()))
            .collect();
        Self { tables }
    }
}

impl TemperatureModel {
    /// Built-in tables with some chemistries replaced. Override tables are
    /// sorted by temperature.
    pub fn with_overrides(overrides: &HashMap<Chemistry, Vec<Breakpoint>>) -> Self {
        let mut model = Self::default();
        for (&chemistry, table) in overrides {
            let mut table = table.clone();
            table.sort_by(|a, b| a.temp_c.total_cmp(&b.temp_c));
            log::info!(
                "Using custom derating table for {chemistry} ({} breakpoints)",
                table.len()
            );
            model.tables.insert(chemistry, table);
        }
        model
    }

    /// Breakpoints for `chemistry`, falling back to the UNKNOWN table.
    pub fn table(&self, chemistry: Chemistry) -> &[Breakpoint] {
        self.tables
            .get(&chemistry)
            .or_else(|| self.tables.get(&Chemistry::Unknown))
            .map(Vec::as_slice)
            .unwrap_or(&UNKNOWN_TABLE)
    }

    /// Power multiplier in [0, 1] for the given conditions.
    ///
    /// A preheated pack always gets the full multiplier of 1.
    pub fn multiplier(&self, temp_c: f64, chemistry: Chemistry, is_preheated: bool) -> f64 {
        derate(temp_c, self.table(chemistry), is_preheated)
    }

    /// Scale `power_kw` by the temperature multiplier.
    pub fn apply_correction(
        &self,
        power_kw: f64,
        temp_c: f64,
        chemistry: Chemistry,
        is_preheated: bool,
    ) -> f64 {
        power_kw * self.multiplier(temp_c, chemistry, is_preheated)
    }
}

/// Multiplier from the built-in tables.
pub fn multiplier(temp_c: f64, chemistry: Chemistry, is_preheated: bool) -> f64 {
    derate(temp_c, default_table(chemistry), is_preheated)
}

/// Correct `power_kw` using the built-in tables.
pub fn apply_correction(power_kw: f64, temp_c: f64, chemistry: Chemistry, is_preheated: bool) -> f64 {
    power_kw * multiplier(temp_c, chemistry, is_preheated)
}

fn derate(temp_c: f64, table: &[Breakpoint], is_preheated: bool) -> f64 {
    if is_preheated {
        return 1.0;
    }
    let temp_c = if temp_c.is_finite() {
        temp_c
    } else {
        DEFAULT_AMBIENT_TEMP_C
    };
    let raw = interpolate_multiplier(temp_c, table);
    if raw.is_nan() { 1.0 } else { raw.clamp(0.0, 1.0) }
}

/// Linear interpolation over a table sorted by ascending temperature.
///
/// - Below the coldest breakpoint: that breakpoint's multiplier
/// - At or above the warmest breakpoint: full power (1.0)
fn interpolate_multiplier(temp_c: f64, table: &[Breakpoint]) -> f64 {
    let Some(first) = table.first() else {
        return 1.0;
    };
    if temp_c <= first.temp_c {
        return first.multiplier;
    }
    let last = &table[table.len() - 1];
    if temp_c >= last.temp_c {
        return 1.0;
    }

    for window in table.windows(2) {
        let lo = &window[0];
        let hi = &window[1];
        if temp_c >= lo.temp_c && temp_c <= hi.temp_c {
            let range = hi.temp_c - lo.temp_c;
            if range == 0.0 {
                return lo.multiplier;
            }
            let ratio = (temp_c - lo.temp_c) / range;
            return lo.multiplier + ratio * (hi.multiplier - lo.multiplier);
        }
    }

    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reference_temperature_is_full_power() {
        for chem in Chemistry::ALL {
            assert_eq!(multiplier(25.0, chem, false), 1.0);
            assert_eq!(multiplier(40.0, chem, false), 1.0);
        }
    }

    #[test]
    fn test_preheated_is_always_full_power() {
        for chem in Chemistry::ALL {
            for temp in [-30.0, 0.0, 12.5, 25.0, 45.0, f64::NAN] {
                assert_eq!(multiplier(temp, chem, true), 1.0);
            }
        }
    }

    #[test]
    fn test_below_coldest_breakpoint_clamps() {
        assert_eq!(multiplier(-20.0, Chemistry::Nmc, false), 0.45);
        assert_eq!(multiplier(-20.0, Chemistry::Lfp, false), 0.35);
        assert_eq!(multiplier(0.0, Chemistry::Unknown, false), 0.40);
    }

    #[test]
    fn test_interpolates_between_breakpoints() {
        assert!(approx(multiplier(5.0, Chemistry::Nmc, false), 0.575));
        assert!(approx(multiplier(15.0, Chemistry::Lfp, false), 0.765));
        assert!(approx(multiplier(22.5, Chemistry::Nca, false), 0.975));
    }

    #[test]
    fn test_monotonic_up_to_reference() {
        for chem in Chemistry::ALL {
            let mut prev = 0.0;
            for tenth in -100..=250 {
                let m = multiplier(tenth as f64 / 10.0, chem, false);
                assert!(m >= prev, "{chem} not monotonic at {}", tenth as f64 / 10.0);
                prev = m;
            }
        }
    }

    #[test]
    fn test_non_finite_temperature_uses_default() {
        assert_eq!(
            multiplier(f64::NAN, Chemistry::Nmc, false),
            multiplier(DEFAULT_AMBIENT_TEMP_C, Chemistry::Nmc, false)
        );
        assert!(approx(multiplier(f64::INFINITY, Chemistry::Nmc, false), 0.95));
    }

    #[test]
    fn test_apply_correction() {
        assert!(approx(apply_correction(200.0, 10.0, Chemistry::Nmc, false), 140.0));
        assert_eq!(apply_correction(200.0, -5.0, Chemistry::Lfp, true), 200.0);
    }

    #[test]
    fn test_override_table_is_sorted_and_clamped() {
        let mut overrides = HashMap::new();
        overrides.insert(
            Chemistry::Lfp,
            vec![bp(30.0, 1.0), bp(-10.0, -0.5), bp(10.0, 1.7)],
        );
        let model = TemperatureModel::with_overrides(&overrides);
        assert_eq!(model.table(Chemistry::Lfp)[0].temp_c, -10.0);
        assert_eq!(model.multiplier(-20.0, Chemistry::Lfp, false), 0.0);
        assert_eq!(model.multiplier(10.0, Chemistry::Lfp, false), 1.0);
        // Untouched chemistries keep their built-in tables.
        assert!(approx(model.multiplier(5.0, Chemistry::Nmc, false), 0.575));
    }

    #[test]
    fn test_empty_table_means_no_derating() {
        let mut overrides = HashMap::new();
        overrides.insert(Chemistry::Nca, Vec::new());
        let model = TemperatureModel::with_overrides(&overrides);
        assert_eq!(model.multiplier(-15.0, Chemistry::Nca, false), 1.0);
    }

    #[test]
    fn test_chemistry_parsing() {
        assert_eq!("lfp".parse::<Chemistry>(), Ok(Chemistry::Lfp));
        assert_eq!(" NMC ".parse::<Chemistry>(), Ok(Chemistry::Nmc));
        assert_eq!("sodium".parse::<Chemistry>(), Ok(Chemistry::Unknown));
        assert_eq!(Chemistry::Nca.to_string(), "NCA");
    }
}
