// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Charge curve definitions and interpolation.
//!
//! A charge curve maps battery state of charge (percent) to charging power,
//! cumulative energy and elapsed session time. Values between recorded
//! points are linearly interpolated; queries outside the recorded SOC range
//! are clamped to the boundary points.

use serde::{Deserialize, Serialize};

/// A single point on a recorded charge curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    /// State of charge in percent (0-100)
    pub soc: f64,
    /// Average charging power at this SOC, in kW
    pub avg_power_kw: f64,
    /// Energy delivered since the start of the recorded session, in kWh
    pub energy_kwh: f64,
    /// Elapsed session time at this SOC, formatted as "hh:mm:ss"
    pub time: String,
}

/// A point on a user-imported curve. Only power is known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UserCurvePoint {
    /// State of charge in percent
    pub soc: f64,
    /// Charging power in kW
    pub power_kw: f64,
}

/// Fields of a [`CurvePoint`] that can be looked up by SOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveField {
    Soc,
    AvgPower,
    Energy,
    /// Elapsed time. Always resolved in minutes.
    Time,
}

/// Fields of a [`UserCurvePoint`] that can be looked up by SOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Soc,
    Power,
}

/// The value of a curve field at some SOC.
///
/// Numeric fields interpolate. A field that cannot be read as a number
/// (e.g. a malformed time string) is returned as-is from the lower point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Raw(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Raw(_) => None,
        }
    }
}

/// Anything that sits on a SOC axis and exposes named fields.
pub trait SocSample {
    type Field: Copy;

    fn soc(&self) -> f64;
    fn field(&self, field: Self::Field) -> FieldValue;
}

impl SocSample for CurvePoint {
    type Field = CurveField;

    fn soc(&self) -> f64 {
        self.soc
    }

    fn field(&self, field: CurveField) -> FieldValue {
        match field {
            CurveField::Soc => FieldValue::Number(self.soc),
            CurveField::AvgPower => FieldValue::Number(self.avg_power_kw),
            CurveField::Energy => FieldValue::Number(self.energy_kwh),
            CurveField::Time => match parse_elapsed_minutes(&self.time) {
                Some(minutes) => FieldValue::Number(minutes),
                None => FieldValue::Raw(self.time.clone()),
            },
        }
    }
}

impl SocSample for UserCurvePoint {
    type Field = UserField;

    fn soc(&self) -> f64 {
        self.soc
    }

    fn field(&self, field: UserField) -> FieldValue {
        match field {
            UserField::Soc => FieldValue::Number(self.soc),
            UserField::Power => FieldValue::Number(self.power_kw),
        }
    }
}

/// Look up `field` at `soc` on an arbitrary curve.
///
/// - Below the lowest SOC: returns the first point's value
/// - Above the highest SOC: returns the last point's value
/// - On a recorded SOC: returns that point's value exactly
/// - Between two points: linear interpolation
///
/// The nearest lower point (highest SOC <= query) and nearest upper point
/// (lowest SOC >= query) are found with a full scan, so the lookup does not
/// depend on a prebuilt index. Returns `None` only for an empty curve.
pub fn interpolate<P: SocSample>(points: &[P], soc: f64, field: P::Field) -> Option<FieldValue> {
    let first = points.first()?;
    let last = &points[points.len() - 1];

    let mut lower: Option<&P> = None;
    let mut upper: Option<&P> = None;
    for p in points {
        let s = p.soc();
        if s <= soc && lower.is_none_or(|lo| s >= lo.soc()) {
            lower = Some(p);
        }
        if s >= soc && upper.is_none_or(|hi| s < hi.soc()) {
            upper = Some(p);
        }
    }

    let (lo, hi) = match (lower, upper) {
        (None, _) => return Some(first.field(field)),
        (_, None) => return Some(last.field(field)),
        (Some(lo), Some(hi)) => (lo, hi),
    };

    if lo.soc() == hi.soc() {
        return Some(lo.field(field));
    }

    match (lo.field(field), hi.field(field)) {
        (FieldValue::Number(a), FieldValue::Number(b)) => {
            let ratio = (soc - lo.soc()) / (hi.soc() - lo.soc());
            Some(FieldValue::Number(a + ratio * (b - a)))
        }
        (raw, _) => Some(raw),
    }
}

/// Parse an "hh:mm:ss" elapsed time into minutes.
pub fn parse_elapsed_minutes(s: &str) -> Option<f64> {
    let mut parts = s.trim().split(':');
    let h = parts.next()?.trim().parse::<f64>().ok()?;
    let m = parts.next()?.trim().parse::<f64>().ok()?;
    let sec = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let minutes = h * 60.0 + m + sec / 60.0;
    minutes.is_finite().then_some(minutes)
}

// ---------------------------------------------------------------------------
// Reference curve
// ---------------------------------------------------------------------------

/// A recorded reference charging session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeCurve {
    /// Human-readable name of the recorded session
    pub name: String,
    /// Points ordered by ascending SOC
    pub points: Vec<CurvePoint>,
}

impl ChargeCurve {
    pub fn new(name: String, points: Vec<CurvePoint>) -> Self {
        Self { name, points }
    }

    pub fn value_at(&self, soc: f64, field: CurveField) -> Option<FieldValue> {
        interpolate(&self.points, soc, field)
    }

    /// Numeric value of `field` at `soc`, or `None` if the curve is empty or
    /// the field is not numeric there.
    pub fn number_at(&self, soc: f64, field: CurveField) -> Option<f64> {
        self.value_at(soc, field).and_then(|v| v.as_number())
    }

    /// Average power at `soc` in kW (0 for an empty curve).
    pub fn power_at(&self, soc: f64) -> f64 {
        self.number_at(soc, CurveField::AvgPower).unwrap_or(0.0)
    }

    /// Cumulative energy at `soc` in kWh (0 for an empty curve).
    pub fn energy_at(&self, soc: f64) -> f64 {
        self.number_at(soc, CurveField::Energy).unwrap_or(0.0)
    }

    /// Elapsed time of the recorded session at `soc`, in minutes.
    pub fn elapsed_minutes_at(&self, soc: f64) -> Option<f64> {
        self.number_at(soc, CurveField::Time)
    }

    /// Lowest and highest recorded SOC.
    pub fn soc_range(&self) -> Option<(f64, f64)> {
        soc_range(&self.points)
    }

    pub fn peak_power_kw(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.avg_power_kw)
            .fold(0.0, f64::max)
    }

    /// Validate ordering invariants: SOC non-decreasing, energy and time
    /// non-decreasing with SOC.
    pub fn validate(&self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("Curve has no points".to_string());
        }
        for (i, pair) in self.points.windows(2).enumerate() {
            let (prev, p) = (&pair[0], &pair[1]);
            if p.soc < prev.soc {
                return Err(format!("SOC must be non-decreasing (point {})", i + 1));
            }
            if p.energy_kwh < prev.energy_kwh {
                return Err(format!("Energy must be non-decreasing (point {})", i + 1));
            }
            let (Some(t0), Some(t1)) = (
                parse_elapsed_minutes(&prev.time),
                parse_elapsed_minutes(&p.time),
            ) else {
                return Err(format!("Malformed time near point {}", i + 1));
            };
            if t1 < t0 {
                return Err(format!("Time must be non-decreasing (point {})", i + 1));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// User curve
// ---------------------------------------------------------------------------

/// A power-vs-SOC curve imported by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCurve {
    points: Vec<UserCurvePoint>,
}

impl UserCurve {
    /// Create a user curve. Points are sorted by SOC automatically.
    pub fn new(mut points: Vec<UserCurvePoint>) -> Self {
        points.sort_by(|a, b| a.soc.total_cmp(&b.soc));
        Self { points }
    }

    pub fn points(&self) -> &[UserCurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Power at `soc`, clamped to the boundary values outside the curve.
    pub fn power_at(&self, soc: f64) -> Option<f64> {
        interpolate(&self.points, soc, UserField::Power).and_then(|v| v.as_number())
    }

    pub fn soc_range(&self) -> Option<(f64, f64)> {
        soc_range(&self.points)
    }

    pub fn peak_power_kw(&self) -> f64 {
        self.points.iter().map(|p| p.power_kw).fold(0.0, f64::max)
    }
}

fn soc_range<P: SocSample>(points: &[P]) -> Option<(f64, f64)> {
    let first = points.first()?.soc();
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.soc()), hi.max(p.soc()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(soc: f64, power: f64, energy: f64, time: &str) -> CurvePoint {
        CurvePoint {
            soc,
            avg_power_kw: power,
            energy_kwh: energy,
            time: time.to_string(),
        }
    }

    fn sample_curve() -> ChargeCurve {
        ChargeCurve::new(
            "sample".to_string(),
            vec![
                point(10.0, 100.0, 0.0, "00:00:00"),
                point(20.0, 150.0, 8.0, "00:04:00"),
                point(40.0, 50.0, 24.0, "00:16:30"),
            ],
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_interpolation_below_range() {
        let curve = sample_curve();
        assert_eq!(curve.power_at(0.0), 100.0);
        assert_eq!(curve.power_at(-5.0), 100.0);
    }

    #[test]
    fn test_interpolation_above_range() {
        let curve = sample_curve();
        assert_eq!(curve.power_at(99.0), 50.0);
        assert_eq!(curve.energy_at(100.0), 24.0);
    }

    #[test]
    fn test_interpolation_exact_point() {
        let curve = sample_curve();
        assert_eq!(curve.power_at(20.0), 150.0);
        assert_eq!(curve.energy_at(40.0), 24.0);
    }

    #[test]
    fn test_interpolation_midpoint() {
        let curve = sample_curve();
        assert!(approx(curve.power_at(15.0), 125.0));
        assert!(approx(curve.power_at(30.0), 100.0));
        assert!(approx(curve.energy_at(30.0), 16.0));
    }

    #[test]
    fn test_interpolation_stays_between_brackets() {
        let curve = sample_curve();
        for tenth in 100..=400 {
            let soc = tenth as f64 / 10.0;
            let p = curve.power_at(soc);
            let (lo, hi) = if soc <= 20.0 { (100.0, 150.0) } else { (50.0, 150.0) };
            assert!(p >= lo - 1e-9 && p <= hi + 1e-9, "power {p} at {soc}");
        }
    }

    #[test]
    fn test_time_field_resolves_to_minutes() {
        let curve = sample_curve();
        assert!(approx(curve.elapsed_minutes_at(20.0).unwrap(), 4.0));
        assert!(approx(curve.elapsed_minutes_at(40.0).unwrap(), 16.5));
        assert!(approx(curve.elapsed_minutes_at(30.0).unwrap(), 10.25));
    }

    #[test]
    fn test_malformed_time_falls_back_to_lower_raw_value() {
        let points = vec![
            point(0.0, 10.0, 0.0, "garbage"),
            point(10.0, 20.0, 1.0, "00:10:00"),
        ];
        assert_eq!(
            interpolate(&points, 5.0, CurveField::Time),
            Some(FieldValue::Raw("garbage".to_string()))
        );
    }

    #[test]
    fn test_unsorted_curve_still_finds_nearest_points() {
        let points = vec![
            point(40.0, 50.0, 24.0, "00:16:30"),
            point(10.0, 100.0, 0.0, "00:00:00"),
            point(20.0, 150.0, 8.0, "00:04:00"),
        ];
        let v = interpolate(&points, 30.0, CurveField::AvgPower).unwrap();
        assert_eq!(v, FieldValue::Number(100.0));
    }

    #[test]
    fn test_empty_curve_returns_none() {
        let points: Vec<CurvePoint> = Vec::new();
        assert_eq!(interpolate(&points, 50.0, CurveField::AvgPower), None);
        let curve = ChargeCurve::new("empty".to_string(), points);
        assert_eq!(curve.power_at(50.0), 0.0);
    }

    #[test]
    fn test_parse_elapsed_minutes() {
        assert_eq!(parse_elapsed_minutes("01:02:30"), Some(62.5));
        assert_eq!(parse_elapsed_minutes("00:00:00"), Some(0.0));
        assert_eq!(parse_elapsed_minutes("12:30"), None);
        assert_eq!(parse_elapsed_minutes("aa:bb:cc"), None);
    }

    #[test]
    fn test_user_curve_sorts_and_clamps() {
        let curve = UserCurve::new(vec![
            UserCurvePoint { soc: 80.0, power_kw: 40.0 },
            UserCurvePoint { soc: 20.0, power_kw: 120.0 },
            UserCurvePoint { soc: 50.0, power_kw: 90.0 },
        ]);
        assert_eq!(curve.points()[0].soc, 20.0);
        assert_eq!(curve.power_at(10.0), Some(120.0));
        assert_eq!(curve.power_at(95.0), Some(40.0));
        assert_eq!(curve.power_at(50.0), Some(90.0));
        assert!(approx(curve.power_at(35.0).unwrap(), 105.0));
        assert_eq!(curve.soc_range(), Some((20.0, 80.0)));
        assert_eq!(curve.peak_power_kw(), 120.0);
    }

    #[test]
    fn test_validation_rejects_decreasing_soc() {
        let curve = ChargeCurve::new(
            "bad".to_string(),
            vec![
                point(20.0, 100.0, 0.0, "00:00:00"),
                point(10.0, 100.0, 1.0, "00:01:00"),
            ],
        );
        assert!(curve.validate().is_err());
        assert!(sample_curve().validate().is_ok());
    }
}
