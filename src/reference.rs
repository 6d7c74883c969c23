// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Built-in reference charging session.
//!
//! Recorded on a DC fast charger from 14% to 100% with a pack of roughly
//! 82 kWh usable capacity. Peak power is 189 kW. Below 14% the pack takes
//! the 189 kW it started at, so the table is anchored at 0% with that power
//! and energy runs from 0 kWh there. The table is fixed for the lifetime of
//! the process.

use crate::curve::{ChargeCurve, CurvePoint};
use std::sync::LazyLock;

/// Name reported for the built-in curve.
pub const REFERENCE_CURVE_NAME: &str = "reference-dc-0-100";

// (soc %, average power kW, cumulative energy kWh, elapsed hh:mm:ss)
const REFERENCE_DATA: &[(f64, f64, f64, &str)] = &[
    (0.0, 189.0, 0.00, "00:00:00"),
    (14.0, 189.0, 11.48, "00:03:39"),
    (15.0, 187.0, 12.30, "00:03:54"),
    (16.0, 185.0, 13.12, "00:04:10"),
    (17.0, 187.0, 13.94, "00:04:26"),
    (18.0, 187.0, 14.76, "00:04:42"),
    (19.0, 188.0, 15.58, "00:04:58"),
    (20.0, 188.0, 16.40, "00:05:13"),
    (21.0, 189.0, 17.22, "00:05:29"),
    (22.0, 189.0, 18.04, "00:05:45"),
    (23.0, 174.0, 18.86, "00:06:01"),
    (24.0, 164.0, 19.68, "00:06:18"),
    (25.0, 166.0, 20.50, "00:06:36"),
    (26.0, 166.0, 21.32, "00:06:54"),
    (27.0, 165.0, 22.14, "00:07:12"),
    (28.0, 165.0, 22.96, "00:07:30"),
    (29.0, 167.0, 23.78, "00:07:48"),
    (30.0, 167.0, 24.60, "00:08:05"),
    (31.0, 164.0, 25.42, "00:08:23"),
    (32.0, 161.0, 26.24, "00:08:41"),
    (33.0, 158.0, 27.06, "00:09:00"),
    (34.0, 156.0, 27.88, "00:09:19"),
    (35.0, 154.0, 28.70, "00:09:38"),
    (36.0, 151.0, 29.52, "00:09:57"),
    (37.0, 147.0, 30.34, "00:10:17"),
    (38.0, 144.0, 31.16, "00:10:37"),
    (39.0, 142.0, 31.98, "00:10:58"),
    (40.0, 139.0, 32.80, "00:11:19"),
    (41.0, 137.0, 33.62, "00:11:40"),
    (42.0, 134.0, 34.44, "00:12:02"),
    (43.0, 122.0, 35.26, "00:12:25"),
    (44.0, 123.0, 36.08, "00:12:49"),
    (45.0, 121.0, 36.90, "00:13:13"),
    (46.0, 116.0, 37.72, "00:13:38"),
    (47.0, 112.0, 38.54, "00:14:04"),
    (48.0, 107.0, 39.36, "00:14:31"),
    (49.0, 104.0, 40.18, "00:14:59"),
    (50.0, 102.0, 41.00, "00:15:28"),
    (51.0, 98.0, 41.82, "00:15:57"),
    (52.0, 95.0, 42.64, "00:16:28"),
    (53.0, 92.0, 43.46, "00:16:59"),
    (54.0, 89.0, 44.28, "00:17:32"),
    (55.0, 87.0, 45.10, "00:18:05"),
    (56.0, 86.0, 45.92, "00:18:40"),
    (57.0, 85.0, 46.74, "00:19:14"),
    (58.0, 83.0, 47.56, "00:19:49"),
    (59.0, 82.0, 48.38, "00:20:25"),
    (60.0, 82.0, 49.20, "00:21:01"),
    (61.0, 80.0, 50.02, "00:21:37"),
    (62.0, 79.0, 50.84, "00:22:15"),
    (63.0, 78.0, 51.66, "00:22:52"),
    (64.0, 77.0, 52.48, "00:23:30"),
    (65.0, 76.0, 53.30, "00:24:09"),
    (66.0, 74.0, 54.12, "00:24:48"),
    (67.0, 73.0, 54.94, "00:25:28"),
    (68.0, 73.0, 55.76, "00:26:09"),
    (69.0, 73.0, 56.58, "00:26:49"),
    (70.0, 73.0, 57.40, "00:27:30"),
    (71.0, 73.0, 58.22, "00:28:10"),
    (72.0, 73.0, 59.04, "00:28:51"),
    (73.0, 72.0, 59.86, "00:29:31"),
    (74.0, 71.0, 60.68, "00:30:13"),
    (75.0, 69.0, 61.50, "00:30:55"),
    (76.0, 67.0, 62.32, "00:31:38"),
    (77.0, 64.0, 63.14, "00:32:23"),
    (78.0, 58.0, 63.96, "00:33:12"),
    (79.0, 57.0, 64.78, "00:34:03"),
    (80.0, 54.0, 65.60, "00:34:56"),
    (81.0, 51.0, 66.42, "00:35:52"),
    (82.0, 49.0, 67.24, "00:36:51"),
    (83.0, 47.0, 68.06, "00:37:53"),
    (84.0, 45.0, 68.88, "00:38:57"),
    (85.0, 44.0, 69.70, "00:40:03"),
    (86.0, 42.0, 70.52, "00:41:12"),
    (87.0, 42.0, 71.34, "00:42:22"),
    (88.0, 39.0, 72.16, "00:43:35"),
    (89.0, 38.0, 72.98, "00:44:52"),
    (90.0, 37.0, 73.80, "00:46:11"),
    (91.0, 35.0, 74.62, "00:47:33"),
    (92.0, 33.0, 75.44, "00:49:00"),
    (93.0, 32.0, 76.26, "00:50:30"),
    (94.0, 30.0, 77.08, "00:52:06"),
    (95.0, 27.0, 77.90, "00:53:49"),
    (96.0, 25.0, 78.72, "00:55:43"),
    (97.0, 23.0, 79.54, "00:57:46"),
    (98.0, 20.0, 80.36, "01:00:03"),
    (99.0, 15.0, 81.18, "01:02:52"),
    (100.0, 13.0, 82.00, "01:06:23"),
];

static REFERENCE: LazyLock<ChargeCurve> = LazyLock::new(|| {
    let points = REFERENCE_DATA
        .iter()
        .map(|&(soc, avg_power_kw, energy_kwh, time)| CurvePoint {
            soc,
            avg_power_kw,
            energy_kwh,
            time: time.to_string(),
        })
        .collect();
    ChargeCurve::new(REFERENCE_CURVE_NAME.to_string(), points)
});

/// The process-wide reference curve.
pub fn reference_curve() -> &'static ChargeCurve {
    &REFERENCE
}
