// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! User curve import from CSV.
//!
//! Accepts exports from charging loggers and spreadsheets: any delimiter of
//! `,` `;` or tab, localized column names, units in brackets, optional `%`
//! and `kW` suffixes on values and either `.` or `,` as decimal separator.
//! Rows whose SOC or power can't be read as a finite number are skipped.

use crate::curve::{UserCurve, UserCurvePoint};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read curve file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no SOC column in header [{0}]")]
    MissingSocColumn(String),
    #[error("no power column in header [{0}]")]
    MissingPowerColumn(String),
    #[error("no rows with a valid SOC and power")]
    NoValidRows,
}

/// Header names (after normalization) recognised as the SOC column.
const SOC_NAMES: &[&str] = &[
    "soc",
    "state of charge",
    "stato di carica",
    "livello batteria",
    "battery level",
    "charge level",
    "ladezustand",
    "etat de charge",
    "état de charge",
    "percentuale",
    "percent",
];

/// Header names (after normalization) recognised as the power column.
const POWER_NAMES: &[&str] = &[
    "power",
    "potenza",
    "leistung",
    "puissance",
    "potencia",
];

/// Parse CSV text into curve points, in file order.
pub fn parse_curve_csv(text: &str) -> Result<Vec<UserCurvePoint>, ImportError> {
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let header_list = || headers.iter().collect::<Vec<_>>().join(", ");

    let soc_idx = find_soc_column(&headers).ok_or_else(|| {
        ImportError::MissingSocColumn(header_list())
    })?;
    let power_idx = headers
        .iter()
        .enumerate()
        .position(|(i, h)| i != soc_idx && is_power_header(h))
        .ok_or_else(|| ImportError::MissingPowerColumn(header_list()))?;

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Skipping unreadable row {}: {e}", line + 2);
                dropped += 1;
                continue;
            }
        };
        let soc = record.get(soc_idx).and_then(parse_number);
        let power = record.get(power_idx).and_then(parse_number);
        match (soc, power) {
            (Some(soc), Some(power_kw)) => points.push(UserCurvePoint { soc, power_kw }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} curve row(s) without a valid SOC and power");
    }
    if points.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    log::info!("Parsed {} curve point(s)", points.len());
    Ok(points)
}

/// Parse CSV text into a ready-to-use (sorted) user curve.
pub fn import_user_curve(text: &str) -> Result<UserCurve, ImportError> {
    parse_curve_csv(text).map(UserCurve::new)
}

/// Read and parse a curve file.
pub fn load_user_curve(path: &Path) -> Result<UserCurve, ImportError> {
    let contents = fs::read_to_string(path)?;
    let curve = import_user_curve(&contents)?;
    log::info!("Loaded user curve from {}", path.display());
    Ok(curve)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pick the delimiter from the header line. A `;` wins over `,` since files
/// with comma decimals are usually semicolon separated.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header.contains(';') {
        b';'
    } else if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Lowercase, drop bracketed units and `%`, collapse separators.
fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            '%' => {}
            '_' | '-' | '.' if depth == 0 => out.push(' '),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn matches_any(normalized: &str, names: &[&str]) -> bool {
    names
        .iter()
        .any(|name| normalized == *name || normalized.contains(name))
}

fn is_power_header(raw: &str) -> bool {
    let h = normalize_header(raw);
    h == "kw" || matches_any(&h, POWER_NAMES)
}

fn is_soc_header(raw: &str) -> bool {
    let h = normalize_header(raw);
    (h.is_empty() && raw.contains('%')) || matches_any(&h, SOC_NAMES)
}

/// First SOC-like column that isn't also a power column ("Potenza di
/// carica" must not be taken for SOC), else the first SOC-like column.
fn find_soc_column(headers: &csv::StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|h| is_soc_header(h) && !is_power_header(h))
        .or_else(|| headers.iter().position(is_soc_header))
}

/// Parse a cell such as `80%`, `150 kW` or `72,5`.
fn parse_number(cell: &str) -> Option<f64> {
    let lower = cell.trim().to_ascii_lowercase();
    let stripped = lower
        .trim_end_matches('%')
        .trim_end()
        .trim_end_matches("kw")
        .trim();
    let value = stripped.replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bracketed_headers() {
        let csv = "SOC [%],Power [kW]\n10,150\n20,148.5\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(
            points,
            vec![
                UserCurvePoint { soc: 10.0, power_kw: 150.0 },
                UserCurvePoint { soc: 20.0, power_kw: 148.5 },
            ]
        );
    }

    #[test]
    fn test_parse_localized_semicolon_file() {
        let csv = "Stato di carica (%);Potenza (kW)\n15%;120,5 kW\n30 %;98,25\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], UserCurvePoint { soc: 15.0, power_kw: 120.5 });
        assert_eq!(points[1], UserCurvePoint { soc: 30.0, power_kw: 98.25 });
    }

    #[test]
    fn test_header_matching_is_case_insensitive() {
        let csv = "time,soc,AVG_POWER\n00:01:00,40,90\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(points, vec![UserCurvePoint { soc: 40.0, power_kw: 90.0 }]);
    }

    #[test]
    fn test_charging_power_column_is_not_taken_for_soc() {
        let csv = "Potenza di carica;Livello batteria\n110;20\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(points, vec![UserCurvePoint { soc: 20.0, power_kw: 110.0 }]);
    }

    #[test]
    fn test_quoted_comma_decimals() {
        let csv = "SOC,Power\n\"12,5\",\"99,9\"\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(points, vec![UserCurvePoint { soc: 12.5, power_kw: 99.9 }]);
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let csv = "SOC,Power\n10,150\nabc,140\n30,\n40,NaN\n50,inf\n60,80\n70\n";
        let points = parse_curve_csv(csv).unwrap();
        let socs: Vec<f64> = points.iter().map(|p| p.soc).collect();
        assert_eq!(socs, vec![10.0, 60.0]);
    }

    #[test]
    fn test_file_order_is_preserved() {
        let csv = "SOC,Power\n50,80\n10,150\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(points[0].soc, 50.0);
        let curve = import_user_curve(csv).unwrap();
        assert_eq!(curve.points()[0].soc, 10.0);
    }

    #[test]
    fn test_missing_columns() {
        assert!(matches!(
            parse_curve_csv("Time,Power\n1,2\n"),
            Err(ImportError::MissingSocColumn(_))
        ));
        assert!(matches!(
            parse_curve_csv("SOC,Energy [kWh]\n1,2\n"),
            Err(ImportError::MissingPowerColumn(_))
        ));
    }

    #[test]
    fn test_no_valid_rows() {
        assert!(matches!(
            parse_curve_csv("SOC,Power\nx,y\n"),
            Err(ImportError::NoValidRows)
        ));
        assert!(matches!(
            parse_curve_csv("SOC,Power\n"),
            Err(ImportError::NoValidRows)
        ));
    }

    #[test]
    fn test_tab_separated_with_bom() {
        let csv = "\u{feff}SoC\tkW\n55\t70\n";
        let points = parse_curve_csv(csv).unwrap();
        assert_eq!(points, vec![UserCurvePoint { soc: 55.0, power_kw: 70.0 }]);
    }

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number(" 80% "), Some(80.0));
        assert_eq!(parse_number("150kW"), Some(150.0));
        assert_eq!(parse_number("150 KW"), Some(150.0));
        assert_eq!(parse_number("72,5"), Some(72.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
    }

    #[test]
    fn test_load_user_curve_from_file() {
        let dir = std::env::temp_dir().join(format!("evcharge-import-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.csv");
        fs::write(&path, "SOC;Leistung [kW]\n60;80,5\n20;150\n").unwrap();

        let curve = load_user_curve(&path).unwrap();
        assert_eq!(
            curve.points(),
            &[
                UserCurvePoint { soc: 20.0, power_kw: 150.0 },
                UserCurvePoint { soc: 60.0, power_kw: 80.5 },
            ]
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_user_curve(Path::new("/nonexistent/evcharge/curve.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }
}
