// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Curve store: the built-in reference session plus an optional user curve.
//!
//! An imported user curve replaces the reference as the source of charging
//! power. Energy accounting always uses the reference curve.

use crate::curve::{ChargeCurve, UserCurve};
use crate::import::{self, ImportError};
use crate::reference;
use std::path::Path;

/// Where the simulator reads base charging power from.
#[derive(Debug, Clone, Copy)]
pub enum PowerSource<'a> {
    Reference(&'a ChargeCurve),
    User(&'a UserCurve),
}

impl PowerSource<'_> {
    /// Base (uncorrected, uncapped) power at `soc` in kW.
    pub fn power_at(&self, soc: f64) -> f64 {
        match self {
            PowerSource::Reference(curve) => curve.power_at(soc),
            PowerSource::User(curve) => curve.power_at(soc).unwrap_or(0.0),
        }
    }

    pub fn peak_power_kw(&self) -> f64 {
        match self {
            PowerSource::Reference(curve) => curve.peak_power_kw(),
            PowerSource::User(curve) => curve.peak_power_kw(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PowerSource::Reference(curve) => &curve.name,
            PowerSource::User(_) => "imported",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurveStore {
    reference: &'static ChargeCurve,
    user: Option<UserCurve>,
}

impl Default for CurveStore {
    fn default() -> Self {
        Self {
            reference: reference::reference_curve(),
            user: None,
        }
    }
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by the built-in reference and the given user curve.
    pub fn with_user_curve(curve: UserCurve) -> Self {
        let mut store = Self::default();
        store.set_user_curve(curve);
        store
    }

    pub fn reference(&self) -> &ChargeCurve {
        self.reference
    }

    pub fn user_curve(&self) -> Option<&UserCurve> {
        self.user.as_ref()
    }

    /// The imported curve if present and non-empty, otherwise the reference.
    pub fn power_source(&self) -> PowerSource<'_> {
        match &self.user {
            Some(curve) if !curve.is_empty() => PowerSource::User(curve),
            _ => PowerSource::Reference(self.reference),
        }
    }

    /// Replace the user curve. An empty curve is ignored.
    pub fn set_user_curve(&mut self, curve: UserCurve) -> bool {
        if curve.is_empty() {
            log::warn!("Ignoring empty user curve, keeping current power source");
            return false;
        }
        log::info!("Using imported curve with {} point(s)", curve.len());
        self.user = Some(curve);
        true
    }

    /// Import CSV text as the new user curve.
    ///
    /// On failure (including a file with no usable rows) the current power
    /// source stays active. Returns the number of imported points.
    pub fn import_csv(&mut self, text: &str) -> Result<usize, ImportError> {
        let curve = import::import_user_curve(text)?;
        let n = curve.len();
        self.set_user_curve(curve);
        Ok(n)
    }

    /// Import a CSV file as the new user curve. See [`CurveStore::import_csv`].
    pub fn import_file(&mut self, path: &Path) -> Result<usize, ImportError> {
        let curve = import::load_user_curve(path)?;
        let n = curve.len();
        self.set_user_curve(curve);
        Ok(n)
    }

    /// Drop the user curve and fall back to the reference.
    pub fn clear_user_curve(&mut self) -> bool {
        let had = self.user.take().is_some();
        if had {
            log::info!("Removed imported curve, using reference curve");
        }
        had
    }
}
