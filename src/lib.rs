// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! EV DC fast-charging estimator.
//!
//! Estimates charging time and the power profile between two states of
//! charge from a recorded reference session, a charger power cap, ambient
//! temperature and battery chemistry. A user-supplied CSV curve can replace
//! the reference as the source of charging power.

pub mod config;
pub mod curve;
pub mod import;
pub mod merge;
pub mod reference;
pub mod report;
pub mod simulator;
pub mod store;
pub mod temperature;
