//! Default calculator inputs, overridable from the environment
//!
//! Environment variables:
//!   PROJECTION_START_BALANCE, PROJECTION_RETURN_PCT, PROJECTION_INFLATION_PCT,
//!   PROJECTION_YEARS, PROJECTION_WITHDRAWAL
//!
//! Unset or unparseable values fall back to the built-in defaults.

use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::projection::ProjectionInput;

pub const DEFAULT_START_BALANCE: f64 = 5000.0;
pub const DEFAULT_RETURN_PCT: f64 = 5.0;
pub const DEFAULT_INFLATION_PCT: f64 = 4.7;
pub const DEFAULT_YEARS: i32 = 4;
pub const DEFAULT_WITHDRAWAL: f64 = 1000.0;

/// Calculator inputs in human units (rates as percentages)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorDefaults {
    pub start_balance: f64,
    pub return_pct: f64,
    pub inflation_pct: f64,
    pub years: i32,
    pub withdrawal: f64,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            start_balance: DEFAULT_START_BALANCE,
            return_pct: DEFAULT_RETURN_PCT,
            inflation_pct: DEFAULT_INFLATION_PCT,
            years: DEFAULT_YEARS,
            withdrawal: DEFAULT_WITHDRAWAL,
        }
    }
}

impl CalculatorDefaults {
    /// Read defaults from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read defaults through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();
        Self {
            start_balance: parse_or(&lookup, "PROJECTION_START_BALANCE", base.start_balance),
            return_pct: parse_or(&lookup, "PROJECTION_RETURN_PCT", base.return_pct),
            inflation_pct: parse_or(&lookup, "PROJECTION_INFLATION_PCT", base.inflation_pct),
            years: parse_or(&lookup, "PROJECTION_YEARS", base.years),
            withdrawal: parse_or(&lookup, "PROJECTION_WITHDRAWAL", base.withdrawal),
        }
    }

    /// Engine input with rates converted to multipliers
    pub fn to_input(&self) -> ProjectionInput {
        ProjectionInput::from_percentages(
            self.start_balance,
            self.return_pct,
            self.inflation_pct,
            self.years,
            self.withdrawal,
        )
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring unparseable {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}
