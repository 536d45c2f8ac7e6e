//! Conversion between percentage rates and growth multipliers
//!
//! The engine only ever sees multipliers (1.05 = +5%). Anything that takes
//! human input (CLI flags, scenario files, environment) converts here first.

/// Convert a percentage rate to a growth multiplier (5.0 -> 1.05)
pub fn multiplier_from_percent(pct: f64) -> f64 {
    1.0 + pct / 100.0
}

/// Convert a growth multiplier back to a percentage rate (1.05 -> 5.0)
pub fn percent_from_multiplier(multiplier: f64) -> f64 {
    (multiplier - 1.0) * 100.0
}
