//! Core projection engine for yearly balance projections

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::rates::multiplier_from_percent;
use crate::error::ProjectionError;

/// Decimal places kept on every projected balance
pub const BALANCE_DECIMALS: u32 = 3;

/// Years of balances reserved up front; longer horizons grow the series as
/// they go
const PREALLOCATED_YEARS: usize = 1024;

/// Inputs for a single projection run
///
/// `return_rate` and `inflation_rate` are multipliers: 1.05 means the balance
/// grows by 5% in a year. Use [`ProjectionInput::from_percentages`] when the
/// rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Balance at year 0
    pub start_balance: f64,

    /// Annual return multiplier
    pub return_rate: f64,

    /// Annual inflation multiplier
    pub inflation_rate: f64,

    /// Number of years to project (must be >= 0)
    pub horizon_years: i32,

    /// Fixed amount withdrawn at the end of every year
    pub annual_withdrawal: f64,
}

impl ProjectionInput {
    pub fn new(
        start_balance: f64,
        return_rate: f64,
        inflation_rate: f64,
        horizon_years: i32,
        annual_withdrawal: f64,
    ) -> Self {
        Self {
            start_balance,
            return_rate,
            inflation_rate,
            horizon_years,
            annual_withdrawal,
        }
    }

    /// Build an input from percentage rates (5.0 = 5%)
    pub fn from_percentages(
        start_balance: f64,
        return_pct: f64,
        inflation_pct: f64,
        horizon_years: i32,
        annual_withdrawal: f64,
    ) -> Self {
        Self::new(
            start_balance,
            multiplier_from_percent(return_pct),
            multiplier_from_percent(inflation_pct),
            horizon_years,
            annual_withdrawal,
        )
    }

    /// Net multiplier applied to the prior balance each year
    pub fn net_growth_factor(&self) -> f64 {
        1.0 + self.return_rate - self.inflation_rate
    }
}

/// Year-indexed balances produced by [`project`]
///
/// Index 0 is the unrounded start balance; index `n` is the balance after
/// `n` years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSeries(Vec<f64>);

impl BalanceSeries {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of projected years (series length minus the seed)
    pub fn horizon_years(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn start_balance(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn ending_balance(&self) -> Option<f64> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Index<usize> for BalanceSeries {
    type Output = f64;

    fn index(&self, year: usize) -> &f64 {
        &self.0[year]
    }
}

impl AsRef<[f64]> for BalanceSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a BalanceSeries {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Round to `places` decimal places
///
/// Rounds the exact binary value of `value`, so 3027.045 - 4015.0 (stored as
/// -987.95499999...) rounds to -987.95. Exact ties go to even. Scaling by a
/// power of ten first would round twice and can land on a false tie.
pub fn round_to(value: f64, places: u32) -> f64 {
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Balance one year after `prev`, before rounding
fn next_balance(prev: f64, input: &ProjectionInput) -> f64 {
    prev + prev * input.return_rate - prev * input.inflation_rate - input.annual_withdrawal
}

/// Project the balance forward `horizon_years` years
///
/// Each year the prior balance earns `return_rate`, loses `inflation_rate`,
/// and then the withdrawal is taken. The result is rounded to
/// [`BALANCE_DECIMALS`] places before it seeds the next year, so rounding
/// compounds with the balance.
///
/// Negative balances, rates and withdrawals are not rejected. Only a negative
/// horizon is an error.
pub fn project(input: &ProjectionInput) -> Result<BalanceSeries, ProjectionError> {
    if input.horizon_years < 0 {
        return Err(ProjectionError::InvalidHorizon {
            years: input.horizon_years,
        });
    }

    let years = input.horizon_years as usize;
    let mut balances = Vec::with_capacity(years.min(PREALLOCATED_YEARS) + 1);
    balances.push(input.start_balance);

    let mut prev = input.start_balance;
    for _year in 1..=years {
        let next = round_to(next_balance(prev, input), BALANCE_DECIMALS);
        balances.push(next);
        prev = next;
    }

    if !prev.is_finite() {
        warn!(
            "projection produced a non-finite balance ({}) from start {}",
            prev, input.start_balance
        );
    }

    debug!(
        "projected {} years: start={} end={} (return={}, inflation={}, withdrawal={})",
        years,
        input.start_balance,
        prev,
        input.return_rate,
        input.inflation_rate,
        input.annual_withdrawal
    );

    Ok(BalanceSeries(balances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn sample_input() -> ProjectionInput {
        ProjectionInput::new(5000.0, 1.05, 1.047, 4, 1000.0)
    }

    #[test]
    fn test_reference_scenario() {
        let series = project(&sample_input()).unwrap();
        let expected = [5000.0, 4015.0, 3027.045, 2036.126, 1042.234];

        assert_eq!(series.len(), expected.len());
        for (&actual, &want) in series.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(actual, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_percentages_match_multipliers() {
        let from_pct = ProjectionInput::from_percentages(5000.0, 5.0, 4.7, 4, 1000.0);
        let series = project(&from_pct).unwrap();
        assert_abs_diff_eq!(series[1], 4015.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series[4], 1042.234, epsilon = 1e-9);
    }

    #[test]
    fn test_no_growth_no_withdrawal() {
        let series = project(&ProjectionInput::new(1000.0, 1.0, 1.0, 3, 0.0)).unwrap();
        assert_eq!(series.as_slice(), &[1000.0, 1000.0, 1000.0, 1000.0]);
    }

    #[test]
    fn test_growth_offsets_withdrawal() {
        // 7% return less 2% inflation on 10k is exactly the 500 withdrawal
        let series = project(&ProjectionInput::new(10_000.0, 1.07, 1.02, 3, 500.0)).unwrap();
        for &balance in &series {
            assert_abs_diff_eq!(balance, 10_000.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_horizon() {
        let series = project(&ProjectionInput::new(123.4567, 1.2, 0.9, 0, 50.0)).unwrap();
        assert_eq!(series.as_slice(), &[123.4567]);
        assert_eq!(series.horizon_years(), 0);
        assert_eq!(series.ending_balance(), Some(123.4567));
    }

    #[test]
    fn test_seed_is_not_rounded() {
        let series = project(&ProjectionInput::new(1234.56789, 1.05, 1.02, 2, 0.0)).unwrap();
        assert_eq!(series[0], 1234.56789);
        // Later years carry at most three decimals
        assert_abs_diff_eq!(series[1], round_to(series[1], 3), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let err = project(&ProjectionInput::new(1000.0, 1.05, 1.02, -1, 0.0)).unwrap_err();
        assert_eq!(err, ProjectionError::InvalidHorizon { years: -1 });
    }

    #[test]
    fn test_balance_can_go_negative() {
        let series = project(&ProjectionInput::new(1000.0, 1.0, 1.0, 3, 600.0)).unwrap();
        assert_eq!(series.as_slice(), &[1000.0, 400.0, -200.0, -800.0]);
    }

    #[test]
    fn test_negative_withdrawal_is_a_deposit() {
        let series = project(&ProjectionInput::new(1000.0, 1.0, 1.0, 2, -250.0)).unwrap();
        assert_eq!(series.as_slice(), &[1000.0, 1250.0, 1500.0]);
    }

    #[test]
    fn test_round_to_uses_stored_value() {
        // Stored just below the half, so it must not round away
        assert_eq!(round_to(3027.045 - 4015.0, 2), -987.95);
        assert_eq!(round_to(1.23449, 3), 1.234);
        assert_eq!(round_to(-1.2346, 3), -1.235);
        assert_eq!(round_to(10.0, 2), 10.0);
    }

    #[test]
    fn test_round_to_exact_ties_go_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
    }

    #[test]
    fn test_no_drift_on_long_projection() {
        // Year 15 stores -42957.8705 just below the half
        let series = project(&ProjectionInput::new(0.0, 1.194, 1.0565, 30, 1000.0)).unwrap();
        assert_abs_diff_eq!(series[14], -36886.04, epsilon = 1e-9);
        assert_abs_diff_eq!(series[15], -42957.87, epsilon = 1e-9);
    }

    #[test]
    fn test_horizon_beyond_preallocation() {
        let years = PREALLOCATED_YEARS as i32 * 4;
        let series = project(&ProjectionInput::new(100.0, 1.0, 1.0, years, 0.0)).unwrap();
        assert_eq!(series.len(), years as usize + 1);
        assert!(series.iter().all(|&b| b == 100.0));
    }

    #[test]
    fn test_each_call_is_independent() {
        let input = sample_input();
        let first = project(&input).unwrap();
        let second = project(&input).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_length_is_horizon_plus_one(
            start in -1_000_000i64..1_000_000,
            return_bp in 9_000i32..12_000,
            inflation_bp in 9_000i32..12_000,
            years in 0i32..120,
            withdrawal in 0u32..50_000
        ) {
            let input = ProjectionInput::new(
                start as f64,
                return_bp as f64 / 10_000.0,
                inflation_bp as f64 / 10_000.0,
                years,
                withdrawal as f64,
            );
            let series = project(&input).unwrap();
            prop_assert_eq!(series.len(), years as usize + 1);
            prop_assert_eq!(series[0], start as f64);
        }

        #[test]
        fn prop_recurrence_law_holds(
            start in 0u32..2_000_000,
            return_bp in 9_500i32..11_500,
            inflation_bp in 9_500i32..11_500,
            years in 1i32..60,
            withdrawal in 0u32..20_000
        ) {
            let input = ProjectionInput::new(
                start as f64,
                return_bp as f64 / 10_000.0,
                inflation_bp as f64 / 10_000.0,
                years,
                withdrawal as f64,
            );
            let series = project(&input).unwrap();
            for k in 1..series.len() {
                let expected = round_to(
                    series[k - 1] * input.net_growth_factor() - input.annual_withdrawal,
                    BALANCE_DECIMALS,
                );
                // Same value up to float noise, then rounded to 3 places
                prop_assert!(
                    (series[k] - expected).abs() <= 1e-3 + 1e-9 * series[k].abs(),
                    "year {}: {} vs {}", k, series[k], expected
                );
            }
        }

        #[test]
        fn prop_flat_rates_without_withdrawal_hold_balance(
            start in -1_000_000i64..1_000_000,
            years in 0i32..100
        ) {
            let series =
                project(&ProjectionInput::new(start as f64, 1.0, 1.0, years, 0.0)).unwrap();
            prop_assert!(series.iter().all(|&b| b == start as f64));
        }

        #[test]
        fn prop_pure_withdrawal_strictly_declines(
            start in 0u32..1_000_000,
            years in 1i32..80,
            withdrawal in 1u32..10_000
        ) {
            let series = project(&ProjectionInput::new(
                start as f64, 1.0, 1.0, years, withdrawal as f64,
            )).unwrap();
            for k in 1..series.len() {
                prop_assert!(series[k] < series[k - 1]);
            }
        }

        #[test]
        fn prop_zero_horizon_is_seed_only(
            start in -1_000_000i64..1_000_000,
            return_bp in 0i32..30_000,
            inflation_bp in 0i32..30_000,
            withdrawal in -10_000i64..10_000
        ) {
            let input = ProjectionInput::new(
                start as f64 + 0.125,
                return_bp as f64 / 10_000.0,
                inflation_bp as f64 / 10_000.0,
                0,
                withdrawal as f64,
            );
            let series = project(&input).unwrap();
            prop_assert_eq!(series.into_vec(), vec![start as f64 + 0.125]);
        }
    }
}
