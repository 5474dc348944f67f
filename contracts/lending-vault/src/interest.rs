use soroban_sdk::Env;

use crate::{
    Error,
    storage::{RateModel, VaultStorage},
};

pub const BASIS_POINTS: u32 = 10_000;
pub const SECONDS_PER_YEAR: u64 = 31_536_000; // 365 days

/// Integer division rounding half to even.
pub fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    let twice = remainder * 2;

    if twice < denominator {
        quotient
    } else if twice > denominator {
        quotient + 1
    } else if quotient % 2 == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// Share of the reserve currently lent out, in basis points. Zero for an empty reserve.
pub fn utilization_bps(total_borrowed: i128, total_reserve: i128) -> u32 {
    if total_reserve <= 0 || total_borrowed <= 0 {
        return 0;
    }
    if total_borrowed >= total_reserve {
        return BASIS_POINTS;
    }
    match total_borrowed.checked_mul(BASIS_POINTS as i128) {
        Some(scaled) => (scaled / total_reserve) as u32,
        // borrowed < reserve, so only the scaling can overflow; divide first
        None => (total_borrowed / (total_reserve / BASIS_POINTS as i128)).min(BASIS_POINTS as i128)
            as u32,
    }
}

/// Simple interest on `principal` over `elapsed` seconds at `rate_bps` per year
pub fn simple_interest(principal: i128, rate_bps: u32, elapsed: u64) -> Result<i128, Error> {
    if principal == 0 || rate_bps == 0 || elapsed == 0 {
        return Ok(0);
    }
    let numerator = principal
        .checked_mul(rate_bps as i128)
        .and_then(|v| v.checked_mul(elapsed as i128))
        .ok_or(Error::ArithmeticError)?;
    Ok(div_round_half_even(
        numerator,
        BASIS_POINTS as i128 * SECONDS_PER_YEAR as i128,
    ))
}

impl RateModel {
    pub fn is_valid(&self) -> bool {
        self.kink_bps <= BASIS_POINTS
    }

    /// Borrow rate in basis points at the given utilization
    pub fn rate_at(&self, utilization_bps: u32) -> u32 {
        let utilization = utilization_bps.min(BASIS_POINTS) as u64;
        let kink = self.kink_bps as u64;
        let base = self.base_rate_bps as u64;
        let slope1 = self.slope1_bps as u64;
        let slope2 = self.slope2_bps as u64;
        let bps = BASIS_POINTS as u64;

        let rate = if utilization <= kink {
            base + utilization * slope1 / bps
        } else {
            base + kink * slope1 / bps + (utilization - kink) * slope2 / bps
        };
        rate.min(u32::MAX as u64) as u32
    }
}

pub struct InterestRateModel;

impl InterestRateModel {
    pub fn utilization(env: &Env) -> u32 {
        let pool = VaultStorage::get_pool(env);
        utilization_bps(pool.total_borrowed, pool.total_reserve)
    }

    /// Current annual borrow rate in basis points
    pub fn current_rate(env: &Env) -> u32 {
        let config = VaultStorage::get_state(env).config;
        if !config.capabilities.dynamic_rate {
            return config.rate_model.base_rate_bps;
        }
        config.rate_model.rate_at(Self::utilization(env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> RateModel {
        RateModel {
            base_rate_bps: 200,
            slope1_bps: 1_000,
            slope2_bps: 10_000,
            kink_bps: 8_000,
        }
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(div_round_half_even(5, 2), 2);
        assert_eq!(div_round_half_even(7, 2), 4);
        assert_eq!(div_round_half_even(7, 3), 2);
        assert_eq!(div_round_half_even(8, 3), 3);
        assert_eq!(div_round_half_even(10, 5), 2);
    }

    #[test]
    fn utilization_bounds() {
        assert_eq!(utilization_bps(0, 0), 0);
        assert_eq!(utilization_bps(100, 0), 0);
        assert_eq!(utilization_bps(0, 100), 0);
        assert_eq!(utilization_bps(25, 100), 2_500);
        assert_eq!(utilization_bps(100, 100), BASIS_POINTS);
        assert_eq!(utilization_bps(i128::MAX / 2, i128::MAX), 5_000);
    }

    #[test]
    fn kinked_curve() {
        let m = model();
        assert_eq!(m.rate_at(0), 200);
        assert_eq!(m.rate_at(5_000), 200 + 500);
        assert_eq!(m.rate_at(8_000), 200 + 800);
        // 10% past the kink adds 10% of slope2
        assert_eq!(m.rate_at(9_000), 200 + 800 + 1_000);
        assert_eq!(m.rate_at(10_000), 200 + 800 + 2_000);
        // Utilization is clamped to 100%
        assert_eq!(m.rate_at(20_000), m.rate_at(10_000));
    }

    #[test]
    fn rate_is_non_decreasing_in_utilization() {
        let m = model();
        let mut previous = 0;
        for u in (0..=BASIS_POINTS).step_by(50) {
            let rate = m.rate_at(u);
            assert!(rate >= previous);
            previous = rate;
        }
    }

    #[test]
    fn slope_steepens_after_kink() {
        let m = model();
        let below = m.rate_at(7_000) - m.rate_at(6_000);
        let above = m.rate_at(9_000) - m.rate_at(8_000);
        assert!(above > below);
    }

    #[test]
    fn simple_interest_over_a_year() {
        let one_year = simple_interest(1_000_000, 1_000, SECONDS_PER_YEAR).unwrap();
        assert_eq!(one_year, 100_000);
        let half_year = simple_interest(1_000_000, 1_000, SECONDS_PER_YEAR / 2).unwrap();
        assert_eq!(half_year, 50_000);
        assert_eq!(simple_interest(1_000_000, 0, SECONDS_PER_YEAR).unwrap(), 0);
        assert_eq!(simple_interest(0, 1_000, SECONDS_PER_YEAR).unwrap(), 0);
    }

    #[test]
    fn simple_interest_overflow_is_an_error() {
        assert_eq!(
            simple_interest(i128::MAX, 1_000, SECONDS_PER_YEAR),
            Err(Error::ArithmeticError)
        );
    }
}
