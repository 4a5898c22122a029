//! Last five digits of N! before the trailing zeroes, for N up to 10^12,
//! computed entirely in `u64` arithmetic.
//!
//! The full factorial of such an N has billions of digits, but only its
//! low-order nonzero digits are wanted. Two facts make that tractable:
//! trailing zeroes of a product never un-happen, so they can be discarded
//! the moment they appear; and the low k digits of a product depend only on
//! the low k digits of its factors, so both factors can be truncated before
//! every multiply.
//!
//! The one wrinkle is that zeroes form when a factor of 5 from the loop
//! counter meets one of the many factors of 2 piled up in the accumulator.
//! [`Reducer::fold`] therefore cancels them ahead of the multiply: it strips
//! trailing zeroes from the counter, then divides the counter by 5 and the
//! accumulator by 2 in lockstep until one side runs out. Only then are both
//! values truncated and multiplied.
//!
//! Truncation can, rarely, discard a digit that would have cancelled a
//! trailing zero later, in which case the product itself ends in a zero.
//! Those zeroes are stripped too, but each occurrence is counted
//! ([`Reducer::strip_events`]) and logged: more than a handful over a run
//! means the accumulator cap is too small for the target N and the result
//! should not be trusted.

use thiserror::Error;
use tracing::{info, warn};

/// Width of the answer window: f(N) is the last five nonzero-trailing
/// digits of N!. The reduced counter is truncated to the same window.
pub const RESULT_DIGITS: u32 = 5;

/// `10^RESULT_DIGITS`, the modulus for the answer and the reduced counter.
pub const RESULT_MODULUS: u64 = 10u64.pow(RESULT_DIGITS);

/// Default number of decimal digits retained in the accumulator between
/// multiplies. Nine digits is empirically sufficient for N up to at least
/// 10^10; push it toward [`MAX_FAC_DIGITS`] for larger targets.
pub const DEFAULT_FAC_DIGITS: u32 = 9;

/// Upper bound on the accumulator digit cap. The truncated accumulator
/// (`< 10^13`) times the truncated counter (`< 10^5`) stays below 10^18,
/// inside `u64` range.
pub const MAX_FAC_DIGITS: u32 = 13;

/// Iterations between progress reports from [`compute`].
pub const PROGRESS_INTERVAL: u64 = 10_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The requested accumulator cap would either retain no digits or let
    /// the multiply step exceed `u64` range.
    #[error("accumulator cap of {0} digits is outside 1..={MAX_FAC_DIGITS}")]
    CapOutOfRange(u32),
    /// The multiply step overflowed `u64`. Unreachable with a validated
    /// cap; reported rather than silently wrapped.
    #[error("accumulator overflowed u64 while folding {count}")]
    Overflow { count: u64 },
}

/// Divide out trailing zero decimal digits. Idempotent: stripping an
/// already-stripped value is a no-op.
pub fn strip_trailing_zeros(mut x: u64) -> u64 {
    while x != 0 && x % 10 == 0 {
        x /= 10;
    }
    x
}

/// Running reduction state: a truncated, zero-stripped surrogate for the
/// partial factorial. Its value is meaningless as a factorial; only its low
/// five digits agree with the true zero-stripped product, and only while
/// the digit cap is large enough for the range folded so far.
#[derive(Debug, Clone)]
pub struct Reducer {
    fac: u64,
    cap: u64,
    strip_events: u64,
}

impl Reducer {
    /// New reducer keeping `fac_digits` low-order digits of the
    /// accumulator. Fails if the cap would make the multiply unsafe.
    pub fn new(fac_digits: u32) -> Result<Self, Error> {
        if fac_digits == 0 || fac_digits > MAX_FAC_DIGITS {
            return Err(Error::CapOutOfRange(fac_digits));
        }
        Ok(Reducer {
            fac: 1,
            cap: 10u64.pow(fac_digits),
            strip_events: 0,
        })
    }

    /// Fold one counter value into the accumulator.
    ///
    /// Counters must be folded for every integer from 1 upward, in order;
    /// skipping or reordering breaks the cancellation bookkeeping.
    pub fn fold(&mut self, count: u64) -> Result<(), Error> {
        let mut cnt = strip_trailing_zeros(count);

        // Trade fives in the counter for twos in the accumulator so their
        // product cannot end in a fresh zero.
        while cnt % 5 == 0 && self.fac % 2 == 0 {
            cnt /= 5;
            self.fac /= 2;
        }
        debug_assert!(cnt % 5 != 0 || self.fac % 2 != 0);

        cnt %= RESULT_MODULUS;
        self.fac %= self.cap;
        self.fac = self
            .fac
            .checked_mul(cnt)
            .ok_or(Error::Overflow { count })?;

        // A zero here means truncation discarded a compensating 2 or 5.
        // Strip it, but count the event: frequent hits mean the cap is too
        // small for this range.
        while self.fac % 10 == 0 {
            self.strip_events += 1;
            warn!(count, fac = self.fac, "trailing zero survived reduction; accumulator cap may be too small");
            self.fac /= 10;
        }
        Ok(())
    }

    /// Current accumulator value. Never ends in a zero digit.
    pub fn accumulator(&self) -> u64 {
        self.fac
    }

    /// How many times a trailing zero had to be stripped after a multiply.
    pub fn strip_events(&self) -> u64 {
        self.strip_events
    }

    /// The low five digits of the accumulator, in `[0, 99999]`. Callers
    /// wanting a padded string must format it themselves.
    pub fn finish(&self) -> u64 {
        self.fac % RESULT_MODULUS
    }
}

/// Compute f(n) with `fac_digits` retained in the accumulator.
///
/// Folds every integer in `1..=n` sequentially; for `n = 0` the loop never
/// runs and the result is 1, matching 0! = 1. Emits a progress event every
/// [`PROGRESS_INTERVAL`] iterations; progress reporting never touches the
/// reduction state.
pub fn compute(n: u64, fac_digits: u32) -> Result<u64, Error> {
    let mut reducer = Reducer::new(fac_digits)?;
    for count in 1..=n {
        reducer.fold(count)?;
        if count % PROGRESS_INTERVAL == 0 {
            info!(count, fac = reducer.accumulator(), "progress");
        }
    }
    if reducer.strip_events() > 0 {
        warn!(
            strips = reducer.strip_events(),
            fac_digits, "reduction stripped post-multiply zeroes; result may be inaccurate"
        );
    }
    Ok(reducer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        // 9! = 362880, 10! = 3628800, 20! = 2432902008176640000.
        assert_eq!(compute(9, DEFAULT_FAC_DIGITS), Ok(36288));
        assert_eq!(compute(10, DEFAULT_FAC_DIGITS), Ok(36288));
        assert_eq!(compute(20, DEFAULT_FAC_DIGITS), Ok(17664));
    }

    #[test]
    fn trivial_bounds() {
        assert_eq!(compute(0, DEFAULT_FAC_DIGITS), Ok(1));
        assert_eq!(compute(1, DEFAULT_FAC_DIGITS), Ok(1));
        assert_eq!(compute(2, DEFAULT_FAC_DIGITS), Ok(2));
        assert_eq!(compute(5, DEFAULT_FAC_DIGITS), Ok(12));
    }

    #[test]
    fn strip_is_idempotent() {
        for x in [1u64, 7, 36288, 99999, 1000, 12_300_000, 0] {
            let once = strip_trailing_zeros(x);
            assert_eq!(strip_trailing_zeros(once), once);
            assert!(once == 0 || once % 10 != 0);
        }
    }

    #[test]
    fn accumulator_never_ends_in_zero() {
        let mut reducer = Reducer::new(DEFAULT_FAC_DIGITS).unwrap();
        for count in 1..=100_000u64 {
            reducer.fold(count).unwrap();
            assert_ne!(reducer.accumulator() % 10, 0, "after folding {count}");
        }
        // Nine digits is comfortably enough for this range.
        assert_eq!(reducer.strip_events(), 0);
    }

    #[test]
    fn result_stays_in_window() {
        for n in [0u64, 1, 9, 50, 777, 4096] {
            let tail = compute(n, DEFAULT_FAC_DIGITS).unwrap();
            assert!(tail < RESULT_MODULUS);
        }
    }

    #[test]
    fn cap_is_validated() {
        assert_eq!(Reducer::new(0).unwrap_err(), Error::CapOutOfRange(0));
        assert_eq!(
            Reducer::new(MAX_FAC_DIGITS + 1).unwrap_err(),
            Error::CapOutOfRange(14)
        );
        assert!(Reducer::new(MAX_FAC_DIGITS).is_ok());
        assert!(Reducer::new(1).is_ok());
    }
}
