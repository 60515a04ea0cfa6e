//! # Smite: Assertion Engine
//!
//! Pure comparison logic for test bodies. Every assertion returns a
//! [`TestResult`]; on mismatch the `Err` carries an [`AssertionFailure`] with
//! the call-site line and a rendered detail string. Test bodies propagate it
//! with `?`, so the first failing assertion ends the body.
//!
//! ```
//! use smite::assertions::{assert_equal_int, TestResult};
//!
//! fn adds_up() -> TestResult {
//!     assert_equal_int(4, 2 + 2, line!())?;
//!     Ok(())
//! }
//! assert!(adds_up().is_ok());
//! ```

use std::panic::Location;

use crate::errors::AssertionFailure;

/// Outcome of a test body or of a single assertion.
pub type TestResult = Result<(), AssertionFailure>;

/// Two reals are equal iff their absolute difference is strictly below this.
pub const REAL_TOLERANCE: f64 = 1e-12;

// ============================================================================
// SCALAR ASSERTIONS
// ============================================================================

pub fn assert_equal_int(expected: i64, actual: i64, line: u32) -> TestResult {
    if expected == actual {
        return Ok(());
    }
    Err(AssertionFailure::equality(
        line,
        format!("Expected {} was {}.", expected, actual),
    ))
}

pub fn assert_equal_real(expected: f64, actual: f64, line: u32) -> TestResult {
    if reals_equal(expected, actual) {
        return Ok(());
    }
    Err(AssertionFailure::equality(
        line,
        format!("Expected {:.6} was {:.6}.", expected, actual),
    ))
}

// ============================================================================
// ARRAY ASSERTIONS
// ============================================================================

/// Compares the first `count` elements of two integer sequences.
pub fn assert_equal_int_array(
    expected: &[i64],
    actual: &[i64],
    count: usize,
    line: u32,
) -> TestResult {
    compare_elements(expected, actual, count, line, |e, a| e == a, |i, e, a| {
        format!("Element {}: Expected {} was {}.", i, e, a)
    })
}

/// Compares the first `count` elements of two real sequences using
/// [`REAL_TOLERANCE`].
pub fn assert_equal_real_array(
    expected: &[f64],
    actual: &[f64],
    count: usize,
    line: u32,
) -> TestResult {
    compare_elements(
        expected,
        actual,
        count,
        line,
        |e, a| reals_equal(*e, *a),
        |i, e, a| format!("Element {}: Expected {:.6} was {:.6}.", i, e, a),
    )
}

// ============================================================================
// CALL-SITE CAPTURING HELPERS
// ============================================================================

/// Assertion entry points that capture the caller's line via `#[track_caller]`
/// instead of taking it as an argument.
pub struct Expect;

impl Expect {
    #[track_caller]
    pub fn int(expected: i64, actual: i64) -> TestResult {
        assert_equal_int(expected, actual, Location::caller().line())
    }

    #[track_caller]
    pub fn real(expected: f64, actual: f64) -> TestResult {
        assert_equal_real(expected, actual, Location::caller().line())
    }

    #[track_caller]
    pub fn int_array(expected: &[i64], actual: &[i64], count: usize) -> TestResult {
        assert_equal_int_array(expected, actual, count, Location::caller().line())
    }

    #[track_caller]
    pub fn real_array(expected: &[f64], actual: &[f64], count: usize) -> TestResult {
        assert_equal_real_array(expected, actual, count, Location::caller().line())
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn reals_equal(expected: f64, actual: f64) -> bool {
    (expected - actual).abs() < REAL_TOLERANCE
}

fn compare_elements<T>(
    expected: &[T],
    actual: &[T],
    count: usize,
    line: u32,
    equal: impl Fn(&T, &T) -> bool,
    describe: impl Fn(usize, &T, &T) -> String,
) -> TestResult {
    if count == 0 {
        return Ok(());
    }
    if expected.len() < count || actual.len() < count {
        return Err(AssertionFailure::equality(
            line,
            format!(
                "Expected {} elements, sequences hold {} and {}.",
                count,
                expected.len(),
                actual.len()
            ),
        ));
    }
    // Same storage: nothing to scan.
    if std::ptr::eq(expected.as_ptr(), actual.as_ptr()) {
        return Ok(());
    }

    let mismatch = expected[..count]
        .iter()
        .zip(&actual[..count])
        .enumerate()
        .find(|&(_, (e, a))| !equal(e, a));

    match mismatch {
        Some((index, (e, a))) => Err(AssertionFailure::equality(line, describe(index, e, a))),
        None => Ok(()),
    }
}
