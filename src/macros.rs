//! Call-site capturing macros.
//!
//! The assertion macros pass `line!()` to the assertion engine and apply `?`,
//! so they may only be used inside functions returning [`crate::TestResult`].
//! A failing assertion returns from the enclosing test body at once.

/// Registers a test function under its own name, with the current file and
/// line as its declared location.
///
/// `add_test!(session, my_test)` expands to
/// `session.add_test(my_test, "my_test", file!(), line!())`.
#[macro_export]
macro_rules! add_test {
    ($session:expr, $test:path) => {
        $session.add_test($test, stringify!($test), file!(), line!())
    };
    ($session:expr, $test:path, $name:expr) => {
        $session.add_test($test, $name, file!(), line!())
    };
}

#[macro_export]
macro_rules! assert_equal_int {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::assertions::assert_equal_int($expected, $actual, line!())?
    };
}

#[macro_export]
macro_rules! assert_equal_real {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::assertions::assert_equal_real($expected, $actual, line!())?
    };
}

/// Compares the first `count` elements of two integer sequences (arrays,
/// vectors or slices).
#[macro_export]
macro_rules! assert_equal_int_array {
    ($expected:expr, $actual:expr, $count:expr $(,)?) => {
        $crate::assertions::assert_equal_int_array(&$expected, &$actual, $count, line!())?
    };
}

#[macro_export]
macro_rules! assert_equal_real_array {
    ($expected:expr, $actual:expr, $count:expr $(,)?) => {
        $crate::assertions::assert_equal_real_array(&$expected, &$actual, $count, line!())?
    };
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::{Session, SilentReporter, TestResult};

    fn mismatching_arrays() -> TestResult {
        let expected: Vec<i64> = vec![1, 2, 3];
        assert_equal_int_array!(expected, [1, 2, 3], 3);
        assert_equal_int_array!(expected, [1, 5, 3], 3);
        Ok(())
    }

    fn close_reals() -> TestResult {
        assert_equal_real!(0.1 + 0.2, 0.3);
        assert_equal_real_array!([1.0, 2.0], [1.0, 2.0 + 1e-13], 2);
        Ok(())
    }

    #[test]
    fn array_macro_reports_first_mismatch() {
        let failure = mismatching_arrays().unwrap_err();
        assert_eq!(failure.kind, ErrorKind::EqualityAssertion);
        assert_eq!(failure.detail, "Element 1: Expected 2 was 5.");
    }

    #[test]
    fn scalar_macro_records_its_own_line() {
        let line = line!() + 2;
        let body = || -> TestResult {
            assert_equal_int!(5, 7);
            Ok(())
        };
        assert_eq!(body().unwrap_err().line, line);
    }

    #[test]
    fn real_macros_accept_values_within_tolerance() {
        assert!(close_reals().is_ok());
    }

    #[test]
    fn add_test_uses_the_function_name() {
        let mut session = Session::begin().unwrap();
        add_test!(session, close_reals).unwrap();
        add_test!(session, mismatching_arrays, "arrays").unwrap();

        let names: Vec<_> = session.registry().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, ["close_reals", "arrays"]);
        assert!(session.registry().iter().all(|t| t.file.ends_with("macros.rs")));

        let summary = session.run(&mut SilentReporter).unwrap();
        assert_eq!(summary.failed, 1);
    }
}
