// Demonstration suite for the Smite harness.
// Usage: cargo run --bin smite-demo -- [--with-failures] [--format json]

use std::process::ExitCode;

use clap::Parser;
use smite::cli::args::HarnessArgs;
use smite::{
    add_test, assert_equal_int, assert_equal_int_array, assert_equal_real,
    assert_equal_real_array, HarnessError, Session, TestResult,
};

#[derive(Debug, Parser)]
#[command(name = "smite-demo", about = "Runs the Smite demonstration suite.")]
struct DemoArgs {
    /// Also register tests that fail on purpose.
    #[arg(long)]
    with_failures: bool,

    #[command(flatten)]
    harness: HarnessArgs,
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

fn running_sum(values: &[i64]) -> Vec<i64> {
    values
        .iter()
        .scan(0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn normalize(values: &[f64]) -> Vec<f64> {
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    values.iter().map(|v| v / max).collect()
}

fn gcd_of_coprimes_is_one() -> TestResult {
    assert_equal_int!(1, gcd(17, 5));
    assert_equal_int!(6, gcd(54, 24));
    Ok(())
}

fn running_sum_accumulates() -> TestResult {
    assert_equal_int_array!([1, 3, 6, 10], running_sum(&[1, 2, 3, 4]), 4);
    Ok(())
}

fn mean_of_thirds() -> TestResult {
    assert_equal_real!(1.0 / 3.0, mean(&[0.0, 1.0 / 3.0, 2.0 / 3.0]));
    Ok(())
}

fn normalize_scales_to_unit_max() -> TestResult {
    assert_equal_real_array!([0.25, 0.5, 1.0], normalize(&[1.0, 2.0, 4.0]), 3);
    Ok(())
}

fn gcd_is_not_lcm() -> TestResult {
    assert_equal_int!(24, gcd(6, 8));
    Ok(())
}

fn float_sums_drift() -> TestResult {
    let total: f64 = std::iter::repeat(0.1).take(10).sum();
    assert_equal_real_array!([1.0], [total + 1e-9], 1);
    Ok(())
}

fn register(session: &mut Session, with_failures: bool) -> Result<(), HarnessError> {
    add_test!(session, gcd_of_coprimes_is_one)?;
    add_test!(session, running_sum_accumulates)?;
    add_test!(session, mean_of_thirds)?;
    add_test!(session, normalize_scales_to_unit_max)?;
    if with_failures {
        add_test!(session, gcd_is_not_lcm)?;
        add_test!(session, float_sums_drift)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();
    let with_failures = args.with_failures;
    smite::cli::run_with_args(args.harness, |session| register(session, with_failures))
}
