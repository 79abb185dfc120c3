//! Wall-clock budgets for slow paths in integration tests

use std::time::{Duration, Instant};

/// Runs `f`, panicking when it takes longer than `budget`
///
/// ```
/// use std::time::Duration;
/// use screengrab_test_utils::timing::run_within;
///
/// let sum = run_within("sum", Duration::from_secs(1), || (1..=100u32).sum::<u32>());
/// assert_eq!(sum, 5050);
/// ```
pub fn run_within<T>(label: &str, budget: Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();

    assert!(
        elapsed <= budget,
        "{label} took {elapsed:?}, budget is {budget:?}"
    );
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_passes_through() {
        assert_eq!(run_within("answer", Duration::from_secs(1), || 42), 42);
    }

    #[test]
    #[should_panic(expected = "budget is")]
    fn test_overrun_panics() {
        run_within("sleep", Duration::from_millis(1), || {
            std::thread::sleep(Duration::from_millis(20));
        });
    }
}
