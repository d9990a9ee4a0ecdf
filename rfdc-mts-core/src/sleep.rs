use std::time::Duration;

/// A trait for sleep operations.
pub trait Sleeper {
    /// Sleep for the specified duration.
    fn sleep(&self, duration: Duration);
}

/// A sleeper that uses [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StdSleeper;

impl Sleeper for StdSleeper {
    fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_sleeper() {
        let sleeper = StdSleeper;
        {
            let start = std::time::Instant::now();
            sleeper.sleep(Duration::from_millis(10));
            assert!(Duration::from_millis(10) <= start.elapsed());
        }
        {
            let start = std::time::Instant::now();
            sleeper.sleep(Duration::ZERO);
            assert!(start.elapsed() < Duration::from_millis(10));
        }
    }
}
