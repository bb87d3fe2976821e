//! Wall-clock timing for planner calls

use std::time::{Duration, Instant};

/// Run `f`, log how long it took under `name`, and return its value with the elapsed time
pub fn clocked<T>(name: &str, f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();
    tracing::debug!("[{:.8}s] {}", elapsed.as_secs_f64(), name);
    (value, elapsed)
}
