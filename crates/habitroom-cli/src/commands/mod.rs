pub mod config;
pub mod run;
pub mod simulate;

use habitroom_core::{Dashboard, SeededSampler, SystemClock, ThreadSampler};

/// Real-time dashboard, seeded when the config asks for reproducible nudges.
pub fn live_dashboard(seed: Option<u64>) -> Dashboard {
    match seed {
        Some(seed) => Dashboard::new(SystemClock, SeededSampler::new(seed)),
        None => Dashboard::new(SystemClock, ThreadSampler),
    }
}
