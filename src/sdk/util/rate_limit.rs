use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

pub fn geocode_limiter() -> Limiter {
    let quota = Quota::per_minute(NonZeroU32::new(60).unwrap());
    Arc::new(RateLimiter::direct(quota))
}

/// Blocks the current thread until the limiter admits one more call.
pub fn wait(limiter: &Limiter) {
    while limiter.check().is_err() {
        thread::sleep(Duration::from_millis(50));
    }
}
