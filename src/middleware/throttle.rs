use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::Error;

const WINDOW: Duration = Duration::from_secs(1);

/// Admission counter for a single route.
///
/// Time is cut into whole seconds counted from construction. The current
/// second's index and the number of requests it has admitted share one
/// atomic word, so admission is a compare-and-swap with no lock.
#[derive(Clone, Debug)]
pub struct Throttle {
    slots: Arc<Slots>,
}

#[derive(Debug)]
struct Slots {
    capacity: u32,
    epoch: Instant,
    // high 32 bits: window index, low 32 bits: admitted in that window
    packed: AtomicU64,
}

fn pack(window: u32, admitted: u32) -> u64 {
    (u64::from(window) << 32) | u64::from(admitted)
}

fn unpack(word: u64) -> (u32, u32) {
    ((word >> 32) as u32, word as u32)
}

impl Throttle {
    /// At least one request per second is always admitted.
    pub fn per_second(capacity: u32) -> Self {
        Self {
            slots: Arc::new(Slots {
                capacity: capacity.max(1),
                epoch: Instant::now(),
                packed: AtomicU64::new(0),
            }),
        }
    }

    /// Takes a slot in the current second, or returns how long until the next
    /// second opens.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.slots.epoch);
        let window = u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX);

        let mut word = self.slots.packed.load(Ordering::Acquire);
        loop {
            let (seen, admitted) = unpack(word);
            // A caller with an older clock reading never rewinds the window.
            let (window, admitted) = if seen >= window {
                (seen, admitted)
            } else {
                (window, 0)
            };
            if admitted >= self.slots.capacity {
                return Err(WINDOW - Duration::from_nanos(u64::from(elapsed.subsec_nanos())));
            }
            match self.slots.packed.compare_exchange_weak(
                word,
                pack(window, admitted + 1),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(current) => word = current,
            }
        }
    }
}

/// Rejects with 429 and a `Retry-After` once the route's quota for the
/// current second is spent.
pub async fn throttle_requests(
    State(throttle): State<Throttle>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match throttle.try_acquire() {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            tracing::warn!(
                path = %req.uri().path(),
                retry_in_ms = wait.as_millis() as u64,
                "Request throttled"
            );
            let mut res = Error::TooManyRequests.into_response();
            let secs = wait.as_secs_f64().ceil().max(1.0) as u64;
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_is_per_second() {
        let throttle = Throttle::per_second(2);
        let epoch = throttle.slots.epoch;
        assert!(throttle.try_acquire_at(epoch).is_ok());
        assert!(throttle.try_acquire_at(epoch + Duration::from_millis(100)).is_ok());

        let wait = throttle
            .try_acquire_at(epoch + Duration::from_millis(600))
            .unwrap_err();
        assert_eq!(wait, Duration::from_millis(400));

        assert!(throttle.try_acquire_at(epoch + Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn late_reading_does_not_reopen_an_old_window() {
        let throttle = Throttle::per_second(1);
        let epoch = throttle.slots.epoch;
        assert!(throttle.try_acquire_at(epoch + Duration::from_secs(3)).is_ok());
        assert!(throttle.try_acquire_at(epoch + Duration::from_secs(2)).is_err());
    }

    #[test]
    fn zero_capacity_still_admits_one() {
        let throttle = Throttle::per_second(0);
        assert!(throttle.try_acquire().is_ok());
    }

    #[test]
    fn concurrent_callers_share_the_quota() {
        let throttle = Throttle::per_second(5);
        let now = throttle.slots.epoch;
        let admitted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let throttle = throttle.clone();
                    scope.spawn(move || {
                        (0..4)
                            .filter(|_| throttle.try_acquire_at(now).is_ok())
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(admitted, 5);
    }
}
