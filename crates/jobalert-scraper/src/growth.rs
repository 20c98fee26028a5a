//! Bounded polling for pages that load more content as they are scrolled.

use std::future::Future;
use std::time::Duration;

/// How to poll a growing page.
#[derive(Debug, Clone, Copy)]
pub struct GrowthPolicy {
    /// Pause between a growth request and the following measurement.
    pub interval: Duration,
    /// Upper bound on growth requests; caps worst-case latency.
    pub max_attempts: u32,
    /// Decides whether two consecutive measurements mean growth has stalled.
    pub is_stable: fn(u64, u64) -> bool,
}

impl GrowthPolicy {
    #[must_use]
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            is_stable: extent_unchanged,
        }
    }
}

fn extent_unchanged(previous: u64, current: u64) -> bool {
    previous == current
}

/// Result of a polling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthOutcome {
    /// Growth requests issued.
    pub attempts: u32,
    /// Last measured extent.
    pub extent: u64,
    /// `true` if polling stopped because growth stalled rather than hitting
    /// `max_attempts`.
    pub settled: bool,
}

/// Repeatedly calls `grow`, waits `policy.interval`, and re-measures with
/// `measure` until two consecutive measurements are stable or
/// `policy.max_attempts` growth requests have been made.
///
/// One measurement is taken before the first growth request.
///
/// # Errors
///
/// Returns the first error produced by `grow` or `measure`.
pub async fn poll_until_stable<G, GFut, M, MFut, E>(
    policy: &GrowthPolicy,
    mut grow: G,
    mut measure: M,
) -> Result<GrowthOutcome, E>
where
    G: FnMut() -> GFut,
    GFut: Future<Output = Result<(), E>>,
    M: FnMut() -> MFut,
    MFut: Future<Output = Result<u64, E>>,
{
    let mut previous = measure().await?;

    for attempt in 1..=policy.max_attempts {
        grow().await?;
        tokio::time::sleep(policy.interval).await;
        let current = measure().await?;

        if (policy.is_stable)(previous, current) {
            return Ok(GrowthOutcome {
                attempts: attempt,
                extent: current,
                settled: true,
            });
        }
        previous = current;
    }

    Ok(GrowthOutcome {
        attempts: policy.max_attempts,
        extent: previous,
        settled: false,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use super::*;

    fn policy(max_attempts: u32) -> GrowthPolicy {
        GrowthPolicy::new(Duration::ZERO, max_attempts)
    }

    /// Runs the poller against a scripted sequence of extents.
    async fn run(extents: &[u64], max_attempts: u32) -> (GrowthOutcome, u32) {
        let queue = RefCell::new(extents.iter().copied().collect::<VecDeque<_>>());
        let grows = Cell::new(0u32);
        let outcome = poll_until_stable(
            &policy(max_attempts),
            || {
                grows.set(grows.get() + 1);
                async { Ok::<(), String>(()) }
            },
            || {
                let next = queue.borrow_mut().pop_front().unwrap_or(u64::MAX);
                async move { Ok::<u64, String>(next) }
            },
        )
        .await
        .unwrap();
        (outcome, grows.get())
    }

    #[tokio::test]
    async fn stops_as_soon_as_extent_stops_changing() {
        let (outcome, grows) = run(&[1000, 2000, 3000, 3000, 4000], 50).await;
        assert_eq!(grows, 3);
        assert_eq!(
            outcome,
            GrowthOutcome {
                attempts: 3,
                extent: 3000,
                settled: true
            }
        );
    }

    #[tokio::test]
    async fn immediately_stable_page_takes_one_attempt() {
        let (outcome, grows) = run(&[800, 800], 50).await;
        assert_eq!(grows, 1);
        assert!(outcome.settled);
        assert_eq!(outcome.extent, 800);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let (outcome, grows) = run(&[1, 2, 3, 4, 5, 6, 7], 4).await;
        assert_eq!(grows, 4);
        assert_eq!(
            outcome,
            GrowthOutcome {
                attempts: 4,
                extent: 5,
                settled: false
            }
        );
    }

    #[tokio::test]
    async fn zero_attempts_only_measures_once() {
        let (outcome, grows) = run(&[42], 0).await;
        assert_eq!(grows, 0);
        assert_eq!(outcome.extent, 42);
        assert!(!outcome.settled);
    }

    #[tokio::test]
    async fn custom_stability_check_is_honoured() {
        let mut policy = policy(10);
        // Treat growth under 100px as stalled.
        policy.is_stable = |prev, next| next.saturating_sub(prev) < 100;

        let queue = RefCell::new(VecDeque::from(vec![1000, 2000, 2050, 9999]));
        let outcome = poll_until_stable(
            &policy,
            || async { Ok::<(), String>(()) },
            || {
                let next = queue.borrow_mut().pop_front().unwrap_or(0);
                async move { Ok::<u64, String>(next) }
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.extent, 2050);
    }

    #[tokio::test]
    async fn measure_error_is_propagated() {
        let calls = Cell::new(0u32);
        let result = poll_until_stable(
            &policy(5),
            || async { Ok::<(), &'static str>(()) },
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n == 2 {
                        Err("page crashed")
                    } else {
                        Ok(100)
                    }
                }
            },
        )
        .await;
        assert_eq!(result, Err("page crashed"));
    }
}
