//! Sync verification - confirms a pushed tag is visible on the remote.
//!
//! The remote store is eventually consistent: a tag that was just pushed may
//! not show up on the read API immediately. The verifier bridges that gap
//! with a bounded exponential-backoff loop instead of blocking indefinitely.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, TagflowError};
use crate::remote::RemoteApi;
use crate::ui;

/// Injected suspension primitive for backoff sleeps.
///
/// Abstracting the sleep keeps the verifier testable (tests substitute an
/// immediate implementation) and lets the real implementation honour
/// shutdown signals mid-backoff.
pub trait Delay {
    /// Suspend for the given duration. Returns `false` when the wait was
    /// cancelled before completing.
    fn sleep(&self, duration: Duration) -> bool;
}

/// Real delay backed by `std::thread::sleep`.
///
/// Sleeps in short slices so a cancellation flag set by a signal handler is
/// noticed promptly rather than after the full backoff.
pub struct ThreadDelay {
    cancel: Arc<AtomicBool>,
}

impl ThreadDelay {
    const SLICE: Duration = Duration::from_millis(100);

    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        ThreadDelay { cancel }
    }
}

impl Delay for ThreadDelay {
    fn sleep(&self, duration: Duration) -> bool {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.cancel.load(Ordering::SeqCst) {
                return false;
            }
            let slice = remaining.min(Self::SLICE);
            std::thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
        !self.cancel.load(Ordering::SeqCst)
    }
}

/// Polls the remote until the tag is visible, or gives up.
///
/// Attempt `k` (1-based) that finds the tag returns immediately. A lookup
/// that reports the tag absent or fails outright counts as a failed attempt;
/// if attempts remain the verifier sleeps `2^k` seconds and retries. After
/// `max_attempts` consecutive failures it fails with `SyncTimeout`.
pub fn verify_visible<R, D>(remote: &R, tag_name: &str, max_attempts: u32, delay: &D) -> Result<()>
where
    R: RemoteApi + ?Sized,
    D: Delay + ?Sized,
{
    for attempt in 1..=max_attempts {
        ui::display_status(&format!(
            "Checking tag '{}' on remote (attempt {}/{})",
            tag_name, attempt, max_attempts
        ));

        match remote.tag_exists(tag_name) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => {
                ui::display_status(&format!("Tag lookup failed: {}", e));
            }
        }

        if attempt < max_attempts {
            // Clamp the exponent so an oversized attempt budget cannot
            // overflow the shift
            let backoff = Duration::from_secs(1u64 << attempt.min(32));
            ui::display_status(&format!("Waiting {}s for tag sync", backoff.as_secs()));
            if !delay.sleep(backoff) {
                return Err(TagflowError::Interrupted);
            }
        }
    }

    Err(TagflowError::SyncTimeout {
        tag: tag_name.to_string(),
        attempts: max_attempts,
    })
}
