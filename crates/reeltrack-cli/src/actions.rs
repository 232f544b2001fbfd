//! Per-control locking, confirmation prompts and action outcomes for the
//! dashboard's mutating actions.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reeltrack_core::Notice;

/// Guards one control. While held, re-triggering that control is rejected
/// without issuing a request. Other controls are unaffected.
#[derive(Debug, Clone, Default)]
pub struct ControlLock {
    busy: Arc<AtomicBool>,
}

/// Releases the control on drop, whatever path the action took.
#[derive(Debug)]
pub struct ControlGuard {
    busy: Arc<AtomicBool>,
}

impl ControlLock {
    /// Locks the control, or returns `None` if an action is already running.
    #[must_use]
    pub fn try_acquire(&self) -> Option<ControlGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ControlGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// One lock per dashboard action.
#[derive(Debug, Clone, Default)]
pub struct DashboardControls {
    pub add_post: ControlLock,
    pub bulk_add: ControlLock,
    pub delete_all: ControlLock,
    pub delete_creator: ControlLock,
    pub poll_now: ControlLock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the mutation and the view was re-fetched.
    Completed(Notice),
    /// The request failed; displayed state is untouched.
    Failed(Notice),
    /// The user declined the confirmation. No request was sent.
    Cancelled,
    /// The control was already locked. No request was sent.
    Busy,
}

impl ActionOutcome {
    #[cfg(test)]
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Completed(n) | Self::Failed(n) => Some(n),
            Self::Cancelled | Self::Busy => None,
        }
    }
}

/// Asks the user to approve an irreversible action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Prompts on stderr and reads one line from stdin. Only `y`/`yes` approve.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer)
    }
}

/// Approves every prompt. Backs the `--yes` flag.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_rejects_reentry_until_guard_drops() {
        let lock = ControlLock::default();
        let guard = lock.try_acquire().expect("first acquire");
        assert!(lock.is_locked());
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(!lock.is_locked());
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn controls_lock_independently() {
        let controls = DashboardControls::default();
        let _poll = controls.poll_now.try_acquire().expect("poll lock");
        assert!(controls.add_post.try_acquire().is_some());
        assert!(controls.poll_now.try_acquire().is_none());
    }

    #[test]
    fn only_yes_answers_approve() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn outcome_exposes_notice_only_when_a_request_ran() {
        assert!(ActionOutcome::Busy.notice().is_none());
        assert!(ActionOutcome::Cancelled.notice().is_none());
        let failed = ActionOutcome::Failed(Notice::error("boom"));
        assert_eq!(failed.notice().map(|n| n.text.as_str()), Some("boom"));
    }
}
