//! Async driver: settle timer, commentary requests, and observer updates.
//!
//! [`SessionDriver`] wraps a [`RollSession`] for use on a Tokio runtime. Each
//! accepted roll spawns one task that:
//!
//! 1. sleeps for the configured settle duration,
//! 2. settles the session (history is prepended here),
//! 3. if a [`CommentaryTicket`] was issued, marks commentary as loading,
//!    awaits the commentator (failures become fallback lines), and applies
//!    the result.
//!
//! Every state change is published to observers through a
//! [`tokio::sync::watch`] channel of [`SessionView`]s.
//!
//! Tasks hold only a weak reference to the session. Dropping the driver (or
//! calling [`shutdown`](SessionDriver::shutdown)) tears the session down, and
//! any step that runs afterwards is skipped.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dice_commentary::GeminiCommentator;
//! use dice_engine::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let session = RollSession::new(
//!     SessionConfig::default(),
//!     SeededRng::from_entropy(),
//!     Arc::new(SystemClock),
//! );
//! let driver = SessionDriver::new(session, Arc::new(GeminiCommentator::from_env()?));
//!
//! let mut views = driver.subscribe();
//! if let Some(handle) = driver.roll() {
//!     println!("rolling to {}", handle.started().value);
//!     let outcome = handle.finished().await;
//!     println!("{outcome:?}");
//! }
//! views.changed().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use dice_commentary::{interpret_or_fallback, Commentator};
use dice_core::history::RollRecord;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::session::{CommentaryTicket, RollSession, RollStarted};
use crate::snapshot::SessionView;

type SharedSession = Arc<Mutex<RollSession>>;

fn lock(session: &Mutex<RollSession>) -> MutexGuard<'_, RollSession> {
    // State is only mutated through RollSession methods, which leave it
    // consistent even if a caller panicked while holding the lock.
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// RollOutcome
// ---------------------------------------------------------------------------

/// How one roll's lifecycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// Settled; no commentary was requested (AI off or no commentator).
    Settled {
        record: RollRecord,
    },
    /// Settled, and commentary (possibly a fallback line) was applied.
    Commented {
        record: RollRecord,
        text: String,
    },
    /// The session was torn down before the lifecycle finished. `record` is
    /// set if the roll had already settled.
    Discarded {
        record: Option<RollRecord>,
    },
}

impl RollOutcome {
    /// The settled record, if the roll got that far.
    pub fn record(&self) -> Option<&RollRecord> {
        match self {
            RollOutcome::Settled { record } | RollOutcome::Commented { record, .. } => Some(record),
            RollOutcome::Discarded { record } => record.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// RollHandle
// ---------------------------------------------------------------------------

/// An accepted roll. Dropping the handle does not cancel the roll.
#[derive(Debug)]
pub struct RollHandle {
    started: RollStarted,
    task: JoinHandle<RollOutcome>,
}

impl RollHandle {
    pub fn started(&self) -> &RollStarted {
        &self.started
    }

    /// Wait for settle and, if requested, the commentary result.
    pub async fn finished(self) -> RollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, roll_trigger = self.started.roll_trigger, "roll task did not complete");
                RollOutcome::Discarded { record: None }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SessionDriver
// ---------------------------------------------------------------------------

/// Runs a [`RollSession`] on the current Tokio runtime.
pub struct SessionDriver {
    session: SharedSession,
    commentator: Arc<dyn Commentator>,
    views: Arc<watch::Sender<SessionView>>,
}

impl SessionDriver {
    /// Take ownership of `session`. Commentary is available exactly when
    /// `commentator.is_configured()`.
    pub fn new(mut session: RollSession, commentator: Arc<dyn Commentator>) -> Self {
        session.set_commentary_available(commentator.is_configured());
        let (views, _) = watch::channel(session.view());
        Self {
            session: Arc::new(Mutex::new(session)),
            commentator,
            views: Arc::new(views),
        }
    }

    /// A receiver that sees every published [`SessionView`].
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.views.subscribe()
    }

    /// The current view.
    pub fn view(&self) -> SessionView {
        lock(&self.session).view()
    }

    /// Run `f` with shared access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&RollSession) -> R) -> R {
        f(&lock(&self.session))
    }

    /// Request a roll. Returns `None` if a roll is already in flight (the
    /// running timer is left alone) or the session is shut down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn roll(&self) -> Option<RollHandle> {
        let started = {
            let mut session = lock(&self.session);
            let started = session.request_roll()?;
            self.views.send_replace(session.view());
            started
        };

        let task = tokio::spawn(run_roll(
            Arc::downgrade(&self.session),
            Arc::clone(&self.views),
            Arc::clone(&self.commentator),
            started,
        ));

        Some(RollHandle { started, task })
    }

    /// Flip the AI toggle; returns the new state.
    pub fn toggle_ai(&self) -> bool {
        let mut session = lock(&self.session);
        let enabled = session.toggle_ai();
        self.views.send_replace(session.view());
        enabled
    }

    /// Empty the roll history.
    pub fn clear_history(&self) {
        let mut session = lock(&self.session);
        session.clear_history();
        self.views.send_replace(session.view());
    }

    /// Tear the session down. Pending settles and commentary are discarded.
    pub fn shutdown(&self) {
        let mut session = lock(&self.session);
        session.teardown();
        self.views.send_replace(session.view());
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        lock(&self.session).teardown();
    }
}

// ---------------------------------------------------------------------------
// Roll task
// ---------------------------------------------------------------------------

/// Apply `f` to the session if it still exists, then publish the new view.
/// Returns `None` if the session is gone.
fn with_live_session<R>(
    session: &Weak<Mutex<RollSession>>,
    views: &watch::Sender<SessionView>,
    f: impl FnOnce(&mut RollSession) -> R,
) -> Option<R> {
    let session = session.upgrade()?;
    let mut guard = lock(&session);
    let result = f(&mut guard);
    views.send_replace(guard.view());
    Some(result)
}

async fn run_roll(
    session: Weak<Mutex<RollSession>>,
    views: Arc<watch::Sender<SessionView>>,
    commentator: Arc<dyn Commentator>,
    started: RollStarted,
) -> RollOutcome {
    tokio::time::sleep(started.settle_after).await;

    let Some(settled) = with_live_session(&session, &views, |s| s.settle()).flatten() else {
        tracing::debug!(roll_trigger = started.roll_trigger, "settle skipped: session gone");
        return RollOutcome::Discarded { record: None };
    };
    let record = settled.record;

    let Some(ticket) = settled.commentary else {
        return RollOutcome::Settled { record };
    };

    if !with_live_session(&session, &views, |s| s.begin_commentary(&ticket)).unwrap_or(false) {
        return RollOutcome::Discarded {
            record: Some(record),
        };
    }

    let text = interpret_or_fallback(commentator.as_ref(), ticket.value).await;
    apply_commentary(&session, &views, ticket, record, text)
}

fn apply_commentary(
    session: &Weak<Mutex<RollSession>>,
    views: &watch::Sender<SessionView>,
    ticket: CommentaryTicket,
    record: RollRecord,
    text: String,
) -> RollOutcome {
    let applied = with_live_session(session, views, |s| s.finish_commentary(&ticket, text.clone()))
        .unwrap_or(false);
    if applied {
        RollOutcome::Commented { record, text }
    } else {
        tracing::debug!(roll_trigger = ticket.roll_trigger, "commentary discarded: session gone");
        RollOutcome::Discarded {
            record: Some(record),
        }
    }
}
