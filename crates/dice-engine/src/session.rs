//! The roll lifecycle state machine.
//!
//! [`RollSession`] owns all per-session state: the current face, the cube
//! orientation, the roll phase, the history, the AI toggle, and the current
//! interpretation. It is synchronous and has no timer of its own. A driver
//! (see [`SessionDriver`](crate::driver::SessionDriver)) calls
//! [`request_roll`](RollSession::request_roll), waits
//! [`SessionConfig::settle_duration`], then calls
//! [`settle`](RollSession::settle), and routes any returned
//! [`CommentaryTicket`] to the commentary collaborator.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle --request_roll--> Rolling --settle--> Idle
//!                            |                  |
//!                  request_roll ignored    history prepended,
//!                                          ticket issued if AI on
//! ```
//!
//! Commentary results are applied last-write-wins. The only thing that
//! discards a result is [`teardown`](RollSession::teardown), which bumps the
//! session generation so that outstanding tickets no longer match.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dice_core::prelude::*;
//! use dice_engine::prelude::*;
//!
//! let rng = ScriptedRng::new([FaceValue::FOUR], [3.5, 4.2]);
//! let mut session = RollSession::new(SessionConfig::default(), rng, Arc::new(ManualClock::new(0)));
//! session.set_commentary_available(true);
//!
//! let started = session.request_roll().unwrap();
//! assert_eq!(started.value, FaceValue::FOUR);
//! assert!(session.request_roll().is_none()); // still rolling
//!
//! let settled = session.settle().unwrap();
//! assert_eq!(session.history().latest(), Some(&settled.record));
//! let ticket = settled.commentary.unwrap();
//!
//! assert!(session.begin_commentary(&ticket));
//! assert!(session.finish_commentary(&ticket, "四平八稳".to_owned()));
//! assert_eq!(session.interpretation(), Some("四平八稳"));
//! ```

use std::sync::Arc;
use std::time::Duration;

use dice_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::snapshot::SessionView;

/// Time from roll request to settle. The spin animation must use the same
/// duration; both read it from [`SessionConfig::settle_duration`].
pub const SETTLE_DURATION: Duration = Duration::from_millis(2000);

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`RollSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Delay between a roll request and settle; also the spin animation
    /// length. Must be non-zero. Default: [`SETTLE_DURATION`].
    pub settle_duration: Duration,
    /// Extra full turns per roll. Default: `[3, 6)`.
    pub spin_range: SpinRange,
    /// Whether commentary is requested after each roll. Default: on.
    pub ai_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_duration: SETTLE_DURATION,
            spin_range: SpinRange::default(),
            ai_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle results
// ---------------------------------------------------------------------------

/// Returned by a roll request that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollStarted {
    /// The face the die will land on.
    pub value: FaceValue,
    /// Incremented on every accepted roll, so repeated faces are distinct events.
    pub roll_trigger: u64,
    /// Cumulative orientation the cube animates to.
    pub orientation: Orientation,
    /// How long until the driver should call [`RollSession::settle`].
    pub settle_after: Duration,
}

/// Permission to apply one commentary result to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryTicket {
    /// The face to comment on.
    pub value: FaceValue,
    /// Roll trigger of the roll that issued this ticket.
    pub roll_trigger: u64,
    /// Session generation at issue time.
    generation: u64,
}

/// Returned when a rolling session settles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settled {
    /// The record just prepended to the history.
    pub record: RollRecord,
    /// Present when AI is on and a commentator is available.
    pub commentary: Option<CommentaryTicket>,
}

// ---------------------------------------------------------------------------
// RollSession
// ---------------------------------------------------------------------------

/// In-memory state of one die session.
pub struct RollSession {
    config: SessionConfig,
    rng: Box<dyn RollRng>,
    clock: Arc<dyn Clock>,
    current: FaceValue,
    orientation: Orientation,
    phase: RollPhase,
    roll_trigger: u64,
    history: RollHistory,
    ai_enabled: bool,
    interpretation: Option<String>,
    loading_commentary: bool,
    commentary_available: bool,
    generation: u64,
    torn_down: bool,
}

impl RollSession {
    /// Create a session showing face 1 at zero orientation.
    ///
    /// Commentary is considered unavailable until
    /// [`set_commentary_available`](Self::set_commentary_available) says
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `config.settle_duration` is zero or `config.spin_range` is
    /// invalid.
    pub fn new(config: SessionConfig, rng: impl RollRng + 'static, clock: Arc<dyn Clock>) -> Self {
        assert!(
            !config.settle_duration.is_zero(),
            "settle_duration must be non-zero"
        );
        if let Err(e) = config.spin_range.validate() {
            panic!("spin_range must be valid: {e}");
        }
        Self {
            ai_enabled: config.ai_enabled,
            config,
            rng: Box::new(rng),
            clock,
            current: FaceValue::ONE,
            orientation: Orientation::ZERO,
            phase: RollPhase::Idle,
            roll_trigger: 0,
            history: RollHistory::new(),
            interpretation: None,
            loading_commentary: false,
            commentary_available: false,
            generation: 0,
            torn_down: false,
        }
    }

    /// Start a roll.
    ///
    /// Returns `None` without touching any state if a roll is already in
    /// progress or the session has been torn down. Otherwise draws the face,
    /// clears the interpretation, advances the orientation, and enters
    /// [`RollPhase::Rolling`].
    pub fn request_roll(&mut self) -> Option<RollStarted> {
        if self.torn_down {
            tracing::debug!("roll ignored: session torn down");
            return None;
        }
        if self.phase.is_rolling() {
            tracing::debug!(roll_trigger = self.roll_trigger, "roll ignored: already rolling");
            return None;
        }

        let value = self.rng.face();
        let spin_range = self.config.spin_range;
        self.orientation = self
            .orientation
            .roll_to(value, self.rng.as_mut(), &spin_range);
        self.interpretation = None;
        self.phase = RollPhase::Rolling;
        self.current = value;
        self.roll_trigger += 1;

        tracing::debug!(
            value = value.get(),
            roll_trigger = self.roll_trigger,
            x = self.orientation.x,
            y = self.orientation.y,
            "roll started"
        );

        Some(RollStarted {
            value,
            roll_trigger: self.roll_trigger,
            orientation: self.orientation,
            settle_after: self.config.settle_duration,
        })
    }

    /// Finish the roll in progress.
    ///
    /// Returns `None` if nothing is rolling or the session has been torn
    /// down. Otherwise returns to [`RollPhase::Idle`], prepends a
    /// [`RollRecord`] stamped with the clock, and issues a
    /// [`CommentaryTicket`] when AI is enabled and commentary is available.
    pub fn settle(&mut self) -> Option<Settled> {
        if self.torn_down || !self.phase.is_rolling() {
            return None;
        }

        self.phase = RollPhase::Idle;
        let record = RollRecord {
            value: self.current,
            timestamp_ms: self.clock.now_ms(),
        };
        self.history.record(record);

        let commentary = (self.ai_enabled && self.commentary_available).then_some(CommentaryTicket {
            value: record.value,
            roll_trigger: self.roll_trigger,
            generation: self.generation,
        });

        tracing::debug!(
            value = record.value.get(),
            roll_trigger = self.roll_trigger,
            history_len = self.history.len(),
            commentary = commentary.is_some(),
            "roll settled"
        );

        Some(Settled { record, commentary })
    }

    /// Mark a commentary request as in flight. Returns `false` (and changes
    /// nothing) if the ticket is stale.
    pub fn begin_commentary(&mut self, ticket: &CommentaryTicket) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }
        self.loading_commentary = true;
        true
    }

    /// Apply a commentary result. Last write wins; returns `false` and
    /// discards `text` if the ticket is stale.
    pub fn finish_commentary(&mut self, ticket: &CommentaryTicket, text: String) -> bool {
        if !self.ticket_is_current(ticket) {
            tracing::warn!(
                roll_trigger = ticket.roll_trigger,
                "discarding commentary for a torn-down session"
            );
            return false;
        }
        tracing::info!(value = ticket.value.get(), roll_trigger = ticket.roll_trigger, "commentary applied");
        self.interpretation = Some(text);
        self.loading_commentary = false;
        true
    }

    fn ticket_is_current(&self, ticket: &CommentaryTicket) -> bool {
        !self.torn_down && ticket.generation == self.generation
    }

    /// Flip the AI toggle and return the new state. In-flight requests are
    /// unaffected.
    pub fn toggle_ai(&mut self) -> bool {
        self.ai_enabled = !self.ai_enabled;
        self.ai_enabled
    }

    /// Empty the history. Current value and phase are unaffected.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Whether a configured commentator is attached.
    pub fn set_commentary_available(&mut self, available: bool) {
        self.commentary_available = available;
    }

    /// End the session. Later rolls and settles are ignored and every
    /// outstanding [`CommentaryTicket`] becomes stale.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.generation += 1;
        self.loading_commentary = false;
        tracing::debug!(generation = self.generation, "session torn down");
    }

    // -- accessors ----------------------------------------------------------

    pub fn current_value(&self) -> FaceValue {
        self.current
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    pub fn roll_trigger(&self) -> u64 {
        self.roll_trigger
    }

    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub fn interpretation(&self) -> Option<&str> {
        self.interpretation.as_deref()
    }

    pub fn is_loading_commentary(&self) -> bool {
        self.loading_commentary
    }

    pub fn commentary_available(&self) -> bool {
        self.commentary_available
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only snapshot for observers.
    pub fn view(&self) -> SessionView {
        SessionView {
            current_value: self.current,
            roll_trigger: self.roll_trigger,
            orientation: self.orientation,
            phase: self.phase,
            history: self.history.iter().copied().collect(),
            ai_enabled: self.ai_enabled,
            interpretation: self.interpretation.clone(),
            loading_commentary: self.loading_commentary,
            spin_duration_ms: u64::try_from(self.config.settle_duration.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl std::fmt::Debug for RollSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollSession")
            .field("current", &self.current)
            .field("orientation", &self.orientation)
            .field("phase", &self.phase)
            .field("roll_trigger", &self.roll_trigger)
            .field("history_len", &self.history.len())
            .field("ai_enabled", &self.ai_enabled)
            .field("generation", &self.generation)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
