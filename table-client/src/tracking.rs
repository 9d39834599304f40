//! Order tracking projection
//!
//! After submit the guest watches the kitchen progress through three
//! stages, advanced on a fixed timer. The projector is deterministic
//! over an injected [`Clock`] so the timing can be tested without
//! sleeping.

use tracing::warn;

use shared::order::{OrderState, PersistedOrder};
use shared::util;

use crate::codec::decode_state;
use crate::storage::{self, KvStore};

/// Milliseconds between kitchen stage transitions
pub const STAGE_INTERVAL_MS: i64 = 40_000;

/// Offset of the estimated ready time from opening the tracker
pub const ESTIMATED_READY_MS: i64 = 20 * 60 * 1000;

/// Time source for stage progression
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        util::now_millis()
    }
}

/// Kitchen progress stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrackingStage {
    Received,
    Preparing,
    Ready,
}

impl TrackingStage {
    fn from_index(index: i64) -> Self {
        match index {
            i64::MIN..=0 => Self::Received,
            1 => Self::Preparing,
            _ => Self::Ready,
        }
    }

    /// The following stage; `Ready` stays put
    pub fn next(self) -> Self {
        match self {
            Self::Received => Self::Preparing,
            Self::Preparing => Self::Ready,
            Self::Ready => Self::Ready,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Ready
    }
}

/// Live view of a submitted order's progress
pub struct TrackingProjector<C: Clock = SystemClock> {
    state: OrderState,
    order_id: Option<String>,
    queue_number: u32,
    started_at: i64,
    stage: TrackingStage,
    clock: C,
}

impl<C: Clock> TrackingProjector<C> {
    /// Open the tracker from an incoming state token
    ///
    /// A missing or empty token falls back to the last submitted order
    /// in storage, so a reloaded tracking page keeps showing the order.
    /// The queue number is taken from the state when present, otherwise
    /// drawn fresh.
    pub fn open(kv: &KvStore, token: Option<&str>, clock: C) -> Self {
        let mut state = decode_state(token);
        let mut order_id = None;

        if state.items.is_empty() {
            match kv.get_json::<PersistedOrder>(storage::ORDER_STATE_KEY) {
                Ok(Some(order)) => {
                    state = order.to_state();
                    order_id = Some(order.order_id);
                }
                Ok(None) => {}
                Err(e) => warn!("failed to restore last order: {e}"),
            }
        }

        let queue_number = state.queue_number.unwrap_or_else(util::queue_number);
        let started_at = clock.now_millis();
        Self { state, order_id, queue_number, started_at, stage: TrackingStage::Received, clock }
    }

    pub fn state(&self) -> &OrderState {
        &self.state
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    /// Queue position shown on the ticket, stable for the session
    pub fn queue_number(&self) -> u32 {
        self.queue_number
    }

    pub fn stage(&self) -> TrackingStage {
        self.stage
    }

    /// Recompute the stage from elapsed time
    ///
    /// The stage only ever moves forward: a clock that jumps backwards
    /// cannot regress an already reached stage.
    pub fn tick(&mut self) -> TrackingStage {
        let elapsed = self.clock.now_millis() - self.started_at;
        let derived = TrackingStage::from_index(elapsed / STAGE_INTERVAL_MS);
        if derived > self.stage {
            self.stage = derived;
        }
        self.stage
    }

    /// Force a single forward step, used by the timer callback
    pub fn advance(&mut self) -> TrackingStage {
        self.stage = self.stage.next();
        self.stage
    }

    /// Promised ready time, a fixed offset from opening the tracker
    pub fn estimated_ready_at(&self) -> i64 {
        self.started_at + ESTIMATED_READY_MS
    }
}

impl TrackingProjector<SystemClock> {
    /// Open a tracker on the wall clock
    pub fn open_system(kv: &KvStore, token: Option<&str>) -> Self {
        Self::open(kv, token, SystemClock)
    }
}
