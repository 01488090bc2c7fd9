//! Runtime and event loop integration.
//!
//! The compositor is driven by a single loop that:
//! - receives [`HostEvent`]s from the display-server runtime over a channel
//! - dispatches each one to completion before looking at the next
//! - fires expired timers between events
//!
//! Nothing here is shared between threads; the sending half of the channel
//! is the only thing the host needs to hold on to.

use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::core::compositor::{Compositor, HostEvent};
use crate::platform::api::Host;

// ============================================================================
// Timers
// ============================================================================

/// Handle to an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// What a timer is for, so the loop knows whom to call when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    OutputTestTimeout,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    deadline: Instant,
    kind: TimerKind,
}

/// One-shot timers ordered by deadline.
///
/// Cancelling a timer that already fired or was already cancelled does
/// nothing.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: BTreeMap<TimerId, Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer firing `delay` from now.
    pub fn arm(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.arm_at(Instant::now() + delay, kind)
    }

    pub fn arm_at(&mut self, deadline: Instant, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(id, Timer { deadline, kind });
        tracing::trace!("Armed timer {:?} ({:?})", id, kind);
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        if self.timers.remove(&id).is_some() {
            tracing::trace!("Cancelled timer {:?}", id);
        }
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// The earliest deadline among armed timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn take_expired(&mut self, now: Instant) -> Vec<(TimerId, TimerKind)> {
        let mut due: Vec<(Instant, TimerId, TimerKind)> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .map(|(id, timer)| (timer.deadline, *id, timer.kind))
            .collect();
        due.sort_by_key(|(deadline, id, _)| (*deadline, *id));

        for (_, id, _) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, id, kind)| (id, kind)).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

// ============================================================================
// Main Runtime
// ============================================================================

/// Why [`Runtime::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The compositor asked to terminate.
    Terminated,
    /// Every sender of the event channel was dropped.
    Disconnected,
}

/// The compositor event loop.
pub struct Runtime {
    events: Receiver<HostEvent>,
    /// Upper bound on a single wait, so a quiet channel still gets checked
    /// for termination regularly.
    max_wait: Duration,
}

impl Runtime {
    pub fn new(events: Receiver<HostEvent>) -> Self {
        Self {
            events,
            max_wait: Duration::from_secs(1),
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Dispatch events until the compositor terminates or the channel closes.
    pub fn run<H: Host>(&mut self, compositor: &mut Compositor<H>) -> ExitReason {
        tracing::info!("Compositor loop started");
        loop {
            if !compositor.is_running() {
                tracing::info!("Compositor loop terminated");
                return ExitReason::Terminated;
            }

            let now = Instant::now();
            compositor.advance(now);

            let wait = compositor
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(now))
                .unwrap_or(self.max_wait)
                .min(self.max_wait);

            match self.events.recv_timeout(wait) {
                Ok(event) => compositor.dispatch(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("Host event channel closed");
                    return ExitReason::Disconnected;
                }
            }
        }
    }

    /// Dispatch whatever is already queued without blocking, then fire due
    /// timers. Returns the number of events dispatched.
    pub fn poll<H: Host>(&mut self, compositor: &mut Compositor<H>) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            compositor.dispatch(event);
            count += 1;
        }
        compositor.advance(Instant::now());
        count
    }
}

// ============================================================================
// Tests
// ============================================================================
