use crate::config::{LifecycleOpts, RetryCadence};
use crate::sched::admission::{AdmissionTicket, RequestId, Scheduler};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Queued(RequestId),
    Admitted { id: RequestId, deadline_ms: u64 },
    Loaded,
    /// `retry_at: None` means the retry budget is exhausted (terminal until an
    /// external event clears the element).
    Broken { retry_at: Option<u64> },
}

/// What the UI should draw for an element right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing requested yet (off-screen or torn down).
    Empty,
    /// A load is queued or in flight; show the loading placeholder.
    Pending,
    /// The image is loaded and rendered.
    Ready,
    /// Failed, but still under its retry budget; show the placeholder with a
    /// retrying indicator.
    RetryingPlaceholder,
    /// Retry budget exhausted; show the static broken indicator.
    BrokenPlaceholder,
}

/// Per-element viewport lifecycle controller.
///
/// Two independent geometric observers feed [`observe_near`] and
/// [`observe_resident`]; the machine decides when to request a load from the
/// injected [`Scheduler`], when to cancel, when to declare an in-flight load
/// stuck, and how aggressively to retry. It is the sole owner of retry and
/// backoff decisions; the service and the scheduler stay stateless.
///
/// Time-dependent methods take `now_ms` so the machine never reads a clock
/// and is fully deterministic under test, independent of any
/// geometry-observation primitive the host platform offers.
///
/// [`observe_near`]: TileLifecycle::observe_near
/// [`observe_resident`]: TileLifecycle::observe_resident
#[derive(Debug)]
pub struct TileLifecycle {
    address: String,
    priority: i32,
    source_timestamp_ms: u64,
    opts: LifecycleOpts,
    near: bool,
    resident: bool,
    phase: Phase,
    attempts: u32,
    active_cadence: Option<RetryCadence>,
}

impl TileLifecycle {
    /// Create a controller for one element.
    ///
    /// `source_timestamp_ms` is the discovery/modification time of the asset
    /// and selects the retry cadence. `priority` is fixed for the element's
    /// lifetime; reprioritizing means tearing down and re-creating.
    pub fn new(
        address: impl Into<String>,
        priority: i32,
        source_timestamp_ms: u64,
        opts: LifecycleOpts,
    ) -> Self {
        Self {
            address: address.into(),
            priority,
            source_timestamp_ms,
            opts,
            near: false,
            resident: false,
            phase: Phase::Idle,
            attempts: 0,
            active_cadence: None,
        }
    }

    /// Near-window observer input.
    ///
    /// Entering `near` requests a load (the returned ticket is the host's
    /// admission handshake); leaving it cancels a still-queued request.
    /// Admitted and loaded work survives until residency is lost.
    pub fn observe_near(&mut self, near: bool, sched: &Scheduler) -> Option<AdmissionTicket> {
        if near == self.near {
            return None;
        }
        self.near = near;

        if near {
            return self.maybe_request(sched);
        }
        if let Phase::Queued(id) = self.phase {
            sched.cancel_load(id);
            self.phase = Phase::Idle;
            tracing::debug!(address = %self.address, "left near window; cancelled queued load");
        }
        None
    }

    /// Resident-window observer input.
    ///
    /// Losing residency unconditionally tears down any held slot and any
    /// pending request, regardless of the near state. This is the outer
    /// safety boundary that prevents slot leakage during fast scrolling.
    pub fn observe_resident(&mut self, resident: bool, sched: &Scheduler) {
        if resident == self.resident {
            return;
        }
        self.resident = resident;
        if resident {
            return;
        }

        match self.phase {
            Phase::Queued(id) => sched.cancel_load(id),
            Phase::Admitted { id, .. } => sched.notify_finished(id),
            _ => {}
        }
        match self.phase {
            Phase::Broken { .. } => {}
            _ => {
                self.phase = Phase::Idle;
                tracing::debug!(address = %self.address, "lost residency; torn down");
            }
        }
    }

    /// The scheduler granted the slot; arms the render-timeout guard.
    pub fn note_admitted(&mut self, now_ms: u64) {
        if let Phase::Queued(id) = self.phase {
            self.phase = Phase::Admitted {
                id,
                deadline_ms: now_ms + self.opts.render_timeout_ms,
            };
        }
    }

    /// The image rendered successfully; clears the guard, releases the slot.
    pub fn note_loaded(&mut self, sched: &Scheduler) {
        if let Phase::Admitted { id, .. } = self.phase {
            sched.notify_finished(id);
            self.phase = Phase::Loaded;
            self.attempts = 0;
            self.active_cadence = None;
        }
    }

    /// The load failed after admission (a locked source, a decode error in
    /// the UI); releases the slot and schedules a retry.
    pub fn note_failed(&mut self, now_ms: u64, sched: &Scheduler) {
        if let Phase::Admitted { id, .. } = self.phase {
            sched.notify_finished(id);
            self.schedule_retry(now_ms);
        }
    }

    /// External notice that the source file is gone; clears the element so
    /// the UI can drop it from its collection.
    pub fn note_source_removed(&mut self, sched: &Scheduler) {
        match self.phase {
            Phase::Queued(id) => sched.cancel_load(id),
            Phase::Admitted { id, .. } => sched.notify_finished(id),
            _ => {}
        }
        self.phase = Phase::Idle;
        self.attempts = 0;
        self.active_cadence = None;
    }

    /// Drive timers: the render-timeout guard and due retries.
    ///
    /// Returns a new admission ticket when a due retry re-issued the load.
    pub fn poll(&mut self, now_ms: u64, sched: &Scheduler) -> Option<AdmissionTicket> {
        match self.phase {
            Phase::Admitted { id, deadline_ms } if now_ms >= deadline_ms => {
                tracing::debug!(address = %self.address, "render timeout; releasing slot");
                sched.notify_finished(id);
                self.schedule_retry(now_ms);
                None
            }
            Phase::Broken {
                retry_at: Some(at),
            } if now_ms >= at => {
                if self.near {
                    return self.issue_request(sched);
                }
                // Nobody is near; restart on the next near entry instead.
                self.phase = Phase::Idle;
                None
            }
            _ => None,
        }
    }

    /// Current render state for the UI.
    pub fn render_state(&self) -> RenderState {
        match self.phase {
            Phase::Idle => RenderState::Empty,
            Phase::Queued(_) | Phase::Admitted { .. } => RenderState::Pending,
            Phase::Loaded => RenderState::Ready,
            Phase::Broken { retry_at: Some(_) } => RenderState::RetryingPlaceholder,
            Phase::Broken { retry_at: None } => RenderState::BrokenPlaceholder,
        }
    }

    /// Failed attempts so far (diagnostics).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether the element is currently inside the near window.
    pub fn is_near(&self) -> bool {
        self.near
    }

    /// Whether the element is currently inside the resident window.
    pub fn is_resident(&self) -> bool {
        self.resident
    }

    fn maybe_request(&mut self, sched: &Scheduler) -> Option<AdmissionTicket> {
        match self.phase {
            Phase::Idle => self.issue_request(sched),
            // Broken waits for its retry timer (or stays terminal); queued,
            // admitted and loaded states already have what they need.
            _ => None,
        }
    }

    fn issue_request(&mut self, sched: &Scheduler) -> Option<AdmissionTicket> {
        let (id, ticket) = sched.request_load(&self.address, self.priority);
        self.phase = Phase::Queued(id);
        Some(ticket)
    }

    fn schedule_retry(&mut self, now_ms: u64) {
        self.attempts += 1;
        let cadence = match self.active_cadence {
            Some(c) => c,
            None => {
                let c = self.classify_cadence(now_ms);
                self.active_cadence = Some(c);
                c
            }
        };
        if self.attempts > cadence.max_attempts {
            tracing::debug!(
                address = %self.address,
                attempts = self.attempts,
                "retry budget exhausted; element broken"
            );
            self.phase = Phase::Broken { retry_at: None };
        } else {
            self.phase = Phase::Broken {
                retry_at: Some(now_ms + cadence.interval_ms),
            };
        }
    }

    /// Classified once at the first failure of a sequence and held until the
    /// element loads or is cleared, so a fresh asset keeps its full fast
    /// budget even as it ages past the window mid-sequence.
    fn classify_cadence(&self, now_ms: u64) -> RetryCadence {
        let age_ms = now_ms.saturating_sub(self.source_timestamp_ms);
        if age_ms <= self.opts.fresh_window_ms {
            self.opts.fresh
        } else {
            self.opts.stale
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/lifecycle.rs"]
mod tests;
