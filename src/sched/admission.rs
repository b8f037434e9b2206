use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, SyncSender};

/// Default number of concurrently admitted loads.
pub const DEFAULT_SLOTS: usize = 4;

/// Identifier of a load request, unique within one [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Single-fire admission handshake for one request.
///
/// Exactly one admission notification is delivered per non-cancelled request.
/// Dropping the ticket abandons the request; the scheduler skips it at
/// release time without consuming a slot.
#[derive(Debug)]
pub struct AdmissionTicket {
    rx: Receiver<()>,
    admitted: Cell<bool>,
}

impl AdmissionTicket {
    /// Block until admitted. Returns `false` if the request was cancelled or
    /// the scheduler went away first.
    pub fn wait(&self) -> bool {
        if self.admitted.get() {
            return true;
        }
        let ok = self.rx.recv().is_ok();
        self.admitted.set(ok);
        ok
    }

    /// Non-blocking admission check; keeps returning `true` once admitted.
    pub fn try_admitted(&self) -> bool {
        if self.admitted.get() {
            return true;
        }
        if self.rx.try_recv().is_ok() {
            self.admitted.set(true);
            return true;
        }
        false
    }
}

#[derive(Debug)]
struct Pending {
    id: u64,
    priority: i32,
    notify: SyncSender<()>,
    address: String,
}

#[derive(Debug)]
struct State {
    slots: usize,
    /// Sorted by (priority desc, id asc); ids are monotone insertion order.
    pending: Vec<Pending>,
    admitted: HashSet<u64>,
    next_id: u64,
}

/// Bounded admission control for asset loads.
///
/// The scheduler bounds how many loads are in flight at once, independent of
/// how many elements want to load, and lets lower-priority work wait behind
/// higher-priority work. It is an explicitly constructed instance owned by
/// the application's composition root and passed by reference to consumers;
/// there is no hidden global.
///
/// Invariants: the number of admitted-but-unfinished requests never exceeds
/// the slot bound, and admission order is a pure function of
/// (priority desc, insertion order asc) over the queue at slot-release time.
/// Priorities are fixed after insertion; reprioritization is cancel + re-request.
#[derive(Debug)]
pub struct Scheduler {
    state: Mutex<State>,
}

impl Scheduler {
    /// Create a scheduler with `slots` concurrent admissions (min 1).
    pub fn new(slots: usize) -> Self {
        Self {
            state: Mutex::new(State {
                slots: slots.max(1),
                pending: Vec::new(),
                admitted: HashSet::new(),
                next_id: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Ask for a load slot for `address` at `priority`.
    ///
    /// Insertion is an O(log n) binary search on priority; requests at equal
    /// priority keep insertion order. If a slot is free the returned ticket
    /// is already resolved when this returns.
    pub fn request_load(&self, address: &str, priority: i32) -> (RequestId, AdmissionTicket) {
        let (tx, rx) = mpsc::sync_channel::<()>(1);
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        let pos = state.pending.partition_point(|p| p.priority >= priority);
        state.pending.insert(
            pos,
            Pending {
                id,
                priority,
                notify: tx,
                address: address.to_string(),
            },
        );
        tracing::debug!(id, address, priority, "load requested");
        admit_ready(&mut state);

        (
            RequestId(id),
            AdmissionTicket {
                rx,
                admitted: Cell::new(false),
            },
        )
    }

    /// Remove a not-yet-admitted request from the queue.
    ///
    /// A no-op (not an error) when the request was already admitted or already
    /// removed: cancellation only prevents work from *starting*.
    pub fn cancel_load(&self, id: RequestId) {
        let mut state = self.lock();
        if let Some(pos) = state.pending.iter().position(|p| p.id == id.0) {
            let dropped = state.pending.remove(pos);
            tracing::debug!(id = dropped.id, address = %dropped.address, "cancelled before admission");
        }
    }

    /// Release the slot held by `id` and immediately admit the next eligible
    /// pending request (highest priority, oldest among ties).
    pub fn notify_finished(&self, id: RequestId) {
        let mut state = self.lock();
        if state.admitted.remove(&id.0) {
            admit_ready(&mut state);
        }
    }

    /// Number of currently admitted, unfinished requests.
    pub fn admitted_count(&self) -> usize {
        self.lock().admitted.len()
    }

    /// Number of queued, not-yet-admitted requests.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }
}

fn admit_ready(state: &mut State) {
    while state.admitted.len() < state.slots && !state.pending.is_empty() {
        let next = state.pending.remove(0);
        match next.notify.send(()) {
            Ok(()) => {
                state.admitted.insert(next.id);
                tracing::debug!(id = next.id, address = %next.address, "admitted");
            }
            Err(_) => {
                // Ticket dropped; the consumer is gone. Skip without
                // consuming a slot.
                tracing::debug!(id = next.id, address = %next.address, "ticket abandoned; skipped");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sched/admission.rs"]
mod tests;
