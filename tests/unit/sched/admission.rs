use super::*;

#[test]
fn free_slots_admit_immediately() {
    let sched = Scheduler::new(2);
    let (_, t1) = sched.request_load("a", 0);
    let (_, t2) = sched.request_load("b", 0);
    assert!(t1.try_admitted());
    assert!(t2.try_admitted());
    assert_eq!(sched.admitted_count(), 2);
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn admitted_never_exceeds_the_bound() {
    let sched = Scheduler::new(4);
    let tickets: Vec<_> = (0..12).map(|i| sched.request_load(&format!("t{i}"), 0)).collect();

    let admitted: Vec<bool> = tickets.iter().map(|(_, t)| t.try_admitted()).collect();
    assert_eq!(admitted.iter().filter(|a| **a).count(), 4);
    // FIFO at equal priority: exactly the first four.
    assert!(admitted[..4].iter().all(|a| *a));
    assert!(admitted[4..].iter().all(|a| !*a));
    assert_eq!(sched.admitted_count(), 4);
    assert_eq!(sched.pending_count(), 8);

    // Finishing one admits exactly the next one, in order.
    sched.notify_finished(tickets[0].0);
    assert_eq!(sched.admitted_count(), 4);
    assert!(tickets[4].1.try_admitted());
    assert!(!tickets[5].1.try_admitted());
}

#[test]
fn higher_priority_wins_at_release_time() {
    let sched = Scheduler::new(1);
    let (held, _t) = sched.request_load("held", 0);
    let (_, low) = sched.request_load("low", 5);
    let (_, high) = sched.request_load("high", 10);

    sched.notify_finished(held);
    assert!(high.try_admitted());
    assert!(!low.try_admitted());
}

#[test]
fn equal_priorities_keep_insertion_order() {
    let sched = Scheduler::new(1);
    let (held, _t) = sched.request_load("held", 0);
    let (_, a) = sched.request_load("a", 5);
    let (_, b) = sched.request_load("b", 5);

    sched.notify_finished(held);
    assert!(a.try_admitted());
    assert!(!b.try_admitted());
}

#[test]
fn cancel_before_admission_never_occupies_a_slot() {
    let sched = Scheduler::new(1);
    let (held, _t) = sched.request_load("held", 0);
    let (id, ticket) = sched.request_load("cancelled", 0);
    let (_, next) = sched.request_load("next", 0);

    sched.cancel_load(id);
    assert_eq!(sched.pending_count(), 1);

    sched.notify_finished(held);
    assert!(!ticket.wait(), "cancelled ticket must resolve to not-admitted");
    assert!(next.try_admitted());
    assert_eq!(sched.admitted_count(), 1);
}

#[test]
fn cancel_after_admission_is_a_no_op() {
    let sched = Scheduler::new(1);
    let (id, ticket) = sched.request_load("a", 0);
    assert!(ticket.try_admitted());

    sched.cancel_load(id);
    assert_eq!(sched.admitted_count(), 1);

    // The slot still frees normally.
    sched.notify_finished(id);
    assert_eq!(sched.admitted_count(), 0);
}

#[test]
fn abandoned_tickets_are_skipped_without_burning_slots() {
    let sched = Scheduler::new(1);
    let (held, _t) = sched.request_load("held", 0);
    let (_, abandoned) = sched.request_load("abandoned", 0);
    let (_, live) = sched.request_load("live", 0);

    drop(abandoned);
    sched.notify_finished(held);

    assert!(live.try_admitted());
    assert_eq!(sched.admitted_count(), 1);
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn double_finish_is_harmless() {
    let sched = Scheduler::new(1);
    let (id, ticket) = sched.request_load("a", 0);
    assert!(ticket.try_admitted());
    let (_, queued) = sched.request_load("b", 0);

    sched.notify_finished(id);
    sched.notify_finished(id);
    assert!(queued.try_admitted());
    assert_eq!(sched.admitted_count(), 1);
}

#[test]
fn ticket_keeps_reporting_admitted() {
    let sched = Scheduler::new(1);
    let (_, ticket) = sched.request_load("a", 0);
    assert!(ticket.try_admitted());
    assert!(ticket.try_admitted());
    assert!(ticket.wait());
}
