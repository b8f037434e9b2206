//! Admission control: a bounded, priority-ordered load scheduler.

pub mod admission;
