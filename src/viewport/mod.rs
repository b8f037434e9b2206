//! Per-element viewport lifecycle: when to request, cancel, time out, and
//! retry loads as elements move through the near and resident windows.

pub mod lifecycle;
