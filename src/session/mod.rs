//! End-to-end save flow.

pub(crate) mod save;
