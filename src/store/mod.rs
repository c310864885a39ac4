//! Persistence collaborators: the personal work gallery and external export.

pub(crate) mod export;
pub(crate) mod works;
