//! Canvas model, editor gestures, JSON documents and the preset catalog.

pub(crate) mod canvas;
pub(crate) mod catalog;
pub(crate) mod document;
pub(crate) mod editor;
