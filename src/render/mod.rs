//! Canvas flattening, the CPU rasterizer, encoders and thumbnails.

pub(crate) mod backend;
pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod encode;
pub(crate) mod thumbnail;
