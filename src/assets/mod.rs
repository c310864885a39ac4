//! Asset decoding and the [`AssetProvider`](provider::AssetProvider) seam.

pub(crate) mod decode;
pub(crate) mod provider;
