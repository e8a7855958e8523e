#![warn(clippy::unwrap_used)]

pub mod fingerprint;
pub mod local;

pub use fingerprint::SourceFingerprint;
pub use local::DatasetCache;
