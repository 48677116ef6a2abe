//! Contract detection - block scanning, token introspection, liquidity probes

pub mod metadata;
pub mod probe;
pub mod scanner;

pub use metadata::introspect;
pub use probe::{probe, V3_FEE_TIERS};
pub use scanner::BlockScanner;
