#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
/// out-of-bounds pixel policies.
pub mod border;

/// image filtering module.
pub mod filter;

/// image flipping and rotation module.
pub mod flip;

/// module containing parallelization utilities.
pub mod parallel;
