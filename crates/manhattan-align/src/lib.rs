#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod aligner;
pub use aligner::*;

/// Statistical outlier filtering.
pub mod outlier;

/// Principal axis extraction.
pub mod pca;

/// Persisted transform records.
pub mod record;

/// Uniform rescaling to a target height.
pub mod scale;
