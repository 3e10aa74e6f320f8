//! Text processing: fragmenting, vocabulary, and sample hot-encoding.
//!
//! ## Submodules
//!
//! - [`fragments`] — Line normalization and sliding token windows
//! - [`vocab`] — First-seen-order vocabulary with O(1) lookup
//! - [`samples`] — Raw samples and cached one-hot expansion

pub mod fragments;
pub mod samples;
pub mod vocab;

pub use fragments::{fragments, Fragment};
pub use samples::{build_training_set, HotEncodedSample, Sample};
pub use vocab::Vocabulary;
