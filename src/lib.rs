//! # SGM (Skip-Gram Model)
//!
//! A hand-written skip-gram neural network that learns word-context
//! associations from raw text.
//!
//! ## Overview
//!
//! The network has a single hidden layer. Given a hot-encoded center word it
//! predicts, for each of the `window - 1` surrounding context positions, a
//! probability distribution over the vocabulary. Weights are learned through
//! backpropagation via (configurable) mini-batch gradient descent applied to
//! a collection of hot-encoded training samples.
//!
//! ## Structure
//!
//! - [`core`] — Network state, forward pass, activation functions
//! - [`data`] — Text fragmenting, vocabulary, sample hot-encoding
//! - [`training`] — Mini-batch gradient descent, convergence, update modes
//! - [`model`] — Builder entry point, trained model, evaluation
//!
//! ## Example
//!
//! ```ignore
//! let model = SkipGramModel::builder()
//!     .from_text("the quick brown fox\nthe lazy dog")
//!     .window(3)
//!     .dimension(25)
//!     .batch_size(8)
//!     .alpha(0.05)
//!     .update(UpdateMode::Nesterov)
//!     .max_iterations(10_000)
//!     .build()?;
//! let accuracy = model.evaluate();
//! ```

pub mod core;
pub mod data;
pub mod model;
pub mod training;

pub use crate::core::{Activation, Rectifier, SgmError, SgmResult, SkipGramNet, Softmax};
pub use crate::data::{fragments, Fragment, HotEncodedSample, Sample, Vocabulary};
pub use crate::model::{Builder, SkipGramModel};
pub use crate::training::{learn_weights, TrainReport};

/// Parameter update strategy for gradient descent.
///
/// The three modes are mutually exclusive by construction; `mu` in
/// [`TrainConfig`] is the momentum coefficient used by the latter two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// `param -= alpha * grad`
    Plain,
    /// `v = mu*v - alpha*grad; param += v`
    Momentum,
    /// Momentum with a Nesterov-style lookahead correction:
    /// `param += -mu*v_prev + (1 + mu)*v`
    Nesterov,
}

/// Training configuration for mini-batch gradient descent.
///
/// Used by [`learn_weights`] and assembled by [`model::Builder`].
/// A `batch_size` of 0 means the whole training set per batch; a
/// `max_iterations` of 0 is replaced at build time by
/// `samples * 100_000`.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Learning rate (alpha).
    pub alpha: f64,
    /// Momentum coefficient (mu), used by momentum and Nesterov updates.
    pub mu: f64,
    /// L2 regularization coefficient (lambda).
    pub lambda: f64,
    /// Loss value below which training is considered converged.
    pub threshold: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Parameter update strategy.
    pub update: UpdateMode,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            mu: 0.9,
            lambda: 0.03,
            threshold: 4e-13,
            max_iterations: 0,
            batch_size: 0,
            update: UpdateMode::Plain,
        }
    }
}
