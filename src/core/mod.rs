//! Network kernel: weights, forward pass, activation functions.
//!
//! The network maps a hot-encoded center word to per-context-position
//! probability distributions over the vocabulary:
//!
//! ```text
//! hidden = relu(x · W0ᵀ + b0)
//! scores = hidden · W1ᵀ + b1
//! probs  = softmax applied to each of the (window - 1) score segments
//! ```
//!
//! Weight matrices map between adjacent layers: `w0` maps input to hidden,
//! `w1` maps hidden to output. Row `i` of a weight matrix holds the incoming
//! weights of neuron `i` in the destination layer.

use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use std::error::Error;
use std::fmt;

/// Error type for model construction and training.
#[derive(Debug, Clone)]
pub enum SgmError {
    /// Invalid configuration or empty training corpus, detected at build time.
    InvalidConfig(String),
    /// Loss reached infinity during training.
    Divergence {
        iterations: usize,
        alpha: f64,
        previous_cost: f64,
    },
    /// Loss became NaN during training.
    NumericUnderflow { iterations: usize, alpha: f64 },
    /// A raw sample index fell outside the vocabulary.
    IndexOutOfRange { index: usize, vocabulary_size: usize },
}

impl fmt::Display for SgmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SgmError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            SgmError::Divergence {
                iterations,
                alpha,
                previous_cost,
            } => write!(
                f,
                "failed to converge at iteration {} with alpha {}: cost going from {} to infinity",
                iterations, alpha, previous_cost
            ),
            SgmError::NumericUnderflow { iterations, alpha } => write!(
                f,
                "failed to converge at iteration {} with alpha {}: cost calculation underflow",
                iterations, alpha
            ),
            SgmError::IndexOutOfRange {
                index,
                vocabulary_size,
            } => write!(
                f,
                "index {} out of range for vocabulary of size {}",
                index, vocabulary_size
            ),
        }
    }
}

impl Error for SgmError {}

pub type SgmResult<T> = Result<T, SgmError>;

/// Activation function applied to a matrix.
///
/// Implementations are pure: the argument is never mutated and the returned
/// matrix has identical dimensions.
pub trait Activation {
    /// Apply the activation, returning a new matrix.
    fn apply_matrix(&self, x: &Array2<f64>) -> Array2<f64>;

    /// Name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Rectifier (aka ReLU) activation function: elementwise `max(0, x)`.
#[derive(Debug, Clone, Copy)]
pub struct Rectifier;

impl Activation for Rectifier {
    fn apply_matrix(&self, x: &Array2<f64>) -> Array2<f64> {
        x.mapv(|v| v.max(0.0))
    }

    fn name(&self) -> &'static str {
        "rectifier"
    }
}

/// Softmax activation function: elementwise `exp(x) / D`.
///
/// The denominator `D` is the sum of `exp(value)` over *every* element of the
/// argument matrix. Callers wanting a per-row softmax must invoke this once
/// per row; passing a multi-row matrix normalizes across all rows jointly.
#[derive(Debug, Clone, Copy)]
pub struct Softmax;

impl Activation for Softmax {
    fn apply_matrix(&self, x: &Array2<f64>) -> Array2<f64> {
        let denominator: f64 = x.iter().map(|v| v.exp()).sum();
        x.mapv(|v| v.exp() / denominator)
    }

    fn name(&self) -> &'static str {
        "softmax"
    }
}

/// Index of the largest value in a row, ties resolved to the last occurrence.
pub(crate) fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut index = 0;
    let mut largest = f64::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v >= largest {
            largest = v;
            index = i;
        }
    }
    index
}

/// A two-layer skip-gram network.
///
/// # Architecture
///
/// - `w0` has shape `(hidden, input)`; `b0` has length `hidden`
/// - `w1` has shape `(output, hidden)`; `b1` has length `output`
/// - `output = (window - 1) * vocabulary_size`, one vocabulary-sized segment
///   per context position
///
/// Shapes are fixed at construction and never resized. All parameters are
/// owned exclusively by the network and mutated only by the trainer.
///
/// # Initialization
///
/// Weights are drawn i.i.d. from `U(0, 1)`; biases start at `0.01`.
pub struct SkipGramNet {
    /// Input-to-hidden weights, shape `(hidden, input)`.
    pub w0: Array2<f64>,
    /// Hidden-to-output weights, shape `(output, hidden)`.
    pub w1: Array2<f64>,
    /// Hidden-layer bias row.
    pub b0: Array1<f64>,
    /// Output-layer bias row.
    pub b1: Array1<f64>,
    /// Context span the output row is partitioned by.
    pub window: usize,
}

impl fmt::Debug for SkipGramNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipGramNet")
            .field("input_dim", &self.w0.ncols())
            .field("hidden_dim", &self.w0.nrows())
            .field("output_dim", &self.w1.nrows())
            .field("window", &self.window)
            .finish()
    }
}

impl SkipGramNet {
    /// Create a network with freshly initialized parameters.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if any dimension is zero or `window < 2`.
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        window: usize,
    ) -> SgmResult<Self> {
        if input_dim == 0 || hidden_dim == 0 || output_dim == 0 {
            return Err(SgmError::InvalidConfig(format!(
                "layer dimensions must be non-zero, got ({}, {}, {})",
                input_dim, hidden_dim, output_dim
            )));
        }
        if window < 2 {
            return Err(SgmError::InvalidConfig(format!(
                "window must be at least 2, got {}",
                window
            )));
        }

        let dist = Uniform::new(0.0, 1.0);
        Ok(Self {
            w0: Array2::random((hidden_dim, input_dim), dist),
            w1: Array2::random((output_dim, hidden_dim), dist),
            b0: Array1::from_elem(hidden_dim, 0.01),
            b1: Array1::from_elem(output_dim, 0.01),
            window,
        })
    }

    /// Input dimension (columns of `w0`).
    pub fn input_dim(&self) -> usize {
        self.w0.ncols()
    }

    /// Hidden dimension (rows of `w0`).
    pub fn hidden_dim(&self) -> usize {
        self.w0.nrows()
    }

    /// Output dimension (rows of `w1`).
    pub fn output_dim(&self) -> usize {
        self.w1.nrows()
    }

    /// Hidden-layer activations for a batch: `relu(x · W0ᵀ + b0)`.
    ///
    /// `x` has shape `(batch, input)`, the result `(batch, hidden)`.
    pub fn hidden_batch(&self, x: &Array2<f64>) -> Array2<f64> {
        Rectifier.apply_matrix(&(x.dot(&self.w0.t()) + &self.b0))
    }

    /// Raw output scores for a batch of hidden activations:
    /// `hidden · W1ᵀ + b1`, shape `(batch, output)`.
    pub fn scores_batch(&self, hidden: &Array2<f64>) -> Array2<f64> {
        hidden.dot(&self.w1.t()) + &self.b1
    }

    /// Normalize a scores matrix into per-segment probabilities.
    ///
    /// Each row is partitioned into `window - 1` contiguous segments and
    /// softmax is invoked once per segment, so every segment of every row is
    /// an independent probability distribution over the vocabulary.
    pub fn segment_probs(&self, scores: &Array2<f64>) -> Array2<f64> {
        let segments = self.window - 1;
        let segment_len = scores.ncols() / segments;
        let mut probs = scores.clone();
        for row in 0..probs.nrows() {
            for d in 0..segments {
                let start = d * segment_len;
                let segment = probs
                    .slice(s![row..row + 1, start..start + segment_len])
                    .to_owned();
                let normalized = Softmax.apply_matrix(&segment);
                probs
                    .slice_mut(s![row..row + 1, start..start + segment_len])
                    .assign(&normalized);
            }
        }
        probs
    }

    /// Forward pass for a single hot-encoded input row.
    ///
    /// Returns the concatenated per-segment probability row of length
    /// [`Self::output_dim`].
    pub fn predict(&self, input: &Array1<f64>) -> Array1<f64> {
        let x = input
            .view()
            .insert_axis(Axis(0))
            .to_owned();
        let hidden = self.hidden_batch(&x);
        let scores = self.scores_batch(&hidden);
        let probs = self.segment_probs(&scores);
        probs.row(0).to_owned()
    }
}
