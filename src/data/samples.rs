//! Training samples and their hot-encoded expansion.
//!
//! A [`Sample`] holds raw numeric index vectors: one input index (the
//! fragment's center token) and `window - 1` output indices (the remaining
//! tokens). A [`HotEncodedSample`] expands each raw index into a one-hot
//! vector sized to the vocabulary; the expansion is computed once, on first
//! access, and cached.

use crate::core::{SgmError, SgmResult};
use crate::data::fragments::Fragment;
use crate::data::vocab::Vocabulary;
use ndarray::Array1;
use std::cell::OnceCell;

/// A training example holding raw numeric vectors.
#[derive(Debug, Clone)]
pub struct Sample {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl Sample {
    #[must_use]
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> Self {
        Self { inputs, outputs }
    }

    /// The raw inputs with an implicit bias constant of `1.0` prepended.
    #[must_use]
    pub fn inputs(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.inputs.len() + 1);
        result.push(1.0);
        result.extend_from_slice(&self.inputs);
        result
    }

    /// The raw outputs, unmodified.
    #[must_use]
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }
}

/// A hot-encoded [`Sample`].
///
/// Each raw value `v`, interpreted as a vocabulary index, expands to a zero
/// vector of length `vocabulary_size` with a `1.0` at position `v`;
/// expansions for multiple raw entries are concatenated in order. Indices
/// are validated against the vocabulary at construction, so expansion itself
/// cannot fail.
#[derive(Debug, Clone)]
pub struct HotEncodedSample {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
    vocabulary_size: usize,
    expanded_inputs: OnceCell<Array1<f64>>,
    expanded_outputs: OnceCell<Array1<f64>>,
}

impl HotEncodedSample {
    /// Wrap raw index vectors for hot-encoded access.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if any raw value falls outside
    /// `[0, vocabulary_size)`.
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>, vocabulary_size: usize) -> SgmResult<Self> {
        for &v in inputs.iter().chain(outputs.iter()) {
            let index = v as usize;
            if index >= vocabulary_size {
                return Err(SgmError::IndexOutOfRange {
                    index,
                    vocabulary_size,
                });
            }
        }
        Ok(Self {
            inputs,
            outputs,
            vocabulary_size,
            expanded_inputs: OnceCell::new(),
            expanded_outputs: OnceCell::new(),
        })
    }

    /// The hot-encoded input row, computed on first access and cached.
    pub fn inputs(&self) -> &Array1<f64> {
        self.expanded_inputs
            .get_or_init(|| self.expand(&self.inputs))
    }

    /// The hot-encoded output row, computed on first access and cached.
    pub fn outputs(&self) -> &Array1<f64> {
        self.expanded_outputs
            .get_or_init(|| self.expand(&self.outputs))
    }

    /// The raw input index of the center token.
    #[must_use]
    pub fn input_index(&self) -> usize {
        self.inputs[0] as usize
    }

    /// The raw output indices of the context tokens.
    #[must_use]
    pub fn output_indices(&self) -> Vec<usize> {
        self.outputs.iter().map(|&v| v as usize).collect()
    }

    fn expand(&self, raw: &[f64]) -> Array1<f64> {
        let mut expanded = Array1::zeros(raw.len() * self.vocabulary_size);
        for (i, &v) in raw.iter().enumerate() {
            expanded[i * self.vocabulary_size + v as usize] = 1.0;
        }
        expanded
    }
}

/// Convert fragments into hot-encoded training samples.
///
/// The center token of each fragment (index `window / 2`) becomes the input;
/// the remaining `window - 1` tokens become the outputs, in fragment order.
///
/// # Errors
///
/// `IndexOutOfRange` if a fragment token is missing from the vocabulary.
pub fn build_training_set(
    vocabulary: &Vocabulary,
    fragments: &[Fragment],
    window: usize,
) -> SgmResult<Vec<HotEncodedSample>> {
    let mut samples = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let center = fragment.len() / 2;
        let mut outputs = Vec::with_capacity(window - 1);
        for (k, token) in fragment.iter().enumerate() {
            if k != center {
                outputs.push(lookup(vocabulary, token)? as f64);
            }
        }
        let inputs = vec![lookup(vocabulary, &fragment[center])? as f64];
        samples.push(HotEncodedSample::new(inputs, outputs, vocabulary.len())?);
    }
    Ok(samples)
}

fn lookup(vocabulary: &Vocabulary, token: &str) -> SgmResult<usize> {
    vocabulary
        .index_of(token)
        .ok_or_else(|| SgmError::IndexOutOfRange {
            index: usize::MAX,
            vocabulary_size: vocabulary.len(),
        })
}
