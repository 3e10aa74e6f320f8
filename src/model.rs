//! Builder entry point and the trained model.
//!
//! [`Builder`] turns raw text plus hyperparameters into a trained
//! [`SkipGramModel`]: fragments → vocabulary → hot-encoded training set →
//! network initialization → weight learning. The build fails fast, before
//! any weight allocation, if the text yields no fragments or no vocabulary.

use crate::core::{argmax, SgmError, SgmResult, SkipGramNet};
use crate::data::{build_training_set, fragments, HotEncodedSample, Vocabulary};
use crate::training::{learn_weights, TrainReport};
use crate::{TrainConfig, UpdateMode};
use ndarray::{s, Array1, Array2};

/// Samples replayed by [`SkipGramModel::evaluate`] at most.
const EVALUATION_CAP: usize = 2000;

/// A trained skip-gram model: network, vocabulary, and training samples.
pub struct SkipGramModel {
    net: SkipGramNet,
    vocabulary: Vocabulary,
    samples: Vec<HotEncodedSample>,
    report: TrainReport,
}

impl SkipGramModel {
    /// Start configuring a new model.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The trained weight matrices `(W0, W1)`.
    #[must_use]
    pub fn weights(&self) -> (&Array2<f64>, &Array2<f64>) {
        (&self.net.w0, &self.net.w1)
    }

    /// The learned vocabulary, in first-seen order.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The underlying network.
    #[must_use]
    pub fn network(&self) -> &SkipGramNet {
        &self.net
    }

    /// The hot-encoded training samples the model was fitted on.
    #[must_use]
    pub fn samples(&self) -> &[HotEncodedSample] {
        &self.samples
    }

    /// Loss and iteration count at the end of training.
    #[must_use]
    pub fn report(&self) -> &TrainReport {
        &self.report
    }

    /// Training-set accuracy.
    ///
    /// Replays the forward pass over up to 2000 training samples. For each
    /// sample, the predicted argmax indices (one per context segment) are
    /// matched against the true context indices as multisets: the sample
    /// counts as correct only if every expected index pairs with a distinct
    /// predicted index, regardless of segment order.
    #[must_use]
    pub fn evaluate(&self) -> f64 {
        let vocabulary_size = self.vocabulary.len();
        let segments = self.net.window - 1;
        let mut correct = 0u32;
        let mut wrong = 0u32;

        for sample in self.samples.iter().take(EVALUATION_CAP) {
            let probs = self.net.predict(sample.inputs());
            let mut predicted: Vec<usize> = (0..segments)
                .map(|d| {
                    let start = d * vocabulary_size;
                    argmax(probs.slice(s![start..start + vocabulary_size]))
                })
                .collect();

            let mut matched = true;
            for expected in sample.output_indices() {
                if let Some(pos) = predicted.iter().position(|&p| p == expected) {
                    predicted.remove(pos);
                } else {
                    matched = false;
                }
            }

            if matched {
                correct += 1;
            } else {
                wrong += 1;
            }
        }

        f64::from(correct) / f64::from(correct + wrong)
    }

    /// The learned embedding of a token: the corresponding column of `W0`.
    #[must_use]
    pub fn word_vector(&self, token: &str) -> Option<Array1<f64>> {
        let index = self.vocabulary.index_of(token)?;
        Some(self.net.w0.column(index).to_owned())
    }

    /// Cosine similarity between two tokens' word vectors.
    ///
    /// Returns `None` if either token is unknown.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let va = self.word_vector(a)?;
        let vb = self.word_vector(b)?;
        let dot = va.dot(&vb);
        let norms = va.dot(&va).sqrt() * vb.dot(&vb).sqrt();
        if norms == 0.0 {
            return Some(0.0);
        }
        Some(dot / norms)
    }
}

/// Builder-style configuration for a [`SkipGramModel`].
#[derive(Debug, Clone)]
pub struct Builder {
    text: String,
    window: usize,
    vector_size: usize,
    config: TrainConfig,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            text: String::new(),
            window: 0,
            vector_size: 0,
            config: TrainConfig::default(),
        }
    }
}

impl Builder {
    /// The source text to learn from.
    #[must_use]
    pub fn from_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Context window size (must be at least 2).
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Embedding / hidden-layer dimension.
    #[must_use]
    pub fn dimension(mut self, vector_size: usize) -> Self {
        self.vector_size = vector_size;
        self
    }

    /// Mini-batch size (0 = whole training set).
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Learning rate.
    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Momentum coefficient.
    #[must_use]
    pub fn mu(mut self, mu: f64) -> Self {
        self.config.mu = mu;
        self
    }

    /// L2 regularization coefficient.
    #[must_use]
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.config.lambda = lambda;
        self
    }

    /// Convergence threshold on the loss.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Iteration cap (0 = `samples * 100_000`).
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Parameter update strategy.
    #[must_use]
    pub fn update(mut self, update: UpdateMode) -> Self {
        self.config.update = update;
        self
    }

    /// Build the training set, initialize the network, and train it.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the window or dimension is invalid, or the text
    ///   yields no fragments or no vocabulary.
    /// - Any training error from [`learn_weights`].
    pub fn build(self) -> SgmResult<SkipGramModel> {
        if self.window < 2 {
            return Err(SgmError::InvalidConfig(format!(
                "window must be at least 2, got {}",
                self.window
            )));
        }
        if self.vector_size == 0 {
            return Err(SgmError::InvalidConfig(
                "dimension must be non-zero".to_string(),
            ));
        }

        let fragments = fragments(&self.text, self.window);
        if fragments.is_empty() {
            return Err(SgmError::InvalidConfig(format!(
                "could not read fragments from text of {} bytes",
                self.text.len()
            )));
        }

        let vocabulary = Vocabulary::from_fragments(&fragments);
        if vocabulary.is_empty() {
            return Err(SgmError::InvalidConfig(
                "could not read vocabulary".to_string(),
            ));
        }

        let samples = build_training_set(&vocabulary, &fragments, self.window)?;

        let mut config = self.config;
        if config.max_iterations == 0 {
            config.max_iterations = samples.len() * 100_000;
        }
        if config.batch_size == 0 {
            config.batch_size = samples.len();
        }

        // Dimensions come from the first hot-encoded sample.
        let input_dim = samples[0].inputs().len();
        let output_dim = samples[0].outputs().len();

        let mut net = SkipGramNet::new(input_dim, self.vector_size, output_dim, self.window)?;
        let report = learn_weights(&mut net, &samples, &config)?;

        Ok(SkipGramModel {
            net,
            vocabulary,
            samples,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_empty_text() {
        let result = SkipGramModel::builder()
            .from_text("")
            .window(3)
            .dimension(5)
            .max_iterations(5)
            .build();
        assert!(matches!(result, Err(SgmError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_rejects_short_lines() {
        // Every line shorter than the window: zero fragments.
        let result = SkipGramModel::builder()
            .from_text("one two\nthree four")
            .window(3)
            .dimension(5)
            .max_iterations(5)
            .build();
        assert!(matches!(result, Err(SgmError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_rejects_small_window() {
        let result = SkipGramModel::builder()
            .from_text("a b c d")
            .window(1)
            .dimension(5)
            .build();
        assert!(matches!(result, Err(SgmError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_exposes_weights_and_vocabulary() {
        let model = SkipGramModel::builder()
            .from_text("the quick brown fox")
            .window(3)
            .dimension(4)
            .alpha(0.01)
            .lambda(1e-4)
            .max_iterations(10)
            .build()
            .unwrap();

        let (w0, w1) = model.weights();
        let vocab_size = model.vocabulary().len();
        assert_eq!(vocab_size, 4);
        assert_eq!(w0.shape(), &[4, vocab_size]);
        assert_eq!(w1.shape(), &[2 * vocab_size, 4]);
    }

    #[test]
    fn test_word_vector_dimensions() {
        let model = SkipGramModel::builder()
            .from_text("the quick brown fox")
            .window(3)
            .dimension(6)
            .alpha(0.01)
            .lambda(1e-4)
            .max_iterations(10)
            .build()
            .unwrap();

        let v = model.word_vector("quick").unwrap();
        assert_eq!(v.len(), 6);
        assert!(model.word_vector("zebra").is_none());
    }

    #[test]
    fn test_similarity_is_reflexive() {
        let model = SkipGramModel::builder()
            .from_text("the quick brown fox")
            .window(3)
            .dimension(6)
            .alpha(0.01)
            .lambda(1e-4)
            .max_iterations(10)
            .build()
            .unwrap();

        let s = model.similarity("fox", "fox").unwrap();
        assert!((s - 1.0).abs() < 1e-9);
        assert!(model.similarity("fox", "zebra").is_none());
    }
}
