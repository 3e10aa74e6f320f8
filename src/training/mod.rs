//! Mini-batch gradient descent with momentum and Nesterov acceleration.
//!
//! One iteration:
//!
//! 1. Assemble the next batch by cycling through the sample array in
//!    fixed-size contiguous windows, wrapping via modulo.
//! 2. Forward pass vectorized across the batch.
//! 3. Loss = batch-averaged cross-entropy + `0.5 * lambda * (‖W0‖² + ‖W1‖²)`.
//! 4. Check termination: infinite loss is a divergence error, NaN an
//!    underflow error; training succeeds once `iterations > 1` and the loss
//!    drops below the threshold or the iteration cap is exceeded.
//! 5. Backward pass and parameter update in the configured mode.

use crate::core::{argmax, SgmError, SgmResult, SkipGramNet};
use crate::data::HotEncodedSample;
use crate::{TrainConfig, UpdateMode};
use ndarray::{Array, Array1, Array2, Axis, Dimension};
use serde::Serialize;

/// Outcome of a training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    /// Final loss at termination.
    pub loss: f64,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Velocity terms accumulated across iterations, one per parameter.
struct Velocities {
    w0: Array2<f64>,
    w1: Array2<f64>,
    b0: Array1<f64>,
    b1: Array1<f64>,
}

impl Velocities {
    fn zeros(net: &SkipGramNet) -> Self {
        Self {
            w0: Array2::zeros(net.w0.dim()),
            w1: Array2::zeros(net.w1.dim()),
            b0: Array1::zeros(net.b0.len()),
            b1: Array1::zeros(net.b1.len()),
        }
    }
}

/// Fill the batch matrices with the `j`-th contiguous sample window.
///
/// Sample `k` of batch `j` is `samples[(j * batch + k) % samples.len()]`, so
/// batch selection cycles deterministically with no shuffling.
fn fill_batch(
    samples: &[HotEncodedSample],
    j: usize,
    x: &mut Array2<f64>,
    y: &mut Array2<f64>,
) {
    let batch = x.nrows();
    for i in 0..batch {
        let sample = &samples[(j * batch + i) % samples.len()];
        x.row_mut(i).assign(sample.inputs());
        y.row_mut(i).assign(sample.outputs());
    }
}

/// Batch-averaged cross-entropy of the probability assigned to each sample's
/// true class (the argmax of its hot-encoded output row).
fn data_loss(probs: &Array2<f64>, y: &Array2<f64>) -> f64 {
    let batch = probs.nrows() as f64;
    let mut loss = 0.0;
    for (row, y_row) in y.rows().into_iter().enumerate() {
        let true_class = argmax(y_row);
        loss += -probs[[row, true_class]].ln();
    }
    loss / batch
}

/// `0.5 * lambda * (sum of squared entries over both weight matrices)`.
fn regularization_loss(net: &SkipGramNet, lambda: f64) -> f64 {
    let reg: f64 = net.w0.iter().map(|v| v * v).sum::<f64>()
        + net.w1.iter().map(|v| v * v).sum::<f64>();
    0.5 * lambda * reg
}

/// Apply one parameter update in the configured mode.
fn apply_update<D: Dimension>(
    param: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    velocity: &mut Array<f64, D>,
    config: &TrainConfig,
) {
    match config.update {
        UpdateMode::Plain => {
            *param -= &(config.alpha * grad);
        }
        UpdateMode::Momentum => {
            *velocity = config.mu * &*velocity - config.alpha * grad;
            *param += &*velocity;
        }
        UpdateMode::Nesterov => {
            let previous = velocity.clone();
            *velocity = config.mu * &*velocity - config.alpha * grad;
            *param += &(-config.mu * &previous + (1.0 + config.mu) * &*velocity);
        }
    }
}

/// Learn the network's weights from the training samples.
///
/// Mutates `net` in place until a termination condition fires and returns
/// the final loss and iteration count.
///
/// # Errors
///
/// - `InvalidConfig` if `samples` is empty or `batch_size` is zero.
/// - `Divergence` if the loss reaches infinity.
/// - `NumericUnderflow` if the loss becomes NaN.
pub fn learn_weights(
    net: &mut SkipGramNet,
    samples: &[HotEncodedSample],
    config: &TrainConfig,
) -> SgmResult<TrainReport> {
    if samples.is_empty() {
        return Err(SgmError::InvalidConfig(
            "cannot train on an empty sample set".to_string(),
        ));
    }
    if config.batch_size == 0 {
        return Err(SgmError::InvalidConfig(
            "batch size must be non-zero".to_string(),
        ));
    }

    let batch = config.batch_size;
    let input_dim = samples[0].inputs().len();
    let output_dim = samples[0].outputs().len();

    let mut x = Array2::zeros((batch, input_dim));
    let mut y = Array2::zeros((batch, output_dim));
    let mut velocities = Velocities::zeros(net);

    let mut iterations: usize = 0;
    let mut cost = f64::MAX;
    let mut j: usize = 0;

    loop {
        fill_batch(samples, j, &mut x, &mut y);
        j += 1;

        // Forward pass over the batch.
        let hidden = net.hidden_batch(&x);
        let scores = net.scores_batch(&hidden);
        let probs = net.segment_probs(&scores);

        let new_cost = data_loss(&probs, &y) + regularization_loss(net, config.lambda);

        if new_cost == f64::INFINITY {
            return Err(SgmError::Divergence {
                iterations,
                alpha: config.alpha,
                previous_cost: cost,
            });
        } else if iterations > 1
            && (new_cost < config.threshold || iterations > config.max_iterations)
        {
            cost = new_cost;
            break;
        } else if new_cost.is_nan() {
            return Err(SgmError::NumericUnderflow {
                iterations,
                alpha: config.alpha,
            });
        }

        cost = new_cost;

        // Backward pass: softmax + cross-entropy gradient at the output.
        let dscores = (&probs - &y) / batch as f64;

        // Second layer.
        let dw1 = dscores.t().dot(&hidden) + config.lambda * &net.w1;
        let db1 = dscores.sum_axis(Axis(0));

        // Propagate through W1, gate by the ReLU hidden activations.
        let mut dhidden = dscores.dot(&net.w1);
        dhidden.zip_mut_with(&hidden, |d, &h| {
            if h <= 0.0 {
                *d = 0.0;
            }
        });

        // First layer.
        let dw0 = dhidden.t().dot(&x) + config.lambda * &net.w0;
        let db0 = dhidden.sum_axis(Axis(0));

        apply_update(&mut net.w0, &dw0, &mut velocities.w0, config);
        apply_update(&mut net.w1, &dw1, &mut velocities.w1, config);
        apply_update(&mut net.b0, &db0, &mut velocities.b0, config);
        apply_update(&mut net.b1, &db1, &mut velocities.b1, config);

        iterations += 1;
    }

    Ok(TrainReport {
        loss: cost,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{build_training_set, fragments, Vocabulary};
    use ndarray::array;

    fn tiny_training_set() -> (SkipGramNet, Vec<HotEncodedSample>) {
        let text = "we love neural networks\n".repeat(10);
        let frags = fragments(&text, 3);
        let vocab = Vocabulary::from_fragments(&frags);
        let samples = build_training_set(&vocab, &frags, 3).unwrap();
        let input_dim = samples[0].inputs().len();
        let output_dim = samples[0].outputs().len();
        let net = SkipGramNet::new(input_dim, 8, output_dim, 3).unwrap();
        (net, samples)
    }

    #[test]
    fn test_fill_batch_wraps_modulo() {
        let (_, samples) = tiny_training_set();
        let n = samples.len();
        let input_dim = samples[0].inputs().len();
        let output_dim = samples[0].outputs().len();
        let mut x = Array2::zeros((3, input_dim));
        let mut y = Array2::zeros((3, output_dim));

        // A batch window starting past the end wraps around to the front.
        let j = n; // j * 3 % n cycles
        fill_batch(&samples, j, &mut x, &mut y);
        assert_eq!(x.row(0), samples[(j * 3) % n].inputs().view());
    }

    #[test]
    fn test_plain_update() {
        let config = TrainConfig {
            alpha: 0.1,
            update: UpdateMode::Plain,
            ..TrainConfig::default()
        };
        let mut param = array![1.0, 2.0];
        let grad = array![1.0, -1.0];
        let mut velocity = array![0.0, 0.0];
        apply_update(&mut param, &grad, &mut velocity, &config);
        assert_eq!(param, array![0.9, 2.1]);
        assert_eq!(velocity, array![0.0, 0.0]);
    }

    #[test]
    fn test_momentum_update() {
        let config = TrainConfig {
            alpha: 0.1,
            mu: 0.5,
            update: UpdateMode::Momentum,
            ..TrainConfig::default()
        };
        let mut param = array![1.0];
        let grad = array![1.0];
        let mut velocity = array![0.2];
        apply_update(&mut param, &grad, &mut velocity, &config);
        // v = 0.5*0.2 - 0.1*1.0 = 0.0; param += 0.0
        assert!((velocity[0] - 0.0).abs() < 1e-12);
        assert!((param[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nesterov_update() {
        let config = TrainConfig {
            alpha: 0.1,
            mu: 0.5,
            update: UpdateMode::Nesterov,
            ..TrainConfig::default()
        };
        let mut param = array![1.0];
        let grad = array![1.0];
        let mut velocity = array![0.2];
        apply_update(&mut param, &grad, &mut velocity, &config);
        // v_prev = 0.2; v = 0.5*0.2 - 0.1 = 0.0
        // param += -0.5*0.2 + 1.5*0.0 = -0.1
        assert!((velocity[0] - 0.0).abs() < 1e-12);
        assert!((param[0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_training_reduces_loss() {
        let (mut net, samples) = tiny_training_set();
        let config = TrainConfig {
            alpha: 0.05,
            lambda: 1e-4,
            max_iterations: 50,
            batch_size: samples.len(),
            update: UpdateMode::Plain,
            ..TrainConfig::default()
        };

        // Loss before training, on the same full batch the trainer uses.
        let mut x = Array2::zeros((samples.len(), samples[0].inputs().len()));
        let mut y = Array2::zeros((samples.len(), samples[0].outputs().len()));
        fill_batch(&samples, 0, &mut x, &mut y);
        let hidden = net.hidden_batch(&x);
        let probs = net.segment_probs(&net.scores_batch(&hidden));
        let initial = data_loss(&probs, &y) + regularization_loss(&net, config.lambda);

        let report = learn_weights(&mut net, &samples, &config).unwrap();
        assert!(
            report.loss < initial,
            "loss should drop: {} -> {}",
            initial,
            report.loss
        );
    }

    #[test]
    fn test_iteration_cap_terminates() {
        let (mut net, samples) = tiny_training_set();
        let config = TrainConfig {
            alpha: 0.01,
            lambda: 1e-4,
            threshold: 0.0,
            max_iterations: 10,
            batch_size: 4,
            update: UpdateMode::Momentum,
            ..TrainConfig::default()
        };
        let report = learn_weights(&mut net, &samples, &config).unwrap();
        // Success requires iterations > max_iterations with iterations > 1.
        assert_eq!(report.iterations, 11);
    }

    #[test]
    fn test_oversized_alpha_fails() {
        let (mut net, samples) = tiny_training_set();
        let config = TrainConfig {
            alpha: 1e9,
            max_iterations: 100,
            batch_size: samples.len(),
            update: UpdateMode::Plain,
            ..TrainConfig::default()
        };
        // Exploding weights drive the loss to infinity or NaN.
        let result = learn_weights(&mut net, &samples, &config);
        assert!(matches!(
            result,
            Err(SgmError::Divergence { .. }) | Err(SgmError::NumericUnderflow { .. })
        ));
    }

    #[test]
    fn test_empty_samples_rejected() {
        let (mut net, _) = tiny_training_set();
        let config = TrainConfig {
            batch_size: 4,
            ..TrainConfig::default()
        };
        assert!(matches!(
            learn_weights(&mut net, &[], &config),
            Err(SgmError::InvalidConfig(_))
        ));
    }
}
