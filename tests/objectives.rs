//! Integration tests for the objective functions.

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use histboost::objective::math::{logsumexp, sigmoid};
use histboost::objective::{Gradients, Objective, ObjectiveFn};
use ndarray::{array, Array1, Array2, ArrayView1, ArrayView2};
use proptest::prelude::*;
use rstest::rstest;

use common::{labels, raw_predictions, uniform};

fn gradients_of(
    objective: &Objective,
    y: ArrayView1<'_, f64>,
    raw: ArrayView2<'_, f64>,
) -> Gradients {
    let mut gradients = Gradients::new(y.len(), objective.n_outputs());
    objective.update(&mut gradients, y, raw);
    gradients
}

fn losses(objective: &Objective, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>) -> Vec<f64> {
    let mut out = vec![0.0; y.len()];
    objective.pointwise_loss(y, raw, &mut out);
    out
}

// =============================================================================
// Derivatives
// =============================================================================

/// Newton iterations on a single sample using the objective's own
/// derivatives.
fn newton(objective: &Objective, y: f64, x0: f64) -> f64 {
    let y = array![y];
    let mut x = x0;
    for _ in 0..200 {
        let raw = array![[x]];
        let gradients = gradients_of(objective, y.view(), raw.view());
        let (grad, hess) = gradients.get(0, 0);
        if (grad as f64).abs() < 1e-10 {
            break;
        }
        x -= grad as f64 / hess as f64;
    }
    x
}

#[rstest]
#[case("least_squares", -2.0, 42.0)]
#[case("least_squares", 117.0, 1.05)]
#[case("least_squares", 0.0, 0.0)]
#[case("binary_crossentropy", 0.3, 0.0)]
#[case("binary_crossentropy", -12.0, 1.0)]
#[case("binary_crossentropy", 30.0, 1.0)]
fn newton_reaches_minimum(#[case] name: &str, #[case] x0: f64, #[case] y: f64) {
    let objective = Objective::from_name(name, 1).unwrap();
    let optimum = newton(&objective, y, x0);

    let y = array![y];
    let raw = array![[optimum]];
    assert_abs_diff_eq!(objective.inverse_link(raw.view())[[0, 0]], y[0], epsilon = 1e-6);
    assert_abs_diff_eq!(objective.evaluate(y.view(), raw.view(), true), 0.0, epsilon = 1e-6);
    let (grad, _) = gradients_of(&objective, y.view(), raw.view()).get(0, 0);
    assert_abs_diff_eq!(grad, 0.0, epsilon = 1e-6);
}

#[rstest]
#[case("least_squares", 0, 1)]
#[case("binary_crossentropy", 2, 1)]
#[case("categorical_crossentropy", 3, 3)]
#[case("categorical_crossentropy", 4, 4)]
fn finite_differences(#[case] name: &str, #[case] n_classes: usize, #[case] prediction_dim: usize) {
    let n_samples = 100;
    let objective = Objective::from_name(name, prediction_dim).unwrap();
    let y = if n_classes == 0 {
        uniform(n_samples, -3.0, 3.0, 0)
    } else {
        labels(n_samples, n_classes, 0)
    };
    let raw = raw_predictions(prediction_dim, n_samples, 1);

    let gradients = gradients_of(&objective, y.view(), raw.view());
    let center = losses(&objective, y.view(), raw.view());

    for output in 0..prediction_dim {
        let grads = gradients.output_grads(output);
        let hess = gradients.output_hess(output);

        let shifted = |delta: f64| {
            let mut shifted = raw.clone();
            shifted.row_mut(output).mapv_inplace(|v| v + delta);
            losses(&objective, y.view(), shifted.view())
        };

        let eps = 1e-6;
        let plus = shifted(eps / 2.0);
        let minus = shifted(-eps / 2.0);
        for i in 0..n_samples {
            let numerical = (plus[i] - minus[i]) / eps;
            assert_relative_eq!(numerical, grads[i] as f64, epsilon = 1e-7, max_relative = 1e-5);
        }

        let eps = 1e-4;
        let plus = shifted(eps);
        let minus = shifted(-eps);
        for i in 0..n_samples {
            let numerical = (plus[i] + minus[i] - 2.0 * center[i]) / (eps * eps);
            assert_relative_eq!(numerical, hess[i] as f64, epsilon = 1e-6, max_relative = 1e-5);
        }
    }
}

#[test]
fn categorical_gradients_sum_to_zero_over_classes() {
    let n_samples = 500;
    let objective = Objective::categorical_crossentropy(5);
    let y = labels(n_samples, 5, 3);
    let raw = raw_predictions(5, n_samples, 4);
    let gradients = gradients_of(&objective, y.view(), raw.view());

    for sample in 0..n_samples {
        let total: f32 = (0..5).map(|k| gradients.get(sample, k).0).sum();
        assert_abs_diff_eq!(total, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn extreme_raw_scores_stay_finite() {
    let y = array![0.0, 1.0, 0.0, 1.0];
    let raw = array![[1e300, -1e300, -750.0, 750.0]];
    let objective = Objective::binary_crossentropy();
    let gradients = gradients_of(&objective, y.view(), raw.view());
    assert!(gradients.grads().iter().all(|g| g.is_finite()));
    assert!(gradients.hess().iter().all(|h| h.is_finite()));
    assert!(losses(&objective, y.view(), raw.view())
        .iter()
        .all(|l| l.is_finite()));

    let objective = Objective::categorical_crossentropy(3);
    let y = array![0.0, 2.0];
    let raw = array![[1e5, -1e5], [-1e5, 0.0], [0.0, 1e5]];
    let gradients = gradients_of(&objective, y.view(), raw.view());
    assert!(gradients.grads().iter().all(|g| g.is_finite()));
    assert!(losses(&objective, y.view(), raw.view())
        .iter()
        .all(|l| l.is_finite()));
}

// =============================================================================
// Log-sum-exp
// =============================================================================

/// Pairwise `ln(e^a + e^b)` folded over the values.
fn logsumexp_reference(values: &[f64]) -> f64 {
    values.iter().fold(f64::NEG_INFINITY, |acc, &v| {
        let (hi, lo) = if acc > v { (acc, v) } else { (v, acc) };
        if lo == f64::NEG_INFINITY {
            hi
        } else {
            hi + (lo - hi).exp().ln_1p()
        }
    })
}

#[test]
fn logsumexp_matches_reference() {
    for seed in 0..100 {
        let values = uniform(1000, 0.0, 1000.0, seed).to_vec();
        assert_abs_diff_eq!(
            logsumexp(&values),
            logsumexp_reference(&values),
            epsilon = 1e-7
        );
    }

    let values: Vec<f64> = (0..200).map(f64::from).collect();
    let direct = values.iter().map(|v| v.exp()).sum::<f64>().ln();
    assert_abs_diff_eq!(logsumexp(&values), direct, epsilon = 1e-7);
}

#[test]
fn logsumexp_large_inputs() {
    assert_abs_diff_eq!(
        logsumexp(&[1000.0, 1000.0]),
        1000.0 + 2f64.ln(),
        epsilon = 1e-7
    );
    let values = vec![10_000.0; 1000];
    assert_abs_diff_eq!(logsumexp(&values), 10_000.0 + 1000f64.ln(), epsilon = 1e-7);
}

#[test]
fn logsumexp_degenerate_inputs() {
    assert_eq!(logsumexp(&[]), f64::NEG_INFINITY);
    assert_eq!(logsumexp(&[f64::NEG_INFINITY; 3]), f64::NEG_INFINITY);
}

// =============================================================================
// Baselines
// =============================================================================

#[test]
fn baseline_least_squares() {
    let objective = Objective::least_squares();
    let y = uniform(100, -2.0, 5.0, 0);
    let baseline = objective.baseline_prediction(y.view());
    assert_eq!(baseline.len(), 1);
    assert_relative_eq!(baseline[0], y.mean().unwrap(), max_relative = 1e-12);
}

#[rstest]
#[case(Array1::zeros(100))]
#[case(Array1::ones(100))]
fn baseline_binary_degenerate(#[case] y: Array1<f64>) {
    let objective = Objective::binary_crossentropy();
    let baseline = objective.baseline_prediction(y.view());
    assert!(baseline[0].is_finite());
    assert_abs_diff_eq!(sigmoid(baseline[0]), y[0], epsilon = 1e-6);
}

#[test]
fn baseline_binary_random() {
    let objective = Objective::binary_crossentropy();
    let y = labels(100, 2, 0);
    let p = y.mean().unwrap();
    let baseline = objective.baseline_prediction(y.view());
    assert_relative_eq!(baseline[0], (p / (1.0 - p)).ln(), max_relative = 1e-12);
    assert_abs_diff_eq!(sigmoid(baseline[0]), p, epsilon = 1e-12);
}

#[test]
fn baseline_categorical() {
    let prediction_dim = 4;
    let objective = Objective::categorical_crossentropy(prediction_dim);

    for y in [Array1::zeros(100), Array1::ones(100)] {
        let baseline = objective.baseline_prediction(y.view());
        assert_eq!(baseline.len(), prediction_dim);
        assert!(baseline.iter().all(|b| b.is_finite()));
    }

    // Labels up to prediction_dim inclusive; the extra class is ignored.
    let y = labels(100, prediction_dim + 1, 0);
    let baseline = objective.baseline_prediction(y.view());
    for (k, &b) in baseline.iter().enumerate() {
        let p = y.iter().filter(|&&label| label as usize == k).count() as f64 / 100.0;
        assert_relative_eq!(b, p.ln(), max_relative = 1e-12);
    }
}

// =============================================================================
// Inverse link
// =============================================================================

#[test]
fn inverse_link_shapes() {
    let raw = raw_predictions(3, 50, 9);
    let objective = Objective::categorical_crossentropy(3);
    let probas = objective.inverse_link(raw.view());
    assert_eq!(probas.dim(), (3, 50));
    for column in probas.columns() {
        assert_abs_diff_eq!(column.sum(), 1.0, epsilon = 1e-12);
    }

    let raw = raw_predictions(1, 50, 9);
    let probas = Objective::binary_crossentropy().inverse_link(raw.view());
    assert!(probas.iter().all(|&p| (0.0..=1.0).contains(&p)));
    assert_eq!(Objective::least_squares().inverse_link(raw.view()), raw);
}

#[test]
fn inverse_link_inplace_matches_copy() {
    let objective = Objective::categorical_crossentropy(4);
    let raw = raw_predictions(4, 20, 2);
    let expected = objective.inverse_link(raw.view());
    let mut inplace: Array2<f64> = raw.clone();
    objective.inverse_link_inplace(inplace.view_mut());
    assert_eq!(inplace, expected);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn binary_hessian_bounds(raw in prop::collection::vec(-50.0f64..50.0, 1..64), positive in any::<bool>()) {
        let n = raw.len();
        let y = Array1::from_elem(n, if positive { 1.0 } else { 0.0 });
        let raw = Array2::from_shape_vec((1, n), raw).unwrap();
        let gradients = gradients_of(&Objective::binary_crossentropy(), y.view(), raw.view());
        for (&g, &h) in gradients.grads().iter().zip(gradients.hess()) {
            prop_assert!((-1.0..=1.0).contains(&g));
            prop_assert!((0.0..=0.25).contains(&h));
        }
    }

    #[test]
    fn loss_is_non_negative(raw in prop::collection::vec(-50.0f64..50.0, 3..=3), label in 0usize..3) {
        let objective = Objective::categorical_crossentropy(3);
        let y = array![label as f64];
        let raw = Array2::from_shape_vec((3, 1), raw).unwrap();
        prop_assert!(objective.evaluate(y.view(), raw.view(), false) >= 0.0);
    }
}
