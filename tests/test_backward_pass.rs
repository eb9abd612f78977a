//! Tests for backward propagation and the gradient-descent update

use approx::assert_relative_eq;
use ndarray::array;
use rust_feedforward_nn::{column, LayerParams, Network, NetworkError, SimpleRng};

fn logistic_network(sizes: &[usize], seed: u64, epsilon: f64) -> Network {
    let mut network =
        Network::with_rng("backward", sizes[0], "se", epsilon, SimpleRng::new(seed)).unwrap();
    for &n_output in &sizes[1..] {
        network
            .add_layer("logistic", n_output, &LayerParams::default())
            .unwrap();
    }
    network
}

#[test]
fn test_two_layer_deltas_match_hand_computation() {
    let mut network = logistic_network(&[1, 1, 1], 1, 0.5);
    network
        .layer_mut(0)
        .unwrap()
        .set_parameters(array![[0.0]], array![[0.0]])
        .unwrap();
    network
        .layer_mut(1)
        .unwrap()
        .set_parameters(array![[2.0]], array![[-1.0]])
        .unwrap();

    // Hidden output 0.5, so the output pre-activation is 0 and y = 0.5.
    let trace = network
        .propagate_backward(&array![[7.0]], &array![[1.0]])
        .unwrap();

    let output_delta = 0.25 * (0.5 - 1.0);
    let hidden_delta = 0.25 * 2.0 * output_delta;
    assert_relative_eq!(trace.deltas()[1][[0, 0]], output_delta);
    assert_relative_eq!(trace.deltas()[0][[0, 0]], hidden_delta);
    assert_relative_eq!(trace.output()[[0, 0]], 0.5);
}

#[test]
fn test_update_applies_outer_product_step() {
    let mut network = logistic_network(&[1, 1, 1], 1, 0.5);
    network
        .layer_mut(0)
        .unwrap()
        .set_parameters(array![[0.0]], array![[0.0]])
        .unwrap();
    network
        .layer_mut(1)
        .unwrap()
        .set_parameters(array![[2.0]], array![[-1.0]])
        .unwrap();

    let trace = network
        .propagate_backward(&array![[7.0]], &array![[1.0]])
        .unwrap();
    network.update(&trace).unwrap();

    let output_delta = -0.125;
    let hidden_delta = -0.0625;
    let layers = network.layers();
    assert_relative_eq!(layers[1].weights()[[0, 0]], 2.0 - 0.5 * output_delta * 0.5);
    assert_relative_eq!(layers[1].biases()[[0, 0]], -1.0 - 0.5 * output_delta);
    assert_relative_eq!(layers[0].weights()[[0, 0]], 0.0 - 0.5 * hidden_delta * 7.0);
    assert_relative_eq!(layers[0].biases()[[0, 0]], 0.0 - 0.5 * hidden_delta);
}

#[test]
fn test_repeated_steps_decrease_loss_monotonically() {
    let mut network = logistic_network(&[3, 4, 2], 99, 0.1);
    let x = column(&[0.5, -0.25, 1.0]);
    let t = column(&[1.0, 0.0]);

    let mut previous = network.loss(&x, &t).unwrap();
    for _ in 0..20 {
        let trace = network.propagate_backward(&x, &t).unwrap();
        network.update(&trace).unwrap();
        let current = network.loss(&x, &t).unwrap();
        assert!(
            current < previous,
            "loss went from {} to {}",
            previous,
            current
        );
        previous = current;
    }
}

#[test]
fn test_tanh_and_softmax_stack_decreases_loss() {
    let mut network =
        Network::with_rng("mixed", 2, "se", 0.05, SimpleRng::new(5)).unwrap();
    network
        .add_layer("tanh", 3, &LayerParams::tanh(1.7159, 2.0 / 3.0))
        .unwrap();
    network
        .add_layer("softmax", 3, &LayerParams::default())
        .unwrap();

    let x = column(&[0.3, 0.9]);
    let t = column(&[0.0, 0.0, 1.0]);
    let mut previous = network.loss(&x, &t).unwrap();
    for _ in 0..10 {
        network.train_sample(&x, &t).unwrap();
        let current = network.loss(&x, &t).unwrap();
        assert!(current < previous);
        previous = current;
    }
}

#[test]
fn test_backward_rejects_wrong_target_width() {
    let network = logistic_network(&[2, 3], 1, 0.1);
    assert!(matches!(
        network.propagate_backward(&column(&[1.0, 0.0]), &column(&[1.0])),
        Err(NetworkError::InvalidShape { .. })
    ));
}

#[test]
fn test_update_with_trace_from_other_network_is_rejected() {
    let small = logistic_network(&[2, 3, 1], 1, 0.1);
    let mut large = logistic_network(&[2, 4, 1], 1, 0.1);

    let trace = small
        .propagate_backward(&column(&[1.0, 0.0]), &column(&[1.0]))
        .unwrap();
    assert!(matches!(
        large.update(&trace),
        Err(NetworkError::InvalidShape { .. })
    ));
}

#[test]
fn test_rejected_update_leaves_every_layer_unchanged() {
    let source = logistic_network(&[2, 3, 1], 1, 0.1);
    let mut target = logistic_network(&[2, 3, 2], 2, 0.1);

    // Layer 0 widths agree, so only a full pre-check keeps it untouched.
    let trace = source
        .propagate_backward(&column(&[1.0, 0.5]), &column(&[1.0]))
        .unwrap();
    let before = target.to_record();

    assert!(matches!(
        target.update(&trace),
        Err(NetworkError::InvalidShape { .. })
    ));
    assert_eq!(target.to_record(), before);
}

#[test]
fn test_update_before_backward_on_grown_network() {
    let mut network = logistic_network(&[2, 2], 1, 0.1);
    let trace = network
        .propagate_backward(&column(&[1.0, 0.0]), &column(&[1.0, 0.0]))
        .unwrap();
    network
        .add_layer("logistic", 1, &LayerParams::default())
        .unwrap();
    assert!(matches!(
        network.update(&trace),
        Err(NetworkError::UnsetState(_))
    ));
}
