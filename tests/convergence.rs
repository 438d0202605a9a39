use bp_ann::feed_forward::Network;
use bp_ann::layers::{InputLayer, Layer};
use bp_ann::task::{one_hot, Task};
use bp_ann::trainer::{accuracy, Logging, Trainer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Points in `[-1, 1]^2`, class 0 when the first coordinate is negative.
struct Sign {
    rng: StdRng,
}

impl Task for Sign {
    fn sample(&mut self, input: &mut [f64]) {
        for x in input.iter_mut() {
            *x = self.rng.gen_range(-1.0..=1.0);
        }
    }

    fn label(&self, input: &[f64], target: &mut [f64]) -> bp_ann::Result<usize> {
        one_hot(if input[0] < 0.0 { 0 } else { 1 }, target)
    }
}

fn train(seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let network = Network::builder(InputLayer::new(2).unwrap())
        .dense(&mut rng, 4)
        .unwrap()
        .output(&mut rng, 2)
        .unwrap();
    Trainer::new(network)
        .learning_rate(0.05)
        .iterations(10_000)
        .logging(Logging::Silent)
        .train(&mut Sign { rng })
        .unwrap()
}

#[test]
fn separable_task_converges() {
    for seed in 0..3 {
        let network = train(seed);
        let mut held_out = Sign {
            rng: StdRng::seed_from_u64(1000 + seed),
        };
        let rate = accuracy(&network, &mut held_out, 1000).unwrap();
        assert!(rate >= 95.0, "seed {}: accuracy {}%", seed, rate);
    }
}

#[test]
fn trained_layers_keep_their_shape() {
    let network = train(7);
    for pair in network.layers().windows(2) {
        assert_eq!(pair[0].output_len(), pair[1].input_len());
    }
    let output = network.layers().last().unwrap();
    assert!(output.is_output());
    let params = output.parameters().unwrap();
    assert_eq!((params.input_len(), params.output_len()), (4, 2));
    assert!(params.weight(4, 0).is_err());
    assert!(params.weight(0, 2).is_err());
}
