//! Neural network controller for birds.
//!
//! A small multi-layer perceptron mapping the three-value observation to one
//! output in (-1, 1), with the mutation and crossover operators used by
//! [`super::evolution::Population`].

use ndarray::Array1;
use ndarray_rand::rand::Rng;
use serde::{Deserialize, Serialize};

use super::evaluation::{Controller, Observation};

pub mod mlp;

pub use mlp::Mlp;

/// Multi-layer perceptron with tanh activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a new brain with random weights.
    ///
    /// # Arguments
    ///
    /// * `layer_sizes` - Input size, hidden sizes and output size
    /// * `scale` - Range of the initial weights
    /// * `rng` - Source for the weights
    pub fn new<R: Rng + ?Sized>(layer_sizes: &[usize], scale: f32, rng: &mut R) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale, rng))
            .collect();

        Self { layers }
    }

    /// Runs a forward pass through all layers.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Creates a child brain by uniform crossover of two parents with the
    /// same architecture. Falls back to a copy of `parent1` otherwise.
    pub fn crossover<R: Rng + ?Sized>(
        parent1: &Brain,
        parent2: &Brain,
        bias: f32,
        rng: &mut R,
    ) -> Self {
        if parent1.architecture() != parent2.architecture() {
            return parent1.clone();
        }

        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Mlp::crossover(layer1, layer2, bias, rng))
            .collect();

        Self { layers }
    }

    /// Mutates all layers in the brain.
    pub fn mutate<R: Rng + ?Sized>(&mut self, mutation_scale: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.mutate(mutation_scale, rng);
        }
    }

    /// Layer sizes from input to output.
    pub fn architecture(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.layers.first().map(Mlp::input_size).into_iter().collect();
        sizes.extend(self.layers.iter().map(Mlp::output_size));
        sizes
    }

    /// Number of trainable parameters.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Mlp::parameter_count).sum()
    }
}

impl Controller for Brain {
    fn activate(&self, observation: &Observation) -> f32 {
        let inputs = Array1::from_vec(observation.to_array().to_vec());
        self.think(&inputs).first().copied().unwrap_or(0.0)
    }
}
