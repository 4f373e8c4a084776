//! Fully connected layer with tanh activation.

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases uniform in `[-scale, scale)`.
    pub fn new_random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new(-scale, scale),
                rng,
            ),
            biases: Array1::random_using(output_size, Uniform::new(-scale, scale), rng),
        }
    }

    /// Number of inputs.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs a forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Adds uniform noise in `[-mutation_scale, mutation_scale)` to every
    /// parameter.
    pub fn mutate<R: Rng + ?Sized>(&mut self, mutation_scale: f32, rng: &mut R) {
        self.weights += &Array2::random_using(
            self.weights.dim(),
            Uniform::new(-mutation_scale, mutation_scale),
            rng,
        );
        self.biases += &Array1::random_using(
            self.biases.len(),
            Uniform::new(-mutation_scale, mutation_scale),
            rng,
        );
    }

    /// Creates a layer taking each parameter from one parent at random.
    ///
    /// `bias` is the probability of picking `parent1`.
    pub fn crossover<R: Rng + ?Sized>(
        parent1: &Mlp,
        parent2: &Mlp,
        bias: f32,
        rng: &mut R,
    ) -> Self {
        let mut child = parent1.clone();

        let weight_picks =
            Array2::random_using(child.weights.dim(), Uniform::new(0.0f32, 1.0), rng);
        Zip::from(&mut child.weights)
            .and(&parent2.weights)
            .and(&weight_picks)
            .for_each(|w, &other, &pick| {
                if pick >= bias {
                    *w = other;
                }
            });

        let bias_picks =
            Array1::random_using(child.biases.len(), Uniform::new(0.0f32, 1.0), rng);
        Zip::from(&mut child.biases)
            .and(&parent2.biases)
            .and(&bias_picks)
            .for_each(|b, &other, &pick| {
                if pick >= bias {
                    *b = other;
                }
            });

        child
    }

    /// Number of trainable parameters.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}
