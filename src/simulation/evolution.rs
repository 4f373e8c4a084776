//! Controller provider: a population of brains evolved between generations.
//!
//! After every generation the brains are ranked by fitness. The best are
//! carried over unchanged, the rest of the next generation is bred from the
//! top fraction by crossover and mutation.

use rand::Rng;
use tracing::debug;

use super::brain::Brain;
use super::evaluation::{ControllerProvider, Evaluated, GenerationReport};
use super::params::Params;
use super::rng::{self, SimRng, WeightRng};

/// Population of brains for training.
#[derive(Debug, Clone)]
pub struct Population {
    brains: Vec<Brain>,
    params: Params,
    rng: SimRng,
    weight_rng: WeightRng,
    best: Option<Evaluated<Brain>>,
}

impl Population {
    /// Creates `params.population_size` random brains.
    ///
    /// With a seed in `params` the initial brains and every later generation
    /// are reproducible.
    pub fn new(params: &Params) -> Self {
        let mut rng = rng::rng_from_seed(params.rng_seed);
        let mut weight_rng = rng::derive_weight_rng(&mut rng);
        let brains = (0..params.population_size)
            .map(|_| Brain::new(&params.layer_sizes, params.weight_scale, &mut weight_rng))
            .collect();
        Self::from_brains(brains, params, rng)
    }

    /// Wraps existing brains.
    ///
    /// # Arguments
    ///
    /// * `brains` - Initial population
    /// * `params` - Evolution settings
    /// * `rng` - Source for every breeding draw
    pub fn from_brains(brains: Vec<Brain>, params: &Params, mut rng: SimRng) -> Self {
        let weight_rng = rng::derive_weight_rng(&mut rng);
        Self {
            brains,
            params: params.clone(),
            rng,
            weight_rng,
            best: None,
        }
    }

    /// Current brains, in the order they will be evaluated.
    pub fn brains(&self) -> &[Brain] {
        &self.brains
    }

    /// Number of brains.
    pub fn len(&self) -> usize {
        self.brains.len()
    }

    /// Checks if the population has no brains.
    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    /// Best brain seen so far with its fitness.
    pub fn best(&self) -> Option<&Evaluated<Brain>> {
        self.best.as_ref()
    }

    /// Best fitness seen so far.
    pub fn best_fitness(&self) -> Option<f32> {
        self.best.as_ref().map(|best| best.fitness)
    }

    /// Replaces the population with the offspring of the evaluated brains.
    pub fn evolve(&mut self, mut evaluated: Vec<Evaluated<Brain>>) {
        if evaluated.is_empty() {
            return;
        }

        evaluated.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let champion = &evaluated[0];
        if self
            .best
            .as_ref()
            .is_none_or(|best| champion.fitness > best.fitness)
        {
            debug!(fitness = champion.fitness, "new best brain");
            self.best = Some(champion.clone());
        }

        let target = self.params.population_size;
        let elite_count = self.params.elite_count.min(evaluated.len()).min(target);
        let parent_count = ((evaluated.len() as f32 * self.params.survival_fraction).ceil()
            as usize)
            .clamp(1, evaluated.len());

        let mut next: Vec<Brain> = evaluated[..elite_count]
            .iter()
            .map(|e| e.controller.clone())
            .collect();

        while next.len() < target {
            let parent_1 = &evaluated[self.rng.random_range(0..parent_count)].controller;
            let parent_2 = &evaluated[self.rng.random_range(0..parent_count)].controller;

            let mut child = Brain::crossover(parent_1, parent_2, 0.5, &mut self.weight_rng);
            let mutation_scale = sample_mutation_scale(
                &mut self.rng,
                self.params.mutation_scale_min,
                self.params.mutation_scale_max,
            );
            child.mutate(mutation_scale, &mut self.weight_rng);
            next.push(child);
        }

        debug!(
            elites = elite_count,
            parents = parent_count,
            population = next.len(),
            "bred next generation"
        );
        self.brains = next;
    }
}

impl ControllerProvider for Population {
    type Controller = Brain;

    fn controllers(&mut self, _generation: u32) -> Vec<Brain> {
        self.brains.clone()
    }

    fn report(&mut self, report: GenerationReport<Brain>) {
        self.evolve(report.evaluated);
    }
}

/// Samples a mutation scale log-uniformly from `[min, max)`.
pub fn sample_mutation_scale<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    let log_mutation_scale = rng.random_range(min.ln()..max.ln());
    log_mutation_scale.exp()
}
