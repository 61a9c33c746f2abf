pub mod bounds;
pub mod candidate;
pub mod operators;

use crate::config::GaConfig;
use log::{debug, warn};
use rand::seq::index::sample;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;

/// The callbacks a search engine needs from a problem: how to make, vary and
/// score a genome. The engine owns the population and the random source and
/// lends the latter to every call.
pub trait GeneticOperators {
    type Genome: Clone + fmt::Debug;
    type Error: std::error::Error;

    /// Draws a random genome for the initial population.
    fn create<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Genome;

    /// Perturbs `genome` in place.
    fn mutate<R: Rng + ?Sized>(&self, genome: &mut Self::Genome, rng: &mut R);

    /// Combines two parents into two children, leaving the parents untouched.
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_a: &Self::Genome,
        parent_b: &Self::Genome,
        rng: &mut R,
    ) -> (Self::Genome, Self::Genome);

    /// Scores a genome. Errors abort the run.
    fn fitness(&self, genome: &Self::Genome) -> Result<f64, Self::Error>;
}

/// An individual born during the evolution process
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<G> {
    pub genome: G,
    /// `None` until the individual has been evaluated
    pub fitness: Option<f64>,
}

impl<G> Individual<G> {
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }
}

/// Which way fitness is optimised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Minimize,
    Maximize,
}

impl Objective {
    /// `Ordering::Greater` when `a` is the better fitness. Unevaluated
    /// individuals lose to evaluated ones.
    pub fn compare(self, a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Objective::Maximize => ord,
                    Objective::Minimize => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Returned by `evaluate_population`: how many individuals were actually scored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PopulationEvaluationReport {
    pub evaluated: usize,
}

/// A generational search over genomes of type `Genome`.
///
/// `run` drives the default schedule: initialise, evaluate, then evolve one
/// generation at a time. Implementors only supply the steps.
pub trait SearchEngine {
    type Genome;
    type Error;

    /// Replaces the population with freshly created individuals.
    fn initialize(&mut self);

    /// Scores every individual that has no fitness yet.
    fn evaluate_population(&mut self) -> Result<PopulationEvaluationReport, Self::Error>;

    /// Picks one parent. Called afresh for every parent bred; `None` when
    /// there is nobody to pick from.
    fn select(&mut self) -> Option<Individual<Self::Genome>>;

    /// Breeds, replaces and re-evaluates the population once.
    fn evolve_generation(&mut self) -> Result<(), Self::Error>;

    /// Best evaluated individual of the current population.
    fn best(&self) -> Option<&Individual<Self::Genome>>;

    /// Number of generations `run` evolves.
    fn generations(&self) -> usize;

    /// Runs a complete search and returns its best individual.
    fn run(&mut self) -> Result<Option<Individual<Self::Genome>>, Self::Error>
    where
        Self::Genome: Clone,
    {
        self.initialize();
        self.evaluate_population()?;
        for _ in 0..self.generations() {
            self.evolve_generation()?;
        }
        Ok(self.best().cloned())
    }
}

/// Generational genetic algorithm with tournament selection and optional elitism.
///
/// The engine knows nothing about the problem; everything problem-specific
/// comes from the `GeneticOperators` it is given.
pub struct EvolutionEngine<'a, O: GeneticOperators, R: Rng> {
    /// Population size, generation count, rates, elitism and objective
    config: &'a GaConfig,
    operators: &'a O,
    /// Owned population, replaced wholesale every generation
    population: Vec<Individual<O::Genome>>,
    rng: R,
    generation: usize,
}

impl<'a, O: GeneticOperators, R: Rng> EvolutionEngine<'a, O, R> {
    /// Creates a new EvolutionEngine instance
    ///
    /// # Arguments
    /// * `config` - Reference to a `GaConfig` holding the evolution parameters
    /// * `operators` - The problem's genetic operators
    /// * `rng` - Random source for this run; seed it for a reproducible run
    pub fn new(config: &'a GaConfig, operators: &'a O, rng: R) -> Self {
        Self {
            config,
            operators,
            population: Vec::with_capacity(config.population_size),
            rng,
            generation: 0,
        }
    }

    pub fn objective(&self) -> Objective {
        if self.config.minimize {
            Objective::Minimize
        } else {
            Objective::Maximize
        }
    }

    pub fn population(&self) -> &[Individual<O::Genome>] {
        &self.population
    }

    /// Generations evolved since the last `initialize`.
    pub fn generation(&self) -> usize {
        self.generation
    }
}

impl<O: GeneticOperators, R: Rng> SearchEngine for EvolutionEngine<'_, O, R> {
    type Genome = O::Genome;
    type Error = O::Error;

    fn initialize(&mut self) {
        let operators = self.operators;
        let rng = &mut self.rng;
        self.population = (0..self.config.population_size)
            .map(|_| Individual::new(operators.create(rng)))
            .collect();
        self.generation = 0;
    }

    fn evaluate_population(&mut self) -> Result<PopulationEvaluationReport, O::Error> {
        let mut evaluated = 0;
        for individual in self.population.iter_mut().filter(|i| i.fitness.is_none()) {
            individual.fitness = Some(self.operators.fitness(&individual.genome)?);
            evaluated += 1;
        }
        Ok(PopulationEvaluationReport { evaluated })
    }

    /// One tournament: distinct contestants drawn without replacement, at most
    /// the whole population. The fittest contestant wins.
    fn select(&mut self) -> Option<Individual<O::Genome>> {
        if self.population.is_empty() {
            warn!("selection requested on an empty population");
            return None;
        }
        let objective = self.objective();
        let contestants = self
            .config
            .effective_tournament_size()
            .clamp(1, self.population.len());

        sample(&mut self.rng, self.population.len(), contestants)
            .into_iter()
            .map(|i| &self.population[i])
            .max_by(|a, b| objective.compare(a.fitness, b.fitness))
            .cloned()
    }

    fn evolve_generation(&mut self) -> Result<(), O::Error> {
        let population_size = self.config.population_size;
        let mut next_generation = Vec::with_capacity(population_size);

        // Preserve the champion unchanged
        if self.config.elitism {
            if let Some(best) = self.best() {
                next_generation.push(best.clone());
            }
        }

        while next_generation.len() < population_size {
            let (Some(parent1), Some(parent2)) = (self.select(), self.select()) else {
                break;
            };

            let (mut child1, mut child2) =
                if self.rng.random::<f64>() < self.config.crossover_rate {
                    self.operators
                        .crossover(&parent1.genome, &parent2.genome, &mut self.rng)
                } else {
                    (parent1.genome.clone(), parent2.genome.clone())
                };

            for child in [&mut child1, &mut child2] {
                if self.rng.random::<f64>() < self.config.mutation_rate {
                    self.operators.mutate(child, &mut self.rng);
                }
            }

            next_generation.push(Individual::new(child1));
            if next_generation.len() < population_size {
                next_generation.push(Individual::new(child2));
            }
        }

        self.population = next_generation;
        self.generation += 1;
        let report = self.evaluate_population()?;

        if let Some(best) = self.best() {
            debug!(
                "Gen {}: Best Fitness={:.6} | Evaluated={}",
                self.generation,
                best.fitness.unwrap_or(f64::NAN),
                report.evaluated
            );
        }
        Ok(())
    }

    fn best(&self) -> Option<&Individual<O::Genome>> {
        let objective = self.objective();
        self.population
            .iter()
            .filter(|i| i.fitness.is_some())
            .max_by(|a, b| objective.compare(a.fitness, b.fitness))
    }

    fn generations(&self) -> usize {
        self.config.num_generations
    }
}
