//! The iteration loop: generate, reweight, update, check convergence.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::Serialize;

use crate::config::InversionConfig;
use crate::convergence::ConvergenceMonitor;
use crate::error::{ConfigError, GenerationStalled};
use crate::generator::{BinTally, ParticleGenerator, PopulationParams, StellarPhysics};
use crate::luminosity_function::{ModelLuminosityFunction, ObservedLuminosityFunction};
use crate::reweight::scale_to_observed;
use crate::sfr::BinnedSfr;
use crate::update::{BinUpdate, update_rate};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    Converged,
    IterationLimitReached,
    /// A [`StopHandle`] was triggered
    Stopped,
}

impl Termination {
    /// Process exit status for a command-line run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Termination::Converged => 0,
            Termination::IterationLimitReached | Termination::Stopped => 1,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match self {
            Termination::Converged => "converged",
            Termination::IterationLimitReached => "iteration limit reached",
            Termination::Stopped => "stopped",
        };
        write!(f, "{}", str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Iterating,
    Finished(Termination),
}

/// Decide whether the loop ends after `iteration` (1-based).
///
/// Convergence only counts from `min_iterations` on; the limit applies
/// otherwise.
pub fn termination_for(
    iteration: usize,
    min_iterations: usize,
    max_iterations: usize,
    converged: bool,
) -> Option<Termination> {
    if iteration >= min_iterations && converged {
        Some(Termination::Converged)
    } else if iteration >= max_iterations {
        Some(Termination::IterationLimitReached)
    } else {
        None
    }
}

/// Cooperative stop signal, honoured between iterations.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything that survives from one iteration to the next.
#[derive(Debug, Clone)]
pub struct InversionState {
    current: BinnedSfr,
    updated: Option<BinnedSfr>,
    monitor: ConvergenceMonitor,
    iteration: usize,
    min_iterations: usize,
    max_iterations: usize,
    convergence_threshold: f64,
}

impl InversionState {
    /// Model the next iteration generates from.
    pub fn current_model(&self) -> &BinnedSfr {
        &self.current
    }

    /// Output of the latest iteration, if any has run.
    pub fn updated_model(&self) -> Option<&BinnedSfr> {
        self.updated.as_ref()
    }

    pub fn chi_square_history(&self) -> &[f64] {
        self.monitor.history()
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration
    }

    pub fn monitor(&self) -> &ConvergenceMonitor {
        &self.monitor
    }

    pub fn min_iterations(&self) -> usize {
        self.min_iterations
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold
    }
}

/// Diagnostics of one finished iteration.
#[derive(Debug, Clone)]
pub struct IterationReport {
    pub iteration: usize,
    pub chi_square: f64,
    /// Rate model produced by this iteration
    pub model: BinnedSfr,
    /// Simulated luminosity function before the correction
    pub model_lf: ModelLuminosityFunction,
    pub outcomes: Vec<BinUpdate>,
    pub stalled: Vec<GenerationStalled>,
    pub tallies: Vec<BinTally>,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InversionOutcome {
    pub termination: Termination,
    pub iterations: usize,
    pub model: BinnedSfr,
    pub chi_square_history: Vec<f64>,
    pub model_luminosity_function: Option<ModelLuminosityFunction>,
}

pub struct InversionController {
    observed: ObservedLuminosityFunction,
    generator: ParticleGenerator,
    state: InversionState,
    phase: Phase,
    rng: ChaChaRng,
    stop: StopHandle,
    last_model_lf: Option<ModelLuminosityFunction>,
}

impl InversionController {
    /// Validate the inputs and prepare a run starting from `initial`.
    pub fn new(
        config: &InversionConfig,
        observed: ObservedLuminosityFunction,
        initial: BinnedSfr,
        physics: StellarPhysics,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let total = initial.total_stars().value;
        if total <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "initial formation rate",
                value: total,
                expected: "> 0 stars formed",
            });
        }

        let state = InversionState {
            current: initial,
            updated: None,
            monitor: ConvergenceMonitor::new(config.fit_strategy, config.skip_iterations),
            iteration: 0,
            min_iterations: config.min_iterations,
            max_iterations: config.max_iterations,
            convergence_threshold: config.convergence_threshold,
        };

        Ok(Self {
            observed,
            generator: ParticleGenerator::new(physics, PopulationParams::from(config)),
            state,
            phase: Phase::Init,
            rng: ChaChaRng::seed_from_u64(config.seed),
            stop: StopHandle::default(),
            last_model_lf: None,
        })
    }

    pub fn state(&self) -> &InversionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn observed(&self) -> &ObservedLuminosityFunction {
        &self.observed
    }

    /// Handle that stops the run after the iteration in progress.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run one iteration. Returns `None` once the run has finished.
    pub fn step(&mut self) -> Option<IterationReport> {
        if let Phase::Finished(_) = self.phase {
            return None;
        }
        if self.stop.is_stopped() {
            info!("stop requested after {} iterations", self.state.iteration);
            self.phase = Phase::Finished(Termination::Stopped);
            return None;
        }
        self.phase = Phase::Iterating;
        let iteration = self.state.iteration + 1;

        let mut population =
            self.generator
                .generate(&self.state.current, &self.observed, &mut self.rng);
        let reweighting = scale_to_observed(
            &mut population.arena,
            &population.white_dwarfs,
            &self.observed,
        );
        let update = update_rate(
            &population.arena,
            &population.progenitors,
            &population.tallies,
            &self.state.current,
        );

        let chi_square = reweighting.chi_square;
        self.state.monitor.push(chi_square);
        self.state.iteration = iteration;
        let converged = self
            .state
            .monitor
            .has_converged(self.state.convergence_threshold);

        info!(
            "iteration {}: chi-square {:.4}, {} unconstrained, {} stalled bins",
            iteration,
            chi_square,
            update.unconstrained_bins(),
            population.stalled.len()
        );

        let termination = termination_for(
            iteration,
            self.state.min_iterations,
            self.state.max_iterations,
            converged,
        );
        match termination {
            Some(termination) => {
                info!("inversion {} after {} iterations", termination, iteration);
                self.phase = Phase::Finished(termination);
            }
            None => self.state.current = update.model.clone(),
        }
        self.state.updated = Some(update.model.clone());

        let model_lf = reweighting.model_luminosity_function().clone();
        self.last_model_lf = Some(model_lf.clone());

        Some(IterationReport {
            iteration,
            chi_square,
            model: update.model,
            model_lf,
            outcomes: update.outcomes,
            stalled: population.stalled,
            tallies: population.tallies,
        })
    }

    pub fn run(&mut self) -> InversionOutcome {
        self.run_with_observer(|_| {})
    }

    /// Run to completion, handing every iteration's report to `observer`.
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> InversionOutcome
    where
        F: FnMut(&IterationReport),
    {
        while let Some(report) = self.step() {
            observer(&report);
        }
        self.outcome()
    }

    fn outcome(&self) -> InversionOutcome {
        let termination = match self.phase {
            Phase::Finished(termination) => termination,
            Phase::Init | Phase::Iterating => Termination::Stopped,
        };
        InversionOutcome {
            termination,
            iterations: self.state.iteration,
            model: self
                .state
                .updated
                .clone()
                .unwrap_or_else(|| self.state.current.clone()),
            chi_square_history: self.state.chi_square_history().to_vec(),
            model_luminosity_function: self.last_model_lf.clone(),
        }
    }
}
