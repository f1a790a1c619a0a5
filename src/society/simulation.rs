//! Main simulation loop

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::society::population::Society;
use crate::society::snapshot::{RoundSnapshot, SimulationOutput};
use crate::society::systems;

/// The round orchestrator
///
/// Owns the society, the one seeded generator every stochastic operation
/// draws from, and the growing snapshot history. Strictly sequential:
/// each step sees the result of the prior step, and pre-step averages
/// come from the last statistics refresh.
pub struct Simulation {
    config: SimulationConfig,
    society: Society,
    rng: ChaCha8Rng,
    rounds: Vec<RoundSnapshot>,
}

impl Simulation {
    /// Validate the configuration and initialize the society.
    ///
    /// The snapshot history starts with a round-0 capture of the freshly
    /// initialized society.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let config = config.validated()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);
        let members = systems::build_members(&config, &mut rng);
        let society = Society::new(members, &config);
        let rounds = vec![RoundSnapshot::capture(&society)];

        Ok(Self {
            config,
            society,
            rng,
            rounds,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn society(&self) -> &Society {
        &self.society
    }

    pub fn rounds(&self) -> &[RoundSnapshot] {
        &self.rounds
    }

    /// Advance one round through the fixed step sequence
    pub fn run_round(&mut self) {
        self.society.round += 1;

        // 1. Elite voting on one or two policy levers
        systems::run_policy_votes(&mut self.society, &mut self.rng);

        // 2. Trigger and resolve exactly one event
        systems::run_round_event(&mut self.society, &mut self.rng);

        // 3. Attribution-bias power adjustment
        systems::apply_attribution_bias(&mut self.society);

        // 4. Tax collection and redistribution
        systems::collect_and_redistribute_tax(&mut self.society);

        // 5. Wealth growth, sanction losses, power recompute, decay
        systems::update_wealth_and_power(&mut self.society, self.config.base_growth_rate);

        // 6. Sanction triggers from ideology deviation
        systems::apply_ideology_sanctions(
            &mut self.society,
            self.config.sanction_trigger_threshold,
        );

        // 7. Statistics refresh
        self.society.update_statistics();

        // Slow-cadence mechanisms. Their statistics surface at the next
        // refresh; the snapshot below still carries their events and
        // reclassifications.
        if self.society.round % self.config.periodic_interval == 0 {
            self.run_periodic_operations();
        }

        self.rounds.push(RoundSnapshot::capture(&self.society));
    }

    fn run_periodic_operations(&mut self) {
        tracing::debug!(round = self.society.round, "running periodic mechanisms");

        systems::run_imitation(&mut self.society, &mut self.rng, self.config.learning_rate);
        systems::run_ideology_conversion(&mut self.society, &mut self.rng);
        self.society.update_core_decision_circle();
        systems::run_class_mobility(&mut self.society);
    }

    /// Run the configured number of rounds and return the output
    pub fn run(mut self) -> SimulationOutput {
        tracing::info!(
            population = self.society.population(),
            rounds = self.config.max_rounds,
            seed = self.config.random_seed,
            "starting simulation"
        );

        for _ in 0..self.config.max_rounds {
            self.run_round();
        }

        tracing::info!(
            equality = self.society.stats.equality,
            events = self.society.events.len(),
            "simulation complete"
        );

        SimulationOutput {
            config: self.config,
            rounds: self.rounds,
        }
    }
}

/// Validate a configuration and run a full simulation
pub fn simulate(config: SimulationConfig) -> Result<SimulationOutput> {
    Ok(Simulation::new(config)?.run())
}
