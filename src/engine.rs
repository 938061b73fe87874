//! The engine: the call surface used by the game-rules layer.
//!
//! `QuantumBoard` owns the register, the history stack and the RNG. Every
//! call runs to completion before returning; there is no background work.
//!
//! ## Example
//!
//! ```
//! use quantum_ludo::{EngineConfig, QuantumBoard};
//!
//! let mut board = QuantumBoard::new(EngineConfig::default()).unwrap();
//! board.spawn(&[0]).unwrap();
//! board.split_move(&[0], &[2, 3]).unwrap();
//!
//! let positions = board.measure().unwrap();
//! assert!(positions == [2] || positions == [3]);
//!
//! // The register now holds exactly the collapsed pawn; spawning it again
//! // changes nothing.
//! assert_eq!(board.register().active(), positions);
//! board.spawn(&positions).unwrap();
//! assert_eq!(board.measure().unwrap(), positions);
//! ```

use tracing::{debug, debug_span, info};

use crate::core::{
    Color, EngineConfig, EngineResult, EngineRng, EngineRngState, MeasureError, Occupancy,
    OperatorError, OperatorResult, SimulationResult,
};
use crate::measurement::{self, select_bases, Measurement, MeasurementTrigger};
use crate::register::{History, Operands, Operator, Register};
use crate::simulator::{self, run_chain, SampleRun, DEFAULT_CHAIN};

/// Quantum game-state engine for one game.
#[derive(Clone, Debug)]
pub struct QuantumBoard {
    config: EngineConfig,
    register: Register,
    history: History,
    rng: EngineRng,
}

impl QuantumBoard {
    /// Create an engine with an empty register.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            register: Register::new(config.layout.register_len()),
            history: History::new(),
            rng: EngineRng::new(config.seed),
            config,
        })
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The register and its pending program.
    #[must_use]
    pub fn register(&self) -> &Register {
        &self.register
    }

    /// Number of saved history points.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// RNG state, for reproducing a game with [`QuantumBoard::with_rng_state`].
    #[must_use]
    pub fn rng_state(&self) -> EngineRngState {
        self.rng.state()
    }

    /// Continue from a saved RNG state instead of the configured seed.
    #[must_use]
    pub fn with_rng_state(mut self, state: &EngineRngState) -> Self {
        self.rng = EngineRng::from_state(state);
        self
    }

    fn len(&self) -> usize {
        self.register.len()
    }

    // === Operators ===

    /// Place a pawn on each target square.
    ///
    /// Targets that are already certainly occupied are left alone, so
    /// re-seeding with the squares a measurement returned is harmless. A
    /// target still in superposition is rejected and nothing is applied.
    pub fn spawn(&mut self, targets: &[usize]) -> OperatorResult<()> {
        let op = Operator::spawn(targets, self.len())?;
        let known = self.register.known_occupancy();

        let mut fresh = Operands::new();
        for index in op.operands() {
            match known[index] {
                Some(false) => fresh.push(index),
                Some(true) => debug!(index, "spawn on occupied square skipped"),
                None => return Err(OperatorError::SpawnOnUnresolved { index }),
            }
        }
        self.register.apply(Operator::Spawn { targets: fresh })
    }

    /// Exchange occupancy between two squares (single-die move).
    pub fn switch(&mut self, from: &[usize], to: &[usize]) -> OperatorResult<()> {
        let op = Operator::switch(from, to, self.len())?;
        self.register.apply(op)
    }

    /// Split a pawn evenly over two squares (two different dice).
    pub fn split_move(&mut self, from: &[usize], to: &[usize]) -> OperatorResult<()> {
        let op = Operator::split(from, to, self.len())?;
        self.register.apply(op)
    }

    /// Split a pawn over two squares, reinforcing `merge_in` where the same
    /// pawn already sits in superposition.
    pub fn merge(&mut self, from: &[usize], to: &[usize], merge_in: usize) -> OperatorResult<()> {
        let op = Operator::merge(from, to, merge_in, self.len())?;
        self.register.apply(op)
    }

    /// Entangle a capturer with a captive and every other square holding the
    /// captive's pawn. The capturer is not moved.
    pub fn capture(&mut self, capturer: &[usize], captive: &[usize], entangled: &[usize]) -> OperatorResult<()> {
        let op = Operator::capture(capturer, captive, entangled, self.len())?;
        self.register.apply(op)
    }

    // === Measurement ===

    /// Choose measurement bases for the next measurement.
    ///
    /// `occupied` pairs each occupied square with its owning color. Without a
    /// trigger every square is measured in the default basis.
    pub fn set_measurement_basis(&mut self, trigger: Option<MeasurementTrigger>, occupied: &[(usize, Color)]) {
        let bases = select_bases(trigger, occupied);
        debug!(?trigger, squares = bases.len(), "measurement basis set");
        self.register.set_rotations(bases);
    }

    /// Noiseless distribution over the active set, ignoring noise filtering.
    pub fn exact_distribution(&self) -> SimulationResult<Vec<(Vec<usize>, f64)>> {
        simulator::exact_distribution(&self.register, self.config.max_qubits)
    }

    /// Measure and collapse; returns the occupied indices.
    pub fn measure(&mut self) -> EngineResult<Vec<usize>> {
        Ok(self.measure_detailed()?.positions)
    }

    /// Measure and collapse with a probability-weighted draw.
    ///
    /// The register is reset and re-seeded with spawns at the collapsed
    /// indices. History is kept.
    pub fn measure_detailed(&mut self) -> EngineResult<Measurement> {
        let _span = debug_span!("measure", active = self.register.active().len()).entered();
        let mut rng = self.rng.fork();
        let run = self.sample(&mut rng)?;

        let positions = measurement::draw(&run.table, &mut rng)
            .map(|o| o.occupied.clone())
            .ok_or(MeasureError::NoPlausibleOutcome {
                outcomes: 0,
                noise_floor: self.config.noise_floor.to_string(),
            })?;

        self.collapse(positions, run)
    }

    /// Measure and collapse onto the most frequent outcome instead of a
    /// weighted draw.
    pub fn measure_most_likely(&mut self) -> EngineResult<Measurement> {
        let _span = debug_span!("measure_most_likely").entered();
        let mut rng = self.rng.fork();
        let run = self.sample(&mut rng)?;

        let positions = run
            .table
            .most_likely()
            .map(|o| o.occupied.clone())
            .ok_or(MeasureError::NoPlausibleOutcome {
                outcomes: 0,
                noise_floor: self.config.noise_floor.to_string(),
            })?;

        self.collapse(positions, run)
    }

    /// Run the strategy chain and filter noise.
    fn sample(&self, rng: &mut EngineRng) -> Result<SampleRun, MeasureError> {
        let mut run = run_chain(&DEFAULT_CHAIN, &self.register, &self.config, rng)?;
        let sampled = run.table.len();
        run.table = run.table.filter(self.config.noise_floor);
        if run.table.is_empty() {
            return Err(MeasureError::NoPlausibleOutcome {
                outcomes: sampled,
                noise_floor: self.config.noise_floor.to_string(),
            });
        }
        Ok(run)
    }

    fn collapse(&mut self, positions: Vec<usize>, run: SampleRun) -> EngineResult<Measurement> {
        info!(
            ?positions,
            fidelity = ?run.fidelity,
            qubits = run.qubits_simulated,
            outcomes = run.table.len(),
            "collapsed"
        );

        self.register.reset();
        self.register.apply(Operator::Spawn {
            targets: positions.iter().copied().collect(),
        })?;

        Ok(Measurement {
            positions,
            table: run.table,
            qubits_simulated: run.qubits_simulated,
            fidelity: run.fidelity,
            dropped_operators: run.dropped_operators,
        })
    }

    // === History ===

    /// Save the current program together with the caller's occupancy.
    ///
    /// Skipped when `occupancy` equals the last saved one. Returns whether a
    /// point was pushed.
    pub fn save(&mut self, occupancy: Occupancy) -> bool {
        self.history.save(self.register.program().clone(), occupancy)
    }

    /// Roll back one committed move.
    ///
    /// Pops two saved points and restores the older. With nothing saved the
    /// register is reset and `None` is returned.
    pub fn undo(&mut self) -> Option<Occupancy> {
        match self.history.undo() {
            Some(entry) => {
                self.register.restore(entry.program);
                Some(entry.occupancy)
            }
            None => {
                debug!("undo on empty history, resetting");
                self.register.reset();
                None
            }
        }
    }

    /// Clear the register and the history.
    pub fn reset(&mut self) {
        self.register.reset();
        self.history.clear();
    }

    /// Text listing of the pending circuit.
    #[must_use]
    pub fn draw(&self) -> String {
        self.register.draw()
    }
}

impl Default for QuantumBoard {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            register: Register::new(config.layout.register_len()),
            history: History::new(),
            rng: EngineRng::new(config.seed),
            config,
        }
    }
}
