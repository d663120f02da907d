use crate::Thermodynamics::ChemEquilibrium::EquationSystems::{
    EquilibriumError, Scenario, ScenarioParameters,
};
use crate::Thermodynamics::ChemEquilibrium::deposition::{DepositionReport, solve_and_report};
use crate::Thermodynamics::DBhandlers::HVPEdata::SpeciesRegistry;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const DEFAULT_MAX_ITERATIONS: usize = 10000;

/// One calculation: scenario, point of the sweep, physical parameters and solver settings.
/// Solver settings left out take the defaults of the scenario.
/// ```json
/// {
///   "scenario": "AlGaN",
///   "sweep_input": 0.5,
///   "parameters": { "h2_portion": 0.0 },
///   "tolerance": 1e-8
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HVPETask {
    pub scenario: Scenario,
    /// T for the metal sources, x^g for AlGaN
    pub sweep_input: Option<f64>,
    pub parameters: ScenarioParameters,
    pub initial_guess: Option<Vec<f64>>,
    pub tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
}

impl Default for HVPETask {
    fn default() -> Self {
        Self {
            scenario: Scenario::AlClH,
            sweep_input: None,
            parameters: ScenarioParameters::default(),
            initial_guess: None,
            tolerance: None,
            max_iterations: None,
        }
    }
}

impl HVPETask {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            ..Self::default()
        }
    }

    pub fn sweep_input(&self) -> f64 {
        self.sweep_input.unwrap_or(match self.scenario {
            Scenario::AlClH | Scenario::GaClH => 900.0,
            Scenario::AlGaN => 0.5,
        })
    }

    pub fn initial_guess(&self) -> Vec<f64> {
        self.initial_guess
            .clone()
            .unwrap_or_else(|| self.scenario.default_initial_guess())
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
            .unwrap_or_else(|| self.scenario.default_tolerance())
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    pub fn solve(&self, registry: &SpeciesRegistry) -> Result<DepositionReport, EquilibriumError> {
        solve_and_report(
            registry,
            self.scenario,
            &self.parameters,
            self.sweep_input(),
            &self.initial_guess(),
            self.tolerance(),
            self.max_iterations(),
        )
    }
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_task(&self) -> Result<HVPETask, EquilibriumError> {
        load_task_from_file(&self.file_name)
    }
    pub fn load_parameters(&self) -> Result<ScenarioParameters, EquilibriumError> {
        load_scenario_parameters(&self.file_name)
    }
    pub fn save_task(&self, task: &HVPETask) -> Result<(), EquilibriumError> {
        save_task_to_file(task, &self.file_name)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(file_name: &str) -> Result<T, EquilibriumError> {
    let path = Path::new(file_name);
    if !path.exists() {
        error!("File '{}' does not exist", file_name);
    }
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| {
        error!(
            "Error parsing '{}' at line {}, column {}: {}",
            file_name,
            e.line(),
            e.column(),
            e
        );
        EquilibriumError::Config(e)
    })
}

/// Parses a JSON document with a whole task (see `HVPETask`). Fields not present in the file take
/// default values.
pub fn load_task_from_file(file_name: &str) -> Result<HVPETask, EquilibriumError> {
    let task: HVPETask = read_json(file_name)?;
    if let Some(guess) = &task.initial_guess {
        if guess.len() != task.scenario.dim() {
            return Err(EquilibriumError::InvalidInitialGuess {
                scenario: task.scenario,
                expected: task.scenario.dim(),
                found: guess.len(),
            });
        }
    }
    if task.scenario != Scenario::AlGaN && task.parameters.p_hcl <= 0.0 {
        warn!("no HCl in the feed of the {} source", task.scenario);
    }
    info!("Successfully parsed task for {} from file '{}'", task.scenario, file_name);
    Ok(task)
}

/// Parses a JSON document with the physical parameters only. Missing fields take defaults
pub fn load_scenario_parameters(file_name: &str) -> Result<ScenarioParameters, EquilibriumError> {
    let params: ScenarioParameters = read_json(file_name)?;
    info!("Successfully parsed scenario parameters from file '{}'", file_name);
    Ok(params)
}

pub fn save_task_to_file(task: &HVPETask, file_name: &str) -> Result<(), EquilibriumError> {
    let writer = BufWriter::new(File::create(file_name)?);
    serde_json::to_writer_pretty(writer, task)?;
    info!("task written to '{}'", file_name);
    Ok(())
}
