//! # Equilibrium systems of the HVPE process
//!
//! ## Aim
//! For a physical scenario builds the vector of residual equations F(x) and its analytic Jacobian J(x).
//! Unknowns are the partial pressures at the reacting surface (plus, for the AlGaN deposition zone,
//! the fraction x of AlN in the growing solid). Equations are:
//! - mass action laws of the surface reactions with temperature dependent equilibrium constants
//! - balances of chemical elements between the bulk gas and the surface, built of flux terms
//!   mf(x, k) = D_k(T)*(Pg_k - Pe_k) weighted with the number of atoms of the element in species k
//!
//! ## Scenarios
//! - `Scenario::AlClH`: Al source in HCl, unknowns AlCl, AlCl2, AlCl3, HCl, H2, sweep input is T
//! - `Scenario::GaClH`: Ga source in HCl, unknowns GaCl, GaCl2, GaCl3, HCl, H2, sweep input is T
//! - `Scenario::AlGaN`: AlGaN deposition from AlCl3 + GaCl + NH3, unknowns AlCl3, GaCl, NH3, HCl, H2, x,
//!   sweep input is the Al fraction x^g of chlorides in the feed
//!
//! ## Usage
//! ```rust, ignore
//! let registry = hvpe_registry();
//! let solver = build_equilibrium_system(registry, Scenario::AlClH, ScenarioParameters::default(),
//!     vec![50.0, 50.0, 50.0, 50.0, 500.0], 1e-5, 10000)?;
//! let solution = solver(900.0)?;
//! ```
//! Temperature, equilibrium constants, diffusion coefficients and bulk pressures are computed once
//! per sweep point and stay constant during the solution, every residual is a pure function of x.
use crate::Numerical::GaussJordan::SquareMatrix;
use crate::Numerical::NR::{NRError, NRSolution, NRStatus, solve};
use crate::Thermodynamics::DBhandlers::HVPEdata::{SpeciesRegistry, ThermoError};
use log::{info, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EquilibriumError {
    #[error("Thermodynamic data error: {0}")]
    Thermo(#[from] ThermoError),
    #[error("Solver error: {0}")]
    Solver(#[from] NRError),
    #[error("Scenario {scenario} has {expected} unknowns, initial guess has {found} values")]
    InvalidInitialGuess {
        scenario: Scenario,
        expected: usize,
        found: usize,
    },
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

////////////////////////////////////////////SCENARIOS////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    AlClH,
    GaClH,
    AlGaN,
}

impl Scenario {
    pub fn all() -> [Scenario; 3] {
        [Scenario::AlClH, Scenario::GaClH, Scenario::AlGaN]
    }

    /// names of the unknowns in the order of the state vector
    pub fn unknowns(&self) -> Vec<String> {
        let names: &[&str] = match self {
            Scenario::AlClH => &["AlCl", "AlCl2", "AlCl3", "HCl", "H2"],
            Scenario::GaClH => &["GaCl", "GaCl2", "GaCl3", "HCl", "H2"],
            Scenario::AlGaN => &["AlCl3", "GaCl", "NH3", "HCl", "H2", "x"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }

    pub fn dim(&self) -> usize {
        self.unknowns().len()
    }

    /// what the sweep input means for this scenario
    pub fn sweep_input_name(&self) -> &'static str {
        match self {
            Scenario::AlClH | Scenario::GaClH => "T, K",
            Scenario::AlGaN => "x^g",
        }
    }

    /// Ga-Cl-H starts on the GaCl-rich branch, where all five pressures are positive
    pub fn default_initial_guess(&self) -> Vec<f64> {
        match self {
            Scenario::AlClH => vec![50., 50., 50., 50., 500.],
            Scenario::GaClH => vec![10000., 500., 1., 10., 1500.],
            Scenario::AlGaN => vec![50., 50., 1300., 0., 100., 0.5],
        }
    }

    pub fn default_tolerance(&self) -> f64 {
        match self {
            Scenario::AlClH | Scenario::GaClH => 1e-5,
            Scenario::AlGaN => 1e-2,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scenario::AlClH => "Al-Cl-H",
            Scenario::GaClH => "Ga-Cl-H",
            Scenario::AlGaN => "AlGaN",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Scenario {
    type Err = EquilibriumError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "").as_str() {
            "ALCLH" => Ok(Scenario::AlClH),
            "GACLH" => Ok(Scenario::GaClH),
            "ALGAN" => Ok(Scenario::AlGaN),
            _ => Err(EquilibriumError::UnknownScenario(s.to_string())),
        }
    }
}

/// physical parameters of the scenarios, Pa, K, m. Each scenario uses its own subset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// HCl in the feed of the metal source
    pub p_hcl: f64,
    /// H2 in the feed of the metal source
    pub p_h2: f64,
    /// AlCl3 + GaCl in the feed of the deposition zone
    pub p_chlorides: f64,
    /// NH3 in the feed of the deposition zone
    pub p_nh3: f64,
    /// portion of H2 in H2 + N2 of the deposition zone feed
    pub h2_portion: f64,
    /// H2 + N2 in the feed of the deposition zone
    pub p_carrier: f64,
    /// temperature of the deposition zone
    pub deposition_temperature: f64,
    /// thickness of the diffusion boundary layer
    pub delta: f64,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            p_hcl: 10000.0,
            p_h2: 0.0,
            p_chlorides: 30.0,
            p_nh3: 1500.0,
            h2_portion: 0.1,
            p_carrier: 98470.0,
            deposition_temperature: 1100.0 + 273.0,
            delta: 0.01,
        }
    }
}

////////////////////////////////////////////EQUATION SYSTEMS////////////////////////////////////////////////

/// residuals, Jacobian and transport data of one scenario at one sweep point
pub trait EquationSystem {
    fn scenario(&self) -> Scenario;
    fn temperature(&self) -> f64;
    /// bulk pressures of the transported species, in the order of the unknowns
    fn bulk_pressures(&self) -> &[f64];
    /// diffusion coefficients of the transported species, in the order of the unknowns
    fn diffusion_coefficients(&self) -> &[f64];
    /// (index of unknown, condensed phase grown or consumed by its flux)
    fn growth_phases(&self) -> Vec<(usize, &'static str)>;
    fn residuals(&self, x: &DVector<f64>) -> DVector<f64>;
    fn jacobian(&self, x: &DVector<f64>) -> SquareMatrix;

    fn dim(&self) -> usize {
        self.scenario().dim()
    }

    /// flux term D_k*(Pg_k - Pe_k)
    fn mf(&self, x: &DVector<f64>, k: usize) -> f64 {
        self.diffusion_coefficients()[k] * (self.bulk_pressures()[k] - x[k])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metal {
    Al,
    Ga,
}

impl Metal {
    fn symbol(&self) -> &'static str {
        match self {
            Metal::Al => "Al",
            Metal::Ga => "Ga",
        }
    }
    /// numbers of K for MeCl, MeCl2, MeCl3
    fn reactions(&self) -> [usize; 3] {
        match self {
            Metal::Al => [1, 2, 3],
            Metal::Ga => [4, 5, 6],
        }
    }
}

/// Me-Cl-H system over a metal source. Unknowns: MeCl, MeCl2, MeCl3, HCl, H2
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct MetalChlorideSystem {
    pub metal: Metal,
    pub T: f64,
    pub K: [f64; 3],
    pub D: [f64; 5],
    pub pg: [f64; 5],
}

#[allow(non_snake_case)]
impl MetalChlorideSystem {
    pub fn new(
        registry: &SpeciesRegistry,
        metal: Metal,
        T: f64,
        params: &ScenarioParameters,
    ) -> Result<Self, EquilibriumError> {
        let me = metal.symbol();
        let species = [
            format!("{}Cl", me),
            format!("{}Cl2", me),
            format!("{}Cl3", me),
            "HCl".to_string(),
            "H2".to_string(),
        ];
        let [k1, k2, k3] = metal.reactions();
        let K = [
            registry.K(k1)?.K(T),
            registry.K(k2)?.K(T),
            registry.K(k3)?.K(T),
        ];
        let mut D = [0.0; 5];
        for (i, s) in species.iter().enumerate() {
            D[i] = registry.diffusion(s)?.calculate_D(T);
        }
        if K.iter().chain(D.iter()).any(|v| !v.is_finite()) {
            warn!("{}-Cl-H system at T = {}: K = {:?}, D = {:?} contain not available values", me, T, K, D);
        }
        Ok(Self {
            metal,
            T,
            K,
            D,
            pg: [0.0, 0.0, 0.0, params.p_hcl, params.p_h2],
        })
    }
}

#[allow(non_snake_case)]
impl EquationSystem for MetalChlorideSystem {
    fn scenario(&self) -> Scenario {
        match self.metal {
            Metal::Al => Scenario::AlClH,
            Metal::Ga => Scenario::GaClH,
        }
    }
    fn temperature(&self) -> f64 {
        self.T
    }
    fn bulk_pressures(&self) -> &[f64] {
        &self.pg
    }
    fn diffusion_coefficients(&self) -> &[f64] {
        &self.D
    }
    fn growth_phases(&self) -> Vec<(usize, &'static str)> {
        let me = self.metal.symbol();
        vec![(0, me), (1, me), (2, me)]
    }

    fn residuals(&self, x: &DVector<f64>) -> DVector<f64> {
        let [K1, K2, K3] = self.K;
        DVector::from_vec(vec![
            x[3].powi(2) - K1 * x[0].powi(2) * x[4],
            x[3].powi(2) - K2 * x[1] * x[4],
            x[3].powi(6) - K3 * x[2].powi(2) * x[4].powi(3),
            // H
            self.mf(x, 3) + 2.0 * self.mf(x, 4),
            // Cl
            self.mf(x, 0) + 2.0 * self.mf(x, 1) + 3.0 * self.mf(x, 2) + self.mf(x, 3),
        ])
    }

    fn jacobian(&self, x: &DVector<f64>) -> SquareMatrix {
        let [K1, K2, K3] = self.K;
        let D = &self.D;
        let mut J = SquareMatrix::zeros(5);
        J[(0, 0)] = -2.0 * K1 * x[0] * x[4];
        J[(0, 3)] = 2.0 * x[3];
        J[(0, 4)] = -K1 * x[0].powi(2);

        J[(1, 1)] = -K2 * x[4];
        J[(1, 3)] = 2.0 * x[3];
        J[(1, 4)] = -K2 * x[1];

        J[(2, 2)] = -2.0 * K3 * x[2] * x[4].powi(3);
        J[(2, 3)] = 6.0 * x[3].powi(5);
        J[(2, 4)] = -3.0 * K3 * x[2].powi(2) * x[4].powi(2);

        J[(3, 3)] = -D[3];
        J[(3, 4)] = -2.0 * D[4];

        J[(4, 0)] = -D[0];
        J[(4, 1)] = -2.0 * D[1];
        J[(4, 2)] = -3.0 * D[2];
        J[(4, 3)] = -D[3];
        J
    }
}

/// AlGaN deposition zone. Unknowns: AlCl3, GaCl, NH3, HCl, H2, x (fraction of AlN in the solid)
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct AlGaNSystem {
    pub T: f64,
    pub K9: f64,
    pub K10: f64,
    pub D: [f64; 5],
    pub pg: [f64; 5],
}

#[allow(non_snake_case)]
impl AlGaNSystem {
    /// x_g - Al fraction of the chlorides in the feed
    pub fn new(registry: &SpeciesRegistry, x_g: f64, params: &ScenarioParameters) -> Result<Self, EquilibriumError> {
        let T = params.deposition_temperature;
        let species = ["AlCl3", "GaCl", "NH3", "HCl", "H2"];
        let mut D = [0.0; 5];
        for (i, s) in species.iter().enumerate() {
            D[i] = registry.diffusion(s)?.calculate_D(T);
        }
        let pg = [
            x_g * params.p_chlorides,
            (1.0 - x_g) * params.p_chlorides,
            params.p_nh3,
            0.0,
            params.h2_portion * params.p_carrier,
        ];
        let (K9, K10) = (registry.K(9)?.K(T), registry.K(10)?.K(T));
        if [K9, K10].iter().chain(D.iter()).any(|v| !v.is_finite()) {
            warn!("AlGaN system at T = {}: K9 = {}, K10 = {}, D = {:?} contain not available values", T, K9, K10, D);
        }
        Ok(Self { T, K9, K10, D, pg })
    }
}

#[allow(non_snake_case)]
impl EquationSystem for AlGaNSystem {
    fn scenario(&self) -> Scenario {
        Scenario::AlGaN
    }
    fn temperature(&self) -> f64 {
        self.T
    }
    fn bulk_pressures(&self) -> &[f64] {
        &self.pg
    }
    fn diffusion_coefficients(&self) -> &[f64] {
        &self.D
    }
    fn growth_phases(&self) -> Vec<(usize, &'static str)> {
        vec![(0, "AlN"), (1, "GaN")]
    }

    fn residuals(&self, v: &DVector<f64>) -> DVector<f64> {
        let (K9, K10) = (self.K9, self.K10);
        let x = v[5];
        DVector::from_vec(vec![
            v[0] * v[2] - K9 * x * v[3].powi(3),
            v[1] * v[2] - K10 * (1.0 - x) * v[3] * v[4],
            // H
            self.mf(v, 3) + 2.0 * self.mf(v, 4) + 3.0 * self.mf(v, 2),
            // Cl
            3.0 * self.mf(v, 0) + self.mf(v, 1) + self.mf(v, 3),
            // (Al + Ga) = N
            self.mf(v, 0) + self.mf(v, 1) - self.mf(v, 2),
            // x = G_AlCl3/(G_AlCl3 + G_GaCl)
            self.mf(v, 0) * (1.0 - x) - self.mf(v, 1) * x,
        ])
    }

    fn jacobian(&self, v: &DVector<f64>) -> SquareMatrix {
        let (K9, K10) = (self.K9, self.K10);
        let D = &self.D;
        let x = v[5];
        let mut J = SquareMatrix::zeros(6);
        J[(0, 0)] = v[2];
        J[(0, 2)] = v[0];
        J[(0, 3)] = -3.0 * K9 * x * v[3].powi(2);
        J[(0, 5)] = -K9 * v[3].powi(3);

        J[(1, 1)] = v[2];
        J[(1, 2)] = v[1];
        J[(1, 3)] = -K10 * (1.0 - x) * v[4];
        J[(1, 4)] = -K10 * (1.0 - x) * v[3];
        J[(1, 5)] = K10 * v[3] * v[4];

        J[(2, 2)] = -3.0 * D[2];
        J[(2, 3)] = -D[3];
        J[(2, 4)] = -2.0 * D[4];

        J[(3, 0)] = -3.0 * D[0];
        J[(3, 1)] = -D[1];
        J[(3, 3)] = -D[3];

        J[(4, 0)] = -D[0];
        J[(4, 1)] = -D[1];
        J[(4, 2)] = D[2];

        J[(5, 0)] = -D[0] * (1.0 - x);
        J[(5, 1)] = D[1] * x;
        J[(5, 5)] = -self.mf(v, 0) - self.mf(v, 1);
        J
    }
}

////////////////////////////////////////////BUILDER AND SOLVER////////////////////////////////////////////////

/// equation system of the scenario at sweep input (T for the metal sources, x^g for AlGaN)
pub fn create_equation_system(
    registry: &SpeciesRegistry,
    scenario: Scenario,
    params: &ScenarioParameters,
    sweep_input: f64,
) -> Result<Box<dyn EquationSystem>, EquilibriumError> {
    let system: Box<dyn EquationSystem> = match scenario {
        Scenario::AlClH => Box::new(MetalChlorideSystem::new(registry, Metal::Al, sweep_input, params)?),
        Scenario::GaClH => Box::new(MetalChlorideSystem::new(registry, Metal::Ga, sweep_input, params)?),
        Scenario::AlGaN => Box::new(AlGaNSystem::new(registry, sweep_input, params)?),
    };
    Ok(system)
}

fn check_initial_guess(scenario: Scenario, initial_guess: &[f64]) -> Result<(), EquilibriumError> {
    if initial_guess.len() != scenario.dim() {
        return Err(EquilibriumError::InvalidInitialGuess {
            scenario,
            expected: scenario.dim(),
            found: initial_guess.len(),
        });
    }
    Ok(())
}

/// Newton-Raphson solution of the equation system
pub fn solve_equation_system(
    system: &dyn EquationSystem,
    initial_guess: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<NRSolution, EquilibriumError> {
    check_initial_guess(system.scenario(), initial_guess)?;
    let solution = solve(
        |x: &DVector<f64>| system.residuals(x),
        |x: &DVector<f64>| system.jacobian(x),
        DVector::from_column_slice(initial_guess),
        tolerance,
        max_iterations,
    )?;
    if solution.status != NRStatus::Converged {
        warn!(
            "{} system: {:?} after {} iterations",
            system.scenario(),
            solution.status,
            solution.iterations
        );
    }
    Ok(solution)
}

/// sweep input -> solution of the scenario. Every call builds and solves an independent system,
/// results are not cached
pub fn build_equilibrium_system<'a>(
    registry: &'a SpeciesRegistry,
    scenario: Scenario,
    params: ScenarioParameters,
    initial_guess: Vec<f64>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<impl Fn(f64) -> Result<NRSolution, EquilibriumError> + 'a, EquilibriumError> {
    check_initial_guess(scenario, &initial_guess)?;
    info!(
        "{} system created: tolerance {}, max iterations {}",
        scenario, tolerance, max_iterations
    );
    Ok(move |sweep_input: f64| {
        let system = create_equation_system(registry, scenario, &params, sweep_input)?;
        solve_equation_system(system.as_ref(), &initial_guess, tolerance, max_iterations)
    })
}
