/// residual equations and Jacobians of the Al-Cl-H, Ga-Cl-H and AlGaN systems
/// # Examples
/// ```
/// use HVPEq::Thermodynamics::ChemEquilibrium::EquationSystems::{
///     Scenario, ScenarioParameters, build_equilibrium_system,
/// };
/// use HVPEq::Thermodynamics::DBhandlers::HVPEdata::hvpe_registry;
/// let solver = build_equilibrium_system(
///     hvpe_registry(),
///     Scenario::AlClH,
///     ScenarioParameters::default(),
///     vec![50.0, 50.0, 50.0, 50.0, 500.0],
///     1e-5,
///     10000,
/// )
/// .unwrap();
/// let solution = solver(900.0).unwrap();
/// assert!(solution.is_converged());
/// assert!(solution.x.iter().all(|p| *p > 0.0));
/// ```
pub mod EquationSystems;
mod EquationSystems_tests;
/// diffusion fluxes and growth rates
pub mod deposition;
