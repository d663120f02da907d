//! Diffusion fluxes through the boundary layer and growth (etching) rates of the solid phases.
//!
//! Flux of gas species i from the bulk to the surface, kmol/(m^2*s):
//! G_i = D_i*(Pg_i - Pe_i)/(R*T*delta)
//! Growth rate, nm/s: V = sum over the phases of G_i*(mu/rho)_phase*1e9.
//! Negative V of a metal source means the source is being etched.
use super::EquationSystems::{
    EquationSystem, EquilibriumError, Scenario, ScenarioParameters, create_equation_system,
    solve_equation_system,
};
use crate::Numerical::NR::{NRSolution, NRStatus};
use crate::Thermodynamics::DBhandlers::HVPEdata::SpeciesRegistry;
use log::info;
use nalgebra::DVector;
use prettytable::{Cell, Row, Table};

/// J/(kmol*K)
pub const R_KMOL: f64 = 8314.4621;

/// G_i for every transported species of the system, kmol/(m^2*s)
pub fn fluxes(system: &dyn EquationSystem, x: &DVector<f64>, delta: f64) -> Vec<f64> {
    let rt_delta = R_KMOL * system.temperature() * delta;
    (0..system.bulk_pressures().len())
        .map(|k| system.mf(x, k) / rt_delta)
        .collect()
}

/// growth rate of the solid, nm/s
#[allow(non_snake_case)]
pub fn growth_rate(
    registry: &SpeciesRegistry,
    system: &dyn EquationSystem,
    x: &DVector<f64>,
    delta: f64,
) -> Result<f64, EquilibriumError> {
    let G = fluxes(system, x, delta);
    let mut rate = 0.0;
    for (i, phase) in system.growth_phases() {
        rate += G[i] * registry.molar_volume(phase)?;
    }
    Ok(rate * 1e9)
}

/// solved point of a scenario with fluxes and growth rate
#[derive(Debug, Clone)]
pub struct DepositionReport {
    pub scenario: Scenario,
    pub sweep_input: f64,
    pub temperature: f64,
    pub unknowns: Vec<String>,
    pub solution: NRSolution,
    pub fluxes: Vec<f64>,
    /// nm/s
    pub growth_rate: f64,
}

impl DepositionReport {
    pub fn new(
        registry: &SpeciesRegistry,
        system: &dyn EquationSystem,
        sweep_input: f64,
        solution: NRSolution,
        delta: f64,
    ) -> Result<Self, EquilibriumError> {
        let fluxes = fluxes(system, &solution.x, delta);
        let growth_rate = growth_rate(registry, system, &solution.x, delta)?;
        Ok(Self {
            scenario: system.scenario(),
            sweep_input,
            temperature: system.temperature(),
            unknowns: system.scenario().unknowns(),
            solution,
            fluxes,
            growth_rate,
        })
    }

    pub fn pretty_print(&self) {
        println!(
            "\n{}: {} = {}, T = {} K, {:?} after {} iterations",
            self.scenario,
            self.scenario.sweep_input_name(),
            self.sweep_input,
            self.temperature,
            self.solution.status,
            self.solution.iterations
        );
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("unknown"),
            Cell::new("value"),
            Cell::new("G, kmol/(m2*s)"),
        ]));
        for (i, name) in self.unknowns.iter().enumerate() {
            let flux = self
                .fluxes
                .get(i)
                .map(|g| format!("{:.4e}", g))
                .unwrap_or_default();
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&format!("{:.6e}", self.solution.x[i])),
                Cell::new(&flux),
            ]));
        }
        table.printstd();
        println!("growth rate V = {:.4} nm/s", self.growth_rate);
    }
}

/// builds the system at sweep_input, solves it and computes the deposition data
pub fn solve_and_report(
    registry: &SpeciesRegistry,
    scenario: Scenario,
    params: &ScenarioParameters,
    sweep_input: f64,
    initial_guess: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<DepositionReport, EquilibriumError> {
    let system = create_equation_system(registry, scenario, params, sweep_input)?;
    let solution = solve_equation_system(system.as_ref(), initial_guess, tolerance, max_iterations)?;
    if solution.status == NRStatus::Converged {
        info!("{} solved at {} = {}", scenario, scenario.sweep_input_name(), sweep_input);
    }
    DepositionReport::new(registry, system.as_ref(), sweep_input, solution, params.delta)
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::Thermodynamics::DBhandlers::HVPEdata::hvpe_registry;
    use approx::assert_relative_eq;

    #[test]
    fn test_flux_formula() {
        let registry = hvpe_registry();
        let params = ScenarioParameters::default();
        let system = create_equation_system(registry, Scenario::AlClH, &params, 900.0).unwrap();
        let x = DVector::from_vec(vec![10.0, 1.0, 100.0, 9000.0, 500.0]);
        let G = fluxes(system.as_ref(), &x, 0.01);
        let D = system.diffusion_coefficients();
        assert_relative_eq!(G[3], D[3] * 1000.0 / (R_KMOL * 900.0 * 0.01), max_relative = 1e-14);
        // every flux carries its own diffusion coefficient
        let pg = system.bulk_pressures();
        for k in 0..5 {
            let expected = D[k] * (pg[k] - x[k]) / (R_KMOL * 900.0 * 0.01);
            assert_relative_eq!(G[k], expected, max_relative = 1e-14);
        }
        // chlorides and H2 leave the surface
        assert!(G[0] < 0.0 && G[2] < 0.0 && G[4] < 0.0);
        // thicker boundary layer, smaller flux
        assert_relative_eq!(fluxes(system.as_ref(), &x, 0.02)[3], G[3] / 2.0, max_relative = 1e-14);
    }

    #[test]
    fn test_Al_source_is_etched() {
        let registry = hvpe_registry();
        let report = solve_and_report(
            registry,
            Scenario::AlClH,
            &ScenarioParameters::default(),
            900.0,
            &[50.0, 50.0, 50.0, 50.0, 500.0],
            1e-5,
            10000,
        )
        .unwrap();
        assert!(report.solution.is_converged());
        assert_eq!(report.fluxes.len(), 5);
        assert!(report.growth_rate < 0.0);
        assert_relative_eq!(report.growth_rate, -226.20, max_relative = 1e-3);
        let by_hand: f64 = report.fluxes[..3].iter().sum::<f64>()
            * registry.molar_volume("Al").unwrap()
            * 1e9;
        assert_relative_eq!(report.growth_rate, by_hand, max_relative = 1e-12);
    }

    #[test]
    fn test_AlGaN_grows() {
        let registry = hvpe_registry();
        let params = ScenarioParameters {
            h2_portion: 0.0,
            ..ScenarioParameters::default()
        };
        let report = solve_and_report(
            registry,
            Scenario::AlGaN,
            &params,
            0.5,
            &Scenario::AlGaN.default_initial_guess(),
            1e-8,
            10000,
        )
        .unwrap();
        assert!(report.solution.is_converged());
        assert_eq!(report.temperature, 1373.0);
        // x of the solid equals the Al share of the metal fluxes
        let (g_al, g_ga) = (report.fluxes[0], report.fluxes[1]);
        assert!(g_al > 0.0 && g_ga > 0.0);
        assert_relative_eq!(report.solution.x[5], g_al / (g_al + g_ga), max_relative = 1e-6);
        let by_hand = (g_al * registry.molar_volume("AlN").unwrap()
            + g_ga * registry.molar_volume("GaN").unwrap())
            * 1e9;
        assert!(report.growth_rate > 0.0);
        assert_relative_eq!(report.growth_rate, by_hand, max_relative = 1e-12);
    }
}
