//! # HVPE species data
//!
//! ## Aim
//! Static data of the Al/Ga-Cl-NH3-H2 chemistry: polynomial Gibbs energy coefficients, molar masses,
//! Lennard-Jones parameters, densities of the solid phases and the equilibrium constants of the
//! reactions that take place at the growth surface.
//!
//! ## Main Data Structures and Logic
//! - `SpeciesCoeffs`: h, f1..f7, mu and (for gases) Lennard-Jones parameters of one species
//! - `SpeciesRegistry`: name -> coefficients, name -> density, number -> equilibrium constant.
//!   Lookups are not case-sensitive. The registry is filled once and never mutated afterwards,
//!   so it can be shared between threads by reference.
//! - `hvpe_registry()`: process-wide instance created on first use
//!
//! ## Reactions
//! | K   | n  | reaction                   |
//! |-----|----|----------------------------|
//! | K1  | -1 | 2AlCl + H2 = 2Al + 2HCl    |
//! | K2  | 0  | AlCl2 + H2 = Al + 2HCl     |
//! | K3  | 1  | 2AlCl3 + 3H2 = 2Al + 6HCl  |
//! | K4  | -1 | 2GaCl + H2 = 2Ga + 2HCl    |
//! | K5  | 0  | GaCl2 + H2 = Ga + 2HCl     |
//! | K6  | 1  | 2GaCl3 + 3H2 = 2Ga + 6HCl  |
//! | K9  | -1 | AlN + 3HCl = AlCl3 + NH3   |
//! | K10 | 0  | GaN + HCl + H2 = GaCl + NH3|
use super::TRANSPORTdata::{CARRIER_GAS, DiffusionCoefficient, LennardJones};
use crate::Thermodynamics::dG_dS::{EquilibriumConstant, KBuilder, gibbs_fun};
use log::info;
use prettytable::{Cell, Row, Table};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// errors of the coefficient tables. All of them are setup errors: a scenario referring to
/// unknown data can not be built at all
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThermoError {
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),
    #[error("Unknown reaction: K{0}")]
    UnknownReaction(usize),
    #[error("Species {species} has already been added in formula")]
    DuplicateReactant { species: String },
    #[error("Species {species}: expected 9 or 11 parameters, got {found}")]
    InvalidParameters { species: String, found: usize },
}

/// Contains information about coefficients of some species (h, f1..7, mu, sigma, eps)
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCoeffs {
    pub name: String,
    /// enthalpy-like constant, J/mol
    pub h: f64,
    pub f: [f64; 7],
    /// molar mass, g/mol
    pub mu: f64,
    /// None for condensed species
    pub lj: Option<LennardJones>,
}

impl SpeciesCoeffs {
    /// params in order: h, f1, f2, ... f7, mu, [sigma, eps] (parameters in braces are optional)
    pub fn from_params(name: &str, params: &[f64]) -> Result<Self, ThermoError> {
        if params.len() != 9 && params.len() != 11 {
            return Err(ThermoError::InvalidParameters {
                species: name.to_string(),
                found: params.len(),
            });
        }
        let mut f = [0.0; 7];
        f.copy_from_slice(&params[1..8]);
        let lj = if params.len() == 11 {
            Some(LennardJones::new(params[9], params[10]))
        } else {
            None
        };
        Ok(Self {
            name: name.to_string(),
            h: params[0],
            f,
            mu: params[8],
            lj,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    coeffs: HashMap<String, SpeciesCoeffs>,
    densities: HashMap<String, f64>,
    reactions: HashMap<usize, EquilibriumConstant>,
}

#[allow(non_snake_case)]
impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_coeffs(&mut self, species: &str, params: &[f64]) -> Result<(), ThermoError> {
        let coeffs = SpeciesCoeffs::from_params(species, params)?;
        self.coeffs.insert(species.to_uppercase(), coeffs);
        Ok(())
    }

    /// density of a condensed phase, kg/m^3
    pub fn register_density(&mut self, species: &str, density: f64) {
        self.densities.insert(species.to_uppercase(), density);
    }

    pub fn register_reaction(&mut self, number: usize, formula: KBuilder) -> Result<(), ThermoError> {
        let K = formula.build(self)?;
        self.reactions.insert(number, K);
        Ok(())
    }

    /// registry of the Al/Ga-Cl-NH3-H2 system
    pub fn hvpe() -> Result<Self, ThermoError> {
        let mut r = Self::new();
        r.register_coeffs("AlCl", &[-51032., 318.9948, 36.94626, -0.001226431, 1.1881743, 5.638541, -5.066135, 5.219347, 62.4345, 3.58, 932.])?;
        r.register_coeffs("AlCl2", &[-259000., 427.2137, 56.56409, -0.002961273, 1.893842, 12.40072, -22.65441, 21.29898, 97.8875, 5.3, 825.])?;
        r.register_coeffs("AlCl3", &[-584100., 511.8114, 81.15042, -0.004834879, 2.752097, 13.40078, -21.28001, 16.92868, 133.3405, 5.13, 472.])?;
        r.register_coeffs("GaCl", &[-70553., 332.2718, 37.11052, -0.000746187, 1.1606512, 4.891346, -4.467591, 5.506236, 105.173, 3.696, 348.2])?;
        r.register_coeffs("GaCl2", &[-241238., 443.2976, 57.745845, -0.002265112, 1.8755545, 3.66186, -9.356338, 15.88245, 140.626, 4.293, 465.])?;
        r.register_coeffs("GaCl3", &[-431573., 526.8113, 82.03355, -0.003486473, 2.6855923, 8.278878, -14.5678, 12.8899, 176.080, 5.034, 548.24])?;
        r.register_coeffs("NH3", &[-45940., 231.1183, 20.52222, 0.000716251, 0.7677236, 244.6296, -251.69, 146.6947, 17.031, 3.0, 300.])?;
        r.register_coeffs("H2", &[0., 205.5368, 29.50487, 0.000168424, 0.86065612, -14.95312, 78.18955, -82.78981, 2.016, 2.93, 34.1])?;
        r.register_coeffs("HCl", &[-92310., 243.9878, 23.15984, 0.001819985, 0.6147384, 51.16604, -36.89502, 9.174252, 36.461, 2.737, 167.1])?;
        r.register_coeffs("N2", &[0., 242.8156, 21.47467, 0.001748786, 0.5910039, 81.08497, -103.6265, 71.30775, 28.0135, 3.798, 71.4])?;
        r.register_coeffs("Al", &[0., 172.8289, 50.51806, -0.00411847, 1.476107, -458.1279, 2105.75, -4168.337, 26.9815])?;
        r.register_coeffs("Ga", &[0., 125.9597, 26.03107, 0.001178297, 0.13976, -0.5698425, 0.04723008, 7.212525, 69.723])?;
        r.register_coeffs("AlN", &[-319000., 123.1132, 44.98092, -0.00734504, 1.86107, 31.39626, -49.92139, 81.22038, 40.988])?;
        r.register_coeffs("GaN", &[-114000., 160.2647, 52.86351, -0.00799055, 2.113389, 1.313428, -2.441129, 1.945731, 83.730])?;

        r.register_density("Al", 2690.);
        r.register_density("Ga", 5900.);
        r.register_density("AlN", 3200.);
        r.register_density("GaN", 6150.);

        r.register_reaction(1, KBuilder::new(-1.).plus(2, "Al")?.plus(2, "HCl")?.minus(2, "AlCl")?.minus(1, "H2")?)?;
        r.register_reaction(2, KBuilder::new(0.).plus(1, "Al")?.plus(2, "HCl")?.minus(1, "AlCl2")?.minus(1, "H2")?)?;
        r.register_reaction(3, KBuilder::new(1.).plus(2, "Al")?.plus(6, "HCl")?.minus(2, "AlCl3")?.minus(3, "H2")?)?;
        r.register_reaction(4, KBuilder::new(-1.).plus(2, "Ga")?.plus(2, "HCl")?.minus(2, "GaCl")?.minus(1, "H2")?)?;
        r.register_reaction(5, KBuilder::new(0.).plus(1, "Ga")?.plus(2, "HCl")?.minus(1, "GaCl2")?.minus(1, "H2")?)?;
        r.register_reaction(6, KBuilder::new(1.).plus(2, "Ga")?.plus(6, "HCl")?.minus(2, "GaCl3")?.minus(3, "H2")?)?;
        r.register_reaction(9, KBuilder::new(-1.).plus(1, "AlCl3")?.plus(1, "NH3")?.minus(1, "AlN")?.minus(3, "HCl")?)?;
        r.register_reaction(10, KBuilder::new(0.).plus(1, "GaCl")?.plus(1, "NH3")?.minus(1, "GaN")?.minus(1, "HCl")?.minus(1, "H2")?)?;
        info!(
            "HVPE registry built: {} species, {} densities, {} reactions",
            r.coeffs.len(),
            r.densities.len(),
            r.reactions.len()
        );
        Ok(r)
    }

    /// coefficients of species. Not case-sensitive
    pub fn coefficients(&self, species: &str) -> Result<&SpeciesCoeffs, ThermoError> {
        self.coeffs
            .get(&species.to_uppercase())
            .ok_or_else(|| ThermoError::UnknownSpecies(species.to_string()))
    }

    /// density, kg/m^3. Not case-sensitive
    pub fn density(&self, species: &str) -> Result<f64, ThermoError> {
        self.densities
            .get(&species.to_uppercase())
            .copied()
            .ok_or_else(|| ThermoError::UnknownSpecies(species.to_string()))
    }

    /// mu/density, m^3/kmol
    pub fn molar_volume(&self, species: &str) -> Result<f64, ThermoError> {
        Ok(self.coefficients(species)?.mu / self.density(species)?)
    }

    /// function T -> G_x
    pub fn gibbs_fun(&self, species: &str) -> Result<Box<dyn Fn(f64) -> f64 + Send + Sync>, ThermoError> {
        Ok(gibbs_fun(self.coefficients(species)?))
    }

    /// equilibrium constant number i
    pub fn K(&self, number: usize) -> Result<&EquilibriumConstant, ThermoError> {
        self.reactions
            .get(&number)
            .ok_or(ThermoError::UnknownReaction(number))
    }

    /// diffusion coefficient of species through the carrier gas
    pub fn diffusion(&self, species: &str) -> Result<DiffusionCoefficient, ThermoError> {
        let x = self.coefficients(species)?;
        let carrier = self.coefficients(CARRIER_GAS)?;
        Ok(DiffusionCoefficient::new(
            &x.name,
            x.mu,
            x.lj,
            carrier.mu,
            carrier.lj,
        ))
    }

    /// names of all registered species, sorted
    pub fn species(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.coeffs.values().map(|c| c.name.as_str()).collect();
        names.sort();
        names
    }

    /// numbers of all registered reactions, sorted
    pub fn reaction_numbers(&self) -> Vec<usize> {
        let mut numbers: Vec<usize> = self.reactions.keys().copied().collect();
        numbers.sort();
        numbers
    }

    /// table of G, D for all species and K for all reactions at temperature T
    pub fn pretty_print(&self, T: f64) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("species"),
            Cell::new("mu, g/mol"),
            Cell::new("G, J/mol"),
            Cell::new("D"),
        ]));
        for name in self.species() {
            let (Ok(c), Ok(d)) = (self.coefficients(name), self.diffusion(name)) else {
                continue;
            };
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&format!("{:.4}", c.mu)),
                Cell::new(&format!("{:.2}", crate::Thermodynamics::dG_dS::gibbs_energy(c, T))),
                Cell::new(&format!("{:.4e}", d.calculate_D(T))),
            ]));
        }
        table.printstd();
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("K"), Cell::new("reaction"), Cell::new("value")]));
        for number in self.reaction_numbers() {
            if let Ok(K) = self.K(number) {
                table.add_row(Row::new(vec![
                    Cell::new(&format!("K{}", number)),
                    Cell::new(&K.to_string()),
                    Cell::new(&format!("{:.4e}", K.K(T))),
                ]));
            }
        }
        table.printstd();
    }
}

static HVPE_REGISTRY: OnceLock<SpeciesRegistry> = OnceLock::new();

/// process-wide registry of the HVPE system, built on first call and read-only afterwards
pub fn hvpe_registry() -> &'static SpeciesRegistry {
    HVPE_REGISTRY.get_or_init(|| {
        // the built-in tables only refer to species registered above
        SpeciesRegistry::hvpe().expect("built-in HVPE tables are inconsistent")
    })
}
