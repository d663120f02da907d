//! # Transport Properties Data Handler Module
//!
//! ## Aim
//! This module calculates binary diffusion coefficients of the gaseous species of the
//! HVPE chemistry through the carrier gas (nitrogen). It combines Lennard-Jones parameters
//! of a species with those of the carrier using the usual combining rules of the kinetic
//! theory of gases.
//!
//! ## Main Data Structures and Logic
//! - `LennardJones`: collision diameter (Angstrom) and well depth (K) of a molecule
//! - `DiffusionCoefficient`: species + carrier data, evaluates D(T) and produces closures
//!
//! ## Combining rules
//! - collision diameter: arithmetic mean  sigma_ = (sigma_x + sigma_N2)/2
//! - well depth: geometric mean eps_ = sqrt(eps_x*eps_N2)
//! - reduced molar mass: mu_ = 2*mu_x*mu_N2/(mu_x + mu_N2)
//!
//! ## Usage
//! ```rust, ignore
//! let registry = hvpe_registry();
//! let D_HCl = registry.diffusion("HCl")?;
//! let D = D_HCl.calculate_D(900.0);
//! ```
//!
//! ## Interesting Features
//! - species without Lennard-Jones data (solids: Al, Ga, AlN, GaN) give NaN instead of an error.
//!   NaN propagates through any arithmetic it enters, callers must check `is_finite()`.
//! - the collision diameter enters the denominator in the first power, not squared as in the
//!   Chapman-Enskog formula.

use serde::{Deserialize, Serialize};

/// carrier gas of the reactor
pub const CARRIER_GAS: &str = "N2";
/// reference pressure in the denominator of D, Pa
const P_REF: f64 = 1e5;

/// Lennard-Jones parameters of a molecule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LennardJones {
    ///  Lennard-Jones collision diameter in angstroms
    pub sigma: f64,
    /// Lennard-Jones well depth in Kelvin
    pub eps: f64,
}

impl LennardJones {
    pub fn new(sigma: f64, eps: f64) -> Self {
        Self { sigma, eps }
    }
    /// arithmetic mean of diameters and geometric mean of well depths
    pub fn combine(&self, other: &LennardJones) -> LennardJones {
        LennardJones {
            sigma: (self.sigma + other.sigma) / 2.0,
            eps: (self.eps * other.eps).sqrt(),
        }
    }
}

/// reduced molar mass of a pair of molecules, g/mol
pub fn reduced_molar_mass(mu_1: f64, mu_2: f64) -> f64 {
    2.0 * mu_1 * mu_2 / (mu_1 + mu_2)
}

#[allow(non_snake_case)]
fn D_calc(T: f64, pair: &LennardJones, mu_: f64) -> f64 {
    2.628e-2 * T.powf(1.5) / (P_REF * pair.sigma * 1.074 * (T / pair.eps).powf(-0.1604) * mu_.sqrt())
}

/// binary diffusion coefficient of a species through the carrier gas
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionCoefficient {
    /// name of the diffusing species
    pub species: String,
    /// molar mass of the species, g/mol
    pub mu: f64,
    pub lj: Option<LennardJones>,
    /// molar mass of the carrier, g/mol
    pub carrier_mu: f64,
    pub carrier_lj: Option<LennardJones>,
}

#[allow(non_snake_case)]
impl DiffusionCoefficient {
    pub fn new(
        species: &str,
        mu: f64,
        lj: Option<LennardJones>,
        carrier_mu: f64,
        carrier_lj: Option<LennardJones>,
    ) -> Self {
        Self {
            species: species.to_string(),
            mu,
            lj,
            carrier_mu,
            carrier_lj,
        }
    }

    /// true if both the species and the carrier have Lennard-Jones data
    pub fn is_available(&self) -> bool {
        self.lj.is_some() && self.carrier_lj.is_some()
    }

    /// combined Lennard-Jones parameters of the pair species-carrier
    pub fn pair_parameters(&self) -> Option<LennardJones> {
        match (self.lj, self.carrier_lj) {
            (Some(lj), Some(carrier)) => Some(lj.combine(&carrier)),
            _ => None,
        }
    }

    /// D(T). NaN if Lennard-Jones data are missing or T <= 0
    pub fn calculate_D(&self, T: f64) -> f64 {
        if !(T > 0.0) {
            return f64::NAN;
        }
        match self.pair_parameters() {
            Some(pair) => D_calc(T, &pair, reduced_molar_mass(self.mu, self.carrier_mu)),
            None => f64::NAN,
        }
    }

    /// closure T -> D(T)
    pub fn create_closure_D(&self) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
        let this = self.clone();
        Box::new(move |T: f64| this.calculate_D(T))
    }
}
