//! Gibbs free energies of individual species and equilibrium constants of reactions.
//!
//! G_x(T) is computed from the 7-coefficient fit
//! G = h - T*( f0 + f1*ln(u) + (f2/u + f3)/u + (f4 + (f5 + f6*u)*u)*u ),  u = T/1e4.
//!
//! The equilibrium constant of a reaction  sum(nu_x * x) = 0 (reactants negative, products positive)
//! is K(T) = exp(-dG/(R*T)) * P_A^n, dG = sum(nu_x*G_x(T)), P_A = 1e5 Pa, so K is in Pa^n.
use crate::Thermodynamics::DBhandlers::HVPEdata::{SpeciesCoeffs, SpeciesRegistry, ThermoError};
use log::warn;
use std::fmt;

/// J/(mol*K)
pub const R: f64 = 8.3144621;
/// atmospheric pressure as used in the definition of K, Pa
pub const P_A: f64 = 1e5;

/// Gibbs free energy of species at temperature T, J/mol. NaN for T <= 0
#[allow(non_snake_case)]
pub fn gibbs_energy(coeffs: &SpeciesCoeffs, T: f64) -> f64 {
    if !(T > 0.0) {
        return f64::NAN;
    }
    let f = &coeffs.f;
    let x = T / 1e4;
    coeffs.h - T * (f[0] + f[1] * x.ln() + (f[2] / x + f[3]) / x + (f[4] + (f[5] + f[6] * x) * x) * x)
}

/// closure T -> G(T) for species
pub fn gibbs_fun(coeffs: &SpeciesCoeffs) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
    let coeffs = coeffs.clone();
    Box::new(move |t: f64| gibbs_energy(&coeffs, t))
}

/// Builds formula of K according to general formula type: K = exp(-sum(k*G_x)/RT) * P_A^n
///  K1 for 2AlCl + H2 = 2Al + 2HCl:
/// ```rust, ignore
/// let K1 = KBuilder::new(-1.0)
///     .plus(2, "Al")?
///     .plus(2, "HCl")?
///     .minus(2, "AlCl")?
///     .minus(1, "H2")?
///     .build(&registry)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct KBuilder {
    /// power of P_A in formula of K
    p_power: f64,
    /// species -> coefficient with which G_x is encountered in formula
    terms: Vec<(String, i32)>,
}

impl KBuilder {
    /// formula with no G_x addend, only with power of P_A
    pub fn new(p_power: f64) -> Self {
        Self {
            p_power,
            terms: Vec::new(),
        }
    }

    /// add an addend "k * G_x" with sign "+". A species may be added only once
    pub fn plus(mut self, coef: i32, species: &str) -> Result<Self, ThermoError> {
        let key = species.to_uppercase();
        if self.terms.iter().any(|(s, _)| *s == key) {
            return Err(ThermoError::DuplicateReactant {
                species: species.to_string(),
            });
        }
        self.terms.push((key, coef));
        Ok(self)
    }

    /// add an addend "k * G_x" with sign "-"
    pub fn minus(self, coef: i32, species: &str) -> Result<Self, ThermoError> {
        self.plus(-coef, species)
    }

    /// resolves species in the registry, fails on unknown species
    pub fn build(self, registry: &SpeciesRegistry) -> Result<EquilibriumConstant, ThermoError> {
        let terms = self
            .terms
            .iter()
            .map(|(species, coef)| Ok((registry.coefficients(species)?.clone(), *coef)))
            .collect::<Result<Vec<_>, ThermoError>>()?;
        Ok(EquilibriumConstant {
            p_power: self.p_power,
            terms,
        })
    }
}

/// equilibrium constant of one reaction, species coefficients resolved
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumConstant {
    pub p_power: f64,
    pub terms: Vec<(SpeciesCoeffs, i32)>,
}

#[allow(non_snake_case)]
impl EquilibriumConstant {
    /// dG(T) = sum(nu_x*G_x(T)), J/mol
    pub fn delta_G(&self, T: f64) -> f64 {
        self.terms
            .iter()
            .map(|(coeffs, nu)| *nu as f64 * gibbs_energy(coeffs, T))
            .sum()
    }

    /// K(T) in Pa^n. NaN for T <= 0
    pub fn K(&self, T: f64) -> f64 {
        let K = (-self.delta_G(T) / R / T).exp() * P_A.powf(self.p_power);
        if K.is_nan() {
            warn!("equilibrium constant of {} is not available at T = {}", self, T);
        }
        K
    }

    /// closure T -> K(T)
    pub fn K_fun(&self) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
        let this = self.clone();
        Box::new(move |t: f64| this.K(t))
    }
}

impl fmt::Display for EquilibriumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reactants: Vec<String> = self
            .terms
            .iter()
            .filter(|(_, nu)| *nu < 0)
            .map(|(c, nu)| format_term(-nu, &c.name))
            .collect();
        let products: Vec<String> = self
            .terms
            .iter()
            .filter(|(_, nu)| *nu > 0)
            .map(|(c, nu)| format_term(*nu, &c.name))
            .collect();
        write!(f, "{} = {}", reactants.join(" + "), products.join(" + "))
    }
}

fn format_term(nu: i32, name: &str) -> String {
    if nu == 1 {
        name.to_string()
    } else {
        format!("{}{}", nu, name)
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::Thermodynamics::DBhandlers::HVPEdata::{SpeciesRegistry, hvpe_registry};
    use approx::assert_relative_eq;

    #[test]
    fn test_gibbs_by_hand() {
        let coeffs = SpeciesCoeffs::from_params(
            "test",
            &[-1000.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 10.0],
        )
        .unwrap();
        let T: f64 = 500.0;
        let x = T / 1e4;
        let expected = -1000.0
            - T * (1.0 + 2.0 * x.ln() + (3.0 / x + 4.0) / x + (5.0 + (6.0 + 7.0 * x) * x) * x);
        assert_relative_eq!(gibbs_energy(&coeffs, T), expected, max_relative = 1e-14);
        assert_relative_eq!(gibbs_fun(&coeffs)(T), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_gibbs_domain() {
        let hcl = hvpe_registry().coefficients("HCl").unwrap();
        assert!(gibbs_energy(hcl, 0.0).is_nan());
        assert!(gibbs_energy(hcl, -300.0).is_nan());
        assert!(gibbs_energy(hcl, f64::NAN).is_nan());
        assert!(gibbs_energy(hcl, 300.0).is_finite());
    }

    #[test]
    fn test_single_product_K() {
        // degenerate reaction: only one product with coefficient +1 and n = 0
        let registry = hvpe_registry();
        let K = KBuilder::new(0.0).plus(1, "AlCl3").unwrap().build(registry).unwrap();
        let G = registry.gibbs_fun("AlCl3").unwrap();
        for T in [600.0, 900.0, 1373.0] {
            assert_eq!(K.K(T), (-G(T) / R / T).exp());
        }
    }

    #[test]
    fn test_pressure_power() {
        let registry = hvpe_registry();
        let K0 = KBuilder::new(0.0).plus(1, "HCl").unwrap().build(registry).unwrap();
        let K1 = KBuilder::new(1.0).plus(1, "HCl").unwrap().build(registry).unwrap();
        assert_relative_eq!(K1.K(800.0), K0.K(800.0) * 1e5, max_relative = 1e-12);
    }

    #[test]
    fn test_duplicate_reactant() {
        let res = KBuilder::new(0.0)
            .plus(1, "HCl")
            .and_then(|b| b.minus(2, "hcl"));
        assert_eq!(
            res.unwrap_err(),
            ThermoError::DuplicateReactant {
                species: "hcl".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_species_in_build() {
        let registry = SpeciesRegistry::hvpe().unwrap();
        let res = KBuilder::new(0.0).plus(1, "InCl").unwrap().build(&registry);
        assert!(matches!(res, Err(ThermoError::UnknownSpecies(name)) if name == "InCl"));
    }

    #[test]
    fn test_delta_G_and_display() {
        let registry = hvpe_registry();
        let K1 = registry.K(1).unwrap();
        let G = |s: &str| registry.gibbs_fun(s).unwrap()(900.0);
        let expected = 2.0 * G("Al") + 2.0 * G("HCl") - 2.0 * G("AlCl") - G("H2");
        assert_relative_eq!(K1.delta_G(900.0), expected, max_relative = 1e-12);
        assert_eq!(format!("{}", K1), "2AlCl + H2 = 2Al + 2HCl");
        assert_relative_eq!(K1.K_fun()(900.0), K1.K(900.0));
    }
}
