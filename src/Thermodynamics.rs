/// equilibrium systems of the HVPE process, their solution and deposition rates
pub mod ChemEquilibrium;
#[allow(non_snake_case)]
/// species coefficient tables and transport data
pub mod DBhandlers;
/// Gibbs free energies of species and equilibrium constants of reactions
/// # Examples
/// ```
/// use HVPEq::Thermodynamics::DBhandlers::HVPEdata::hvpe_registry;
/// use HVPEq::Thermodynamics::dG_dS::KBuilder;
/// let registry = hvpe_registry();
/// // 2AlCl + H2 = 2Al + 2HCl
/// let K1 = KBuilder::new(-1.0)
///     .plus(2, "Al").unwrap()
///     .plus(2, "HCl").unwrap()
///     .minus(2, "AlCl").unwrap()
///     .minus(1, "H2").unwrap()
///     .build(registry)
///     .unwrap();
/// assert_eq!(K1.to_string(), "2AlCl + H2 = 2Al + 2HCl");
/// assert!(K1.K(900.0) > 0.0);
/// assert!(K1.K(-1.0).is_nan());
/// ```
pub mod dG_dS;
