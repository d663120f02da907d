#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use crate::Numerical::NR::{NRError, NRStatus};
    use crate::Thermodynamics::ChemEquilibrium::EquationSystems::{
        AlGaNSystem, EquationSystem, EquilibriumError, Metal, MetalChlorideSystem, Scenario,
        ScenarioParameters, build_equilibrium_system, create_equation_system, solve_equation_system,
    };
    use crate::Thermodynamics::DBhandlers::HVPEdata::hvpe_registry;
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    /// central finite differences of the residuals
    fn numerical_jacobian(system: &dyn EquationSystem, x: &DVector<f64>) -> DMatrix<f64> {
        let n = x.len();
        let mut J = DMatrix::zeros(n, n);
        for j in 0..n {
            let h = 1e-6 * x[j].abs().max(1.0);
            let mut xp = x.clone();
            let mut xm = x.clone();
            xp[j] += h;
            xm[j] -= h;
            let df = (system.residuals(&xp) - system.residuals(&xm)) / (2.0 * h);
            for i in 0..n {
                J[(i, j)] = df[i];
            }
        }
        J
    }

    fn check_jacobian(system: &dyn EquationSystem, x: &DVector<f64>) {
        let analytic = system.jacobian(x);
        let numeric = numerical_jacobian(system, x);
        for i in 0..system.dim() {
            for j in 0..system.dim() {
                assert_relative_eq!(
                    analytic[(i, j)],
                    numeric[(i, j)],
                    epsilon = 1e-12,
                    max_relative = 1e-5
                );
            }
        }
    }

    #[test]
    fn test_metal_jacobian_vs_finite_differences() {
        let registry = hvpe_registry();
        let params = ScenarioParameters::default();
        let al = MetalChlorideSystem::new(registry, Metal::Al, 900.0, &params).unwrap();
        check_jacobian(&al, &DVector::from_vec(vec![40.0, 2.0, 6000.0, 0.2, 1500.0]));
        check_jacobian(&al, &DVector::from_vec(vec![50.0, 50.0, 50.0, 50.0, 500.0]));
        let ga = MetalChlorideSystem::new(registry, Metal::Ga, 1100.0, &params).unwrap();
        check_jacobian(&ga, &DVector::from_vec(vec![14000.0, 60.0, 3.0, 12.0, 1560.0]));
    }

    #[test]
    fn test_algan_jacobian_vs_finite_differences() {
        let registry = hvpe_registry();
        let system = AlGaNSystem::new(registry, 0.5, &ScenarioParameters::default()).unwrap();
        check_jacobian(&system, &DVector::from_vec(vec![0.5, 10.0, 1480.0, 30.0, 9000.0, 0.7]));
        check_jacobian(&system, &DVector::from_vec(vec![50.0, 50.0, 1300.0, 0.0, 100.0, 0.5]));
    }

    #[test]
    fn test_system_setup() {
        let registry = hvpe_registry();
        let params = ScenarioParameters::default();
        let al = create_equation_system(registry, Scenario::AlClH, &params, 900.0).unwrap();
        assert_eq!(al.dim(), 5);
        assert_eq!(al.temperature(), 900.0);
        assert_eq!(al.bulk_pressures(), &[0.0, 0.0, 0.0, 10000.0, 0.0]);
        assert_relative_eq!(al.diffusion_coefficients()[3], 5.038038e-4, max_relative = 1e-5);

        let algan = create_equation_system(registry, Scenario::AlGaN, &params, 0.25).unwrap();
        assert_eq!(algan.dim(), 6);
        assert_eq!(algan.temperature(), 1373.0);
        let pg = algan.bulk_pressures();
        assert_relative_eq!(pg[0], 7.5);
        assert_relative_eq!(pg[1], 22.5);
        assert_relative_eq!(pg[2], 1500.0);
        assert_relative_eq!(pg[4], 9847.0);
        assert_eq!(algan.growth_phases(), vec![(0, "AlN"), (1, "GaN")]);
    }

    #[test]
    fn test_AlClH_at_900() {
        let registry = hvpe_registry();
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlClH,
            ScenarioParameters::default(),
            vec![50.0, 50.0, 50.0, 50.0, 500.0],
            1e-5,
            10000,
        )
        .unwrap();
        let solution = solver(900.0).unwrap();
        assert_eq!(solution.status, NRStatus::Converged);
        assert!(solution.iterations < 10000);
        let x = &solution.x;
        assert!(x.iter().all(|p| *p > 0.0), "{:?}", x);
        assert_relative_eq!(x[0], 34.5144, max_relative = 1e-3);
        assert_relative_eq!(x[1], 1.42346, max_relative = 1e-3);
        assert_relative_eq!(x[2], 5967.68, max_relative = 1e-3);
        assert_relative_eq!(x[3], 0.118494, max_relative = 1e-3);
        assert_relative_eq!(x[4], 1561.35, max_relative = 1e-3);

        let system = create_equation_system(registry, Scenario::AlClH, &ScenarioParameters::default(), 900.0).unwrap();
        assert!(system.residuals(x).norm() < 1e-5);
        // Cl leaving the surface with the chlorides = Cl brought by HCl
        let D = system.diffusion_coefficients();
        let cl_out = D[0] * x[0] + 2.0 * D[1] * x[1] + 3.0 * D[2] * x[2];
        assert_relative_eq!(cl_out, D[3] * (10000.0 - x[3]), max_relative = 1e-8);
        // H from HCl leaves as H2
        assert_relative_eq!(2.0 * D[4] * x[4], D[3] * (10000.0 - x[3]), max_relative = 1e-8);
    }

    #[test]
    fn test_GaClH_at_1100() {
        let registry = hvpe_registry();
        let scenario = Scenario::GaClH;
        let solver = build_equilibrium_system(
            registry,
            scenario,
            ScenarioParameters::default(),
            scenario.default_initial_guess(),
            scenario.default_tolerance(),
            10000,
        )
        .unwrap();
        let solution = solver(1100.0).unwrap();
        assert!(solution.is_converged());
        let x = &solution.x;
        assert!(x.iter().all(|p| *p > 0.0), "{:?}", x);
        // GaCl dominates the gas phase over Ga
        assert_relative_eq!(x[0], 14244.3, max_relative = 1e-3);
        assert_relative_eq!(x[1], 63.3546, max_relative = 1e-3);
        assert_relative_eq!(x[2], 0.0402, max_relative = 1e-2);
        assert_relative_eq!(x[3], 11.8559, max_relative = 1e-3);
        assert_relative_eq!(x[4], 1559.52, max_relative = 1e-3);
    }

    #[test]
    fn test_GaClH_at_low_T() {
        let registry = hvpe_registry();
        let scenario = Scenario::GaClH;
        let solver = build_equilibrium_system(
            registry,
            scenario,
            ScenarioParameters::default(),
            scenario.default_initial_guess(),
            scenario.default_tolerance(),
            10000,
        )
        .unwrap();
        let solution = solver(700.0).unwrap();
        assert!(solution.is_converged());
        let x = &solution.x;
        assert!(x.iter().all(|p| *p > 0.0), "{:?}", x);
        // GaCl3 grows at low T
        assert_relative_eq!(x[0], 6457.57, max_relative = 1e-3);
        assert_relative_eq!(x[1], 3460.20, max_relative = 1e-3);
        assert_relative_eq!(x[2], 767.78, max_relative = 1e-3);
        assert_relative_eq!(x[4], 1559.43, max_relative = 1e-3);

        for T in [775.0, 800.0, 900.0, 1000.0] {
            let solution = solver(T).unwrap();
            assert!(solution.is_converged(), "T = {}: {:?}", T, solution.status);
            assert!(solution.x.iter().all(|p| *p > 0.0), "T = {}: {:?}", T, solution.x);
        }
    }

    #[test]
    fn test_not_available_temperature_is_not_finite() {
        let registry = hvpe_registry();
        for scenario in [Scenario::AlClH, Scenario::GaClH] {
            let solver = build_equilibrium_system(
                registry,
                scenario,
                ScenarioParameters::default(),
                scenario.default_initial_guess(),
                scenario.default_tolerance(),
                10000,
            )
            .unwrap();
            for T in [0.0, -100.0, f64::NAN] {
                let solution = solver(T).unwrap();
                assert_eq!(solution.status, NRStatus::NotFinite, "{} at T = {}", scenario, T);
                assert_eq!(solution.iterations, 0);
                assert_eq!(solution.x.as_slice(), scenario.default_initial_guess().as_slice());
            }
        }

        let params = ScenarioParameters {
            deposition_temperature: -5.0,
            ..ScenarioParameters::default()
        };
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlGaN,
            params,
            Scenario::AlGaN.default_initial_guess(),
            1e-8,
            10000,
        )
        .unwrap();
        let solution = solver(0.5).unwrap();
        assert_eq!(solution.status, NRStatus::NotFinite);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_AlClH_singular_at_700() {
        let registry = hvpe_registry();
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlClH,
            ScenarioParameters::default(),
            vec![50.0, 50.0, 50.0, 50.0, 500.0],
            1e-5,
            10000,
        )
        .unwrap();
        let res = solver(700.0);
        assert!(
            matches!(res, Err(EquilibriumError::Solver(NRError::SingularMatrix { .. }))),
            "{:?}",
            res
        );
    }

    #[test]
    fn test_sweep_points_fail_independently() {
        let registry = hvpe_registry();
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlClH,
            ScenarioParameters::default(),
            vec![50.0, 50.0, 50.0, 50.0, 500.0],
            1e-5,
            10000,
        )
        .unwrap();
        let results: Vec<_> = [0.0, 700.0, 900.0].iter().map(|T| solver(*T)).collect();
        assert!(matches!(
            &results[0],
            Ok(solution) if solution.status == NRStatus::NotFinite
        ));
        assert!(matches!(
            &results[1],
            Err(EquilibriumError::Solver(NRError::SingularMatrix { .. }))
        ));
        assert!(matches!(
            &results[2],
            Ok(solution) if solution.is_converged()
        ));
    }

    #[test]
    fn test_AlGaN_without_hydrogen() {
        let registry = hvpe_registry();
        let params = ScenarioParameters {
            h2_portion: 0.0,
            ..ScenarioParameters::default()
        };
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlGaN,
            params.clone(),
            Scenario::AlGaN.default_initial_guess(),
            1e-8,
            10000,
        )
        .unwrap();
        let solution = solver(0.5).unwrap();
        assert!(solution.is_converged());
        assert!(solution.iterations < 20);
        let v = &solution.x;
        assert_relative_eq!(v[1], 0.02555, max_relative = 1e-2);
        assert_relative_eq!(v[2], 1483.26, max_relative = 1e-3);
        assert_relative_eq!(v[3], 35.489, max_relative = 1e-3);
        assert_relative_eq!(v[4], 3.2535, max_relative = 1e-3);
        assert_relative_eq!(v[5], 0.4451, max_relative = 1e-3);
        let system = create_equation_system(registry, Scenario::AlGaN, &params, 0.5).unwrap();
        assert!(system.residuals(v).norm() < 1e-8);
    }

    #[test]
    fn test_AlGaN_hydrogen_increases_Al_fraction() {
        let registry = hvpe_registry();
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlGaN,
            ScenarioParameters::default(),
            Scenario::AlGaN.default_initial_guess(),
            1e-8,
            10000,
        )
        .unwrap();
        let solution = solver(0.5).unwrap();
        assert!(solution.is_converged());
        assert_relative_eq!(solution.x[1], 13.225, max_relative = 1e-3);
        assert_relative_eq!(solution.x[4], 9847.39, max_relative = 1e-3);
        assert_relative_eq!(solution.x[5], 0.8713, max_relative = 1e-3);

        // x grows with x^g
        let mut previous = 0.0;
        for x_g in [0.2, 0.5, 0.8] {
            let x = solver(x_g).unwrap().x[5];
            assert!(x > previous && x < 1.0, "x^g = {}: x = {}", x_g, x);
            previous = x;
        }
    }

    #[test]
    fn test_invalid_initial_guess() {
        let registry = hvpe_registry();
        let res = build_equilibrium_system(
            registry,
            Scenario::AlGaN,
            ScenarioParameters::default(),
            vec![50.0, 50.0, 50.0, 50.0, 500.0],
            1e-5,
            100,
        );
        assert!(matches!(
            res,
            Err(EquilibriumError::InvalidInitialGuess { expected: 6, found: 5, .. })
        ));
        let system =
            create_equation_system(registry, Scenario::AlClH, &ScenarioParameters::default(), 900.0).unwrap();
        assert!(solve_equation_system(system.as_ref(), &[1.0; 6], 1e-5, 100).is_err());
    }

    #[test]
    fn test_iteration_limit_is_a_status() {
        let registry = hvpe_registry();
        let solver = build_equilibrium_system(
            registry,
            Scenario::AlClH,
            ScenarioParameters::default(),
            vec![50.0, 50.0, 50.0, 50.0, 500.0],
            1e-5,
            3,
        )
        .unwrap();
        let solution = solver(900.0).unwrap();
        assert_eq!(solution.status, NRStatus::IterationLimitReached);
        assert_eq!(solution.iterations, 3);
        assert!(solution.x.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_scenario_names() {
        for scenario in Scenario::all() {
            let parsed: Scenario = scenario.to_string().parse().unwrap();
            assert_eq!(parsed, scenario);
            assert_eq!(scenario.default_initial_guess().len(), scenario.dim());
        }
        assert_eq!("algan".parse::<Scenario>().unwrap(), Scenario::AlGaN);
        assert!(matches!(
            "InGaN".parse::<Scenario>(),
            Err(EquilibriumError::UnknownScenario(_))
        ));
        assert_eq!(serde_json::to_string(&Scenario::GaClH).unwrap(), "\"GaClH\"");
        assert_eq!(Scenario::AlClH.unknowns()[2], "AlCl3");
    }
}
