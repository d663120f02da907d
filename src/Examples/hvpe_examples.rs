use crate::Thermodynamics::ChemEquilibrium::EquationSystems::{
    Scenario, ScenarioParameters, build_equilibrium_system,
};
use crate::Thermodynamics::ChemEquilibrium::deposition::solve_and_report;
use crate::Thermodynamics::DBhandlers::HVPEdata::hvpe_registry;
use prettytable::{Cell, Row, Table};

#[allow(non_snake_case)]
pub fn hvpe_examples(task: usize) {
    let registry = hvpe_registry();
    match task {
        0 | 1 => {
            let scenario = if task == 0 {
                Scenario::AlClH
            } else {
                Scenario::GaClH
            };
            // curried solver: T -> solution
            let solver = match build_equilibrium_system(
                registry,
                scenario,
                ScenarioParameters::default(),
                scenario.default_initial_guess(),
                scenario.default_tolerance(),
                10000,
            ) {
                Ok(solver) => solver,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            let mut header = vec![Cell::new("T, K")];
            header.extend(scenario.unknowns().iter().map(|s| Cell::new(s)));
            header.push(Cell::new("status"));
            let mut table = Table::new();
            table.add_row(Row::new(header));
            for i in 0..=6 {
                let T = 800.0 + 50.0 * i as f64;
                let mut row = vec![Cell::new(&T.to_string())];
                match solver(T) {
                    Ok(solution) => {
                        row.extend(solution.x.iter().map(|p| Cell::new(&format!("{:.4e}", p))));
                        row.push(Cell::new(&format!("{:?}", solution.status)));
                    }
                    Err(e) => row.push(Cell::new(&e.to_string())),
                }
                table.add_row(Row::new(row));
            }
            table.printstd();
        }
        2 => {
            for h2_portion in [0.0, 0.1] {
                println!("\nAlGaN at 1373 K, H2 portion in carrier {}", h2_portion);
                let params = ScenarioParameters {
                    h2_portion,
                    ..ScenarioParameters::default()
                };
                let mut table = Table::new();
                table.add_row(Row::new(vec![
                    Cell::new("x^g"),
                    Cell::new("x"),
                    Cell::new("V, nm/s"),
                    Cell::new("status"),
                ]));
                for i in 1..10 {
                    let x_g = 0.1 * i as f64;
                    let report = solve_and_report(
                        registry,
                        Scenario::AlGaN,
                        &params,
                        x_g,
                        &Scenario::AlGaN.default_initial_guess(),
                        1e-8,
                        10000,
                    );
                    match report {
                        Ok(r) => table.add_row(Row::new(vec![
                            Cell::new(&format!("{:.1}", x_g)),
                            Cell::new(&format!("{:.4}", r.solution.x[5])),
                            Cell::new(&format!("{:.4}", r.growth_rate)),
                            Cell::new(&format!("{:?}", r.solution.status)),
                        ])),
                        Err(e) => table.add_row(Row::new(vec![
                            Cell::new(&format!("{:.1}", x_g)),
                            Cell::new(&e.to_string()),
                        ])),
                    };
                }
                table.printstd();
            }
        }
        3 => {
            for T in [900.0, 1373.0] {
                println!("\nT = {} K", T);
                registry.pretty_print(T);
            }
        }
        _ => println!("no such example"),
    }
}
