use super::cli_examples::examples_menu;
use crate::Thermodynamics::ChemEquilibrium::EquationSystems::Scenario;
use crate::Thermodynamics::DBhandlers::HVPEdata::hvpe_registry;
use crate::Utils::load_from_file::{HVPETask, LoadData};
use log::error;
use std::io::{self, Write};

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => scenario_menu(),
            "2" => task_from_file(),
            "3" => write_task_template(),
            "4" => data_tables(),
            "5" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - prompts

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to HVPEq: chemical equilibrium of Al/Ga-Cl-NH3-H2 vapor-phase epitaxy \n \x1b[0m"
    );
    println!("\x1b[33m1. Solve scenario with default parameters\x1b[0m");
    println!("\x1b[33m2. Solve task from JSON file\x1b[0m");
    println!("\x1b[33m3. Write task template to JSON file\x1b[0m");
    println!("\x1b[33m4. Thermodynamic and transport data\x1b[0m");
    println!("\x1b[33m5. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ");
}

fn scenario_menu() {
    println!("\n=== Scenario ===");
    for (i, scenario) in Scenario::all().iter().enumerate() {
        println!("{}. {} (unknowns {:?})", i + 1, scenario, scenario.unknowns());
    }
    prompt("Enter your choice: ");
    let scenario = match get_user_input().trim() {
        "1" => Scenario::AlClH,
        "2" => Scenario::GaClH,
        "3" => Scenario::AlGaN,
        _ => {
            println!("Invalid choice.");
            return;
        }
    };
    let mut task = HVPETask::new(scenario);
    prompt(&format!(
        "Enter {} (empty for {}): ",
        scenario.sweep_input_name(),
        task.sweep_input()
    ));
    let input = get_user_input();
    if !input.trim().is_empty() {
        match input.trim().parse::<f64>() {
            Ok(value) => task.sweep_input = Some(value),
            Err(e) => {
                println!("Invalid number: {}", e);
                return;
            }
        }
    }
    solve_task(&task);
}

fn task_from_file() {
    prompt("Enter path to JSON file: ");
    let path = get_user_input();
    match LoadData::new(path.trim().to_string()).load_task() {
        Ok(task) => solve_task(&task),
        Err(e) => println!("Failed to load task: {}", e),
    }
}

fn write_task_template() {
    prompt("Enter path to JSON file: ");
    let path = get_user_input();
    let loader = LoadData::new(path.trim().to_string());
    for scenario in Scenario::all() {
        println!("{}. {}", scenario as usize + 1, scenario);
    }
    prompt("Scenario: ");
    let scenario = match get_user_input().trim() {
        "2" => Scenario::GaClH,
        "3" => Scenario::AlGaN,
        _ => Scenario::AlClH,
    };
    match loader.save_task(&HVPETask::new(scenario)) {
        Ok(()) => println!("Template written to {}", loader.file_name),
        Err(e) => println!("Failed to write template: {}", e),
    }
}

fn data_tables() {
    prompt("Enter T, K: ");
    match get_user_input().trim().parse::<f64>() {
        Ok(t) => hvpe_registry().pretty_print(t),
        Err(e) => println!("Invalid number: {}", e),
    }
}

fn solve_task(task: &HVPETask) {
    match task.solve(hvpe_registry()) {
        Ok(report) => report.pretty_print(),
        Err(e) => {
            error!("{}", e);
            println!("Failed to solve: {}", e);
        }
    }
}

fn prompt(text: &str) {
    print!("\x1b[36m{}\x1b[0m", text);
    let _ = io::stdout().flush();
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("Failed to read input: {}", e);
    }
    input
}
