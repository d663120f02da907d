use super::cli_main::get_user_input;
use crate::Examples::hvpe_examples::hvpe_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Al-Cl-H source: sweep over T");
        println!("2. Ga-Cl-H source: sweep over T");
        println!("3. AlGaN deposition: sweep over x^g");
        println!("4. Equilibrium constants and diffusion coefficients");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => hvpe_examples(0),
            "2" => hvpe_examples(1),
            "3" => hvpe_examples(2),
            "4" => hvpe_examples(3),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
