#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Numerical;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
