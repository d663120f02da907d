/// sweeps over the scenarios printed as tables
pub mod hvpe_examples;
