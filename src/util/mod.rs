// Utility modules

pub mod output;
