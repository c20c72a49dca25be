pub mod configuration;
pub mod domain;
pub mod orchestrator;
pub mod repository;
pub mod retention;
pub mod startup;
pub mod telemetry;
pub mod utils;
