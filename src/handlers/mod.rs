// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod pois;

pub use health::config as health_config;
pub use pois::config as pois_config;
