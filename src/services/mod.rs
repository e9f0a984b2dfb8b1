// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod generator;
pub mod refresh_service;

pub use generator::*;
pub use refresh_service::*;
