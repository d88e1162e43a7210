// src/lib.rs — Library root for ProficiencyPro

pub mod analysis;
pub mod api;
pub mod cli;
pub mod export;
pub mod infra;
pub mod provider;
pub mod roster;
pub mod scoring;
pub mod views;
