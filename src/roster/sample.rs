// src/roster/sample.rs — Bundled demo roster
//
// Used when no roster path is configured, and by tests.

use super::loader::{parse_roster, RosterData};
use super::Roster;
use crate::infra::errors::RosterError;

const SAMPLE_ROSTER: &str = include_str!("../../data/roster.json");

pub fn data() -> Result<RosterData, RosterError> {
    parse_roster(SAMPLE_ROSTER)
}

pub fn roster() -> Result<Roster, RosterError> {
    Ok(Roster::new(data()?))
}
