// src/roster/loader.rs — Roster ingestion and validation
//
// Scores and ratings are range-checked here so the score engine can treat
// its input as valid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::{Answer, Employee, User};
use crate::infra::errors::RosterError;

/// Raw roster document: `{ "employees": [...], "users": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterData {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub users: Vec<User>,
}

const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

pub fn load_roster(path: &Path) -> Result<RosterData, RosterError> {
    let content = std::fs::read_to_string(path)?;
    let data = parse_roster(&content)?;
    tracing::debug!(
        "Loaded roster from {} ({} employees, {} users)",
        path.display(),
        data.employees.len(),
        data.users.len()
    );
    Ok(data)
}

pub fn parse_roster(json: &str) -> Result<RosterData, RosterError> {
    let data: RosterData = serde_json::from_str(json)?;
    validate(&data)?;
    Ok(data)
}

pub fn validate(data: &RosterData) -> Result<(), RosterError> {
    let mut ids = HashSet::new();
    for employee in &data.employees {
        if !ids.insert(employee.id) {
            return Err(RosterError::DuplicateEmployee(employee.id));
        }
        validate_employee(employee)?;
    }

    for user in &data.users {
        let refs = user.employee_id.iter().chain(user.manages_ids.iter());
        for employee_id in refs {
            if !ids.contains(employee_id) {
                return Err(RosterError::UnknownReference {
                    user_id: user.id,
                    employee_id: *employee_id,
                });
            }
        }
    }

    for employee in &data.employees {
        if let Some(manager) = employee.manager_id {
            let known = ids.contains(&manager) || data.users.iter().any(|u| u.id == manager);
            if !known {
                tracing::warn!(
                    "Employee {} references manager {} who is not in the roster",
                    employee.id,
                    manager
                );
            }
        }
    }

    Ok(())
}

pub fn validate_employee(employee: &Employee) -> Result<(), RosterError> {
    if let Some(rating) = employee.training_effectiveness {
        if !RATING_RANGE.contains(&rating) {
            return Err(RosterError::RatingOutOfRange {
                employee_id: employee.id,
                rating,
            });
        }
    }

    let mut seen = HashSet::new();
    for record in &employee.proficiency {
        if !seen.insert(record.perimeter) {
            return Err(RosterError::DuplicatePerimeter {
                employee_id: employee.id,
                perimeter: record.perimeter,
            });
        }
        if !RATING_RANGE.contains(&record.score) {
            return Err(RosterError::ScoreOutOfRange {
                employee_id: employee.id,
                perimeter: record.perimeter,
                score: record.score,
            });
        }

        let mut bad_answer = None;
        for question in &record.questions {
            question.walk(&mut |q| {
                if let Answer::Rating(r) = q.answer {
                    if bad_answer.is_none() && !RATING_RANGE.contains(&r) {
                        bad_answer = Some((q.id.clone(), r));
                    }
                }
            });
        }
        if let Some((question_id, rating)) = bad_answer {
            return Err(RosterError::AnswerOutOfRange {
                employee_id: employee.id,
                question_id,
                rating,
            });
        }
    }

    Ok(())
}
