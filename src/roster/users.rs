// src/roster/users.rs — Dashboard users (viewing identities, not employees)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EmployeeId;

pub type UserId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Employee,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "Higher Management")]
    HigherManagement,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Manager => "Manager",
            Role::Employee => "Employee",
            Role::Hr => "HR",
            Role::HigherManagement => "Higher Management",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    /// Own employee record (Employee role).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    /// Direct reports (Manager role).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manages_ids: Vec<EmployeeId>,
}
