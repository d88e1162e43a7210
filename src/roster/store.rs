// src/roster/store.rs — In-memory roster shared across views

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::loader::RosterData;
use super::{Employee, EmployeeId, User, UserId};
use crate::infra::errors::RosterError;

/// Employees and users for one application session.
///
/// Employee data is read-only apart from the training-effectiveness rating,
/// which HR may change at runtime.
pub struct Roster {
    employees: RwLock<Vec<Employee>>,
    users: Vec<User>,
}

impl Roster {
    pub fn new(data: RosterData) -> Self {
        Self {
            employees: RwLock::new(data.employees),
            users: data.users,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Employee>> {
        self.employees
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Employee>> {
        self.employees
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.read().clone()
    }

    pub fn employee(&self, id: EmployeeId) -> Option<Employee> {
        self.read().iter().find(|e| e.id == id).cloned()
    }

    /// Employees with the given ids, in roster order. Unknown ids are skipped.
    pub fn cohort(&self, ids: &[EmployeeId]) -> Vec<Employee> {
        self.read()
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect()
    }

    pub fn managed_by(&self, user: &User) -> Vec<Employee> {
        self.cohort(&user.manages_ids)
    }

    pub fn by_role(&self, role: &str) -> Vec<Employee> {
        self.read()
            .iter()
            .filter(|e| e.role == role)
            .cloned()
            .collect()
    }

    pub fn roles(&self) -> Vec<String> {
        super::distinct_roles(&self.read())
    }

    /// Case-insensitive substring match on name or role.
    pub fn search(&self, term: &str) -> Vec<Employee> {
        let needle = term.to_lowercase();
        self.read()
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle) || e.role.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn set_training_effectiveness(
        &self,
        id: EmployeeId,
        rating: u8,
    ) -> Result<(), RosterError> {
        if !(1..=5).contains(&rating) {
            return Err(RosterError::RatingOutOfRange {
                employee_id: id,
                rating,
            });
        }
        let mut employees = self.write();
        let employee = employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RosterError::UnknownEmployee(id))?;
        employee.training_effectiveness = Some(rating);
        tracing::info!("Training effectiveness for employee {id} set to {rating}");
        Ok(())
    }
}
