// src/views/mod.rs — Role dispatch at the presentation boundary
//
// The engines below this layer never look at roles. A `Viewer` is resolved
// once per request and decides which payload, recommendation lists and
// edit rights the caller gets.

use serde::Serialize;

use crate::analysis::{Analysis, Recommendations};
use crate::export;
use crate::infra::errors::ViewError;
use crate::roster::{distinct_roles, Employee, EmployeeId, Role, Roster, User, UserId};
use crate::scoring::aggregate::{
    self, PerimeterAverage, ProgramEffectiveness, StatusDistribution, TrainerSummary,
};
use crate::scoring::{assess, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Manager {
        user_id: UserId,
        manages: Vec<EmployeeId>,
    },
    Employee {
        user_id: UserId,
        employee_id: EmployeeId,
    },
    Hr {
        user_id: UserId,
    },
    HigherManagement {
        user_id: UserId,
    },
}

impl Viewer {
    pub fn from_user(user: &User) -> Result<Self, ViewError> {
        Ok(match user.role {
            Role::Manager => Viewer::Manager {
                user_id: user.id,
                manages: user.manages_ids.clone(),
            },
            Role::Employee => Viewer::Employee {
                user_id: user.id,
                employee_id: user
                    .employee_id
                    .ok_or(ViewError::MissingEmployeeRecord(user.id))?,
            },
            Role::Hr => Viewer::Hr { user_id: user.id },
            Role::HigherManagement => Viewer::HigherManagement { user_id: user.id },
        })
    }

    pub fn user_id(&self) -> UserId {
        match self {
            Viewer::Manager { user_id, .. }
            | Viewer::Employee { user_id, .. }
            | Viewer::Hr { user_id }
            | Viewer::HigherManagement { user_id } => *user_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Viewer::Manager { .. } => Role::Manager,
            Viewer::Employee { .. } => Role::Employee,
            Viewer::Hr { .. } => Role::Hr,
            Viewer::HigherManagement { .. } => Role::HigherManagement,
        }
    }

    /// Managers see their reports, employees see themselves, HR and
    /// higher management see everyone.
    pub fn can_view(&self, employee_id: EmployeeId) -> bool {
        match self {
            Viewer::Manager { manages, .. } => manages.contains(&employee_id),
            Viewer::Employee {
                employee_id: own, ..
            } => *own == employee_id,
            Viewer::Hr { .. } | Viewer::HigherManagement { .. } => true,
        }
    }

    pub fn can_edit_steps(&self) -> bool {
        matches!(self, Viewer::Manager { .. } | Viewer::Hr { .. })
    }

    pub fn can_rate_training(&self) -> bool {
        matches!(self, Viewer::Hr { .. })
    }

    pub fn can_request_action_plan(&self) -> bool {
        matches!(self, Viewer::Manager { .. } | Viewer::Hr { .. })
    }

    /// Err(Forbidden) unless `allowed`.
    pub fn require(&self, allowed: bool, action: &'static str) -> Result<(), ViewError> {
        if allowed {
            Ok(())
        } else {
            Err(ViewError::Forbidden {
                role: self.role(),
                action,
            })
        }
    }

    /// The recommendation lists this viewer is shown. Lists outside the
    /// viewer's scope come back empty.
    pub fn visible_recommendations(&self, analysis: &Analysis) -> Recommendations {
        let all = &analysis.recommendations;
        match self {
            Viewer::Manager { .. } | Viewer::HigherManagement { .. } => all.clone(),
            Viewer::Employee { .. } => Recommendations {
                employee: all.employee.clone(),
                ..Default::default()
            },
            Viewer::Hr { .. } => Recommendations {
                hr: all.hr.clone(),
                ..Default::default()
            },
        }
    }

    /// `analysis` with recommendations narrowed to this viewer.
    pub fn scope_analysis(&self, analysis: &Analysis) -> Analysis {
        Analysis {
            recommendations: self.visible_recommendations(analysis),
            ..analysis.clone()
        }
    }
}

// ─── Dashboards ─────────────────────────────────────────────

/// One row in a roster listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEmployee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    pub training: String,
    pub overall_score: u32,
    pub status: Status,
}

impl From<&Employee> for ScoredEmployee {
    fn from(employee: &Employee) -> Self {
        let (overall_score, status) = assess(employee);
        Self {
            id: employee.id,
            name: employee.name.clone(),
            role: employee.role.clone(),
            training: employee.training.clone(),
            overall_score,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub team: Vec<ScoredEmployee>,
    /// Job roles present in the team, for the team-comparison picker.
    pub roles: Vec<String>,
    pub distribution: StatusDistribution,
    pub perimeter_averages: Vec<PerimeterAverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub employee: Employee,
    pub overall_score: u32,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrDashboard {
    pub distribution: StatusDistribution,
    pub employees: Vec<ScoredEmployee>,
    pub programs: Vec<ProgramEffectiveness>,
    pub trainers: Vec<TrainerSummary>,
    pub retraining: Vec<ScoredEmployee>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgOverview {
    pub distribution: StatusDistribution,
    pub perimeter_averages: Vec<PerimeterAverage>,
    pub programs: Vec<ProgramEffectiveness>,
    pub trainers: Vec<TrainerSummary>,
    pub retraining_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum Dashboard {
    Manager(ManagerDashboard),
    Employee(EmployeeDashboard),
    Hr(HrDashboard),
    HigherManagement(OrgOverview),
}

/// Resolve `user_id` and build the dashboard for their role.
pub fn build_dashboard(roster: &Roster, user_id: UserId) -> Result<Dashboard, ViewError> {
    let user = roster.user(user_id).ok_or(ViewError::UnknownUser(user_id))?;
    let viewer = Viewer::from_user(user)?;
    tracing::debug!("Building {} dashboard for user {user_id}", viewer.role());
    dashboard_for(roster, &viewer)
}

pub fn dashboard_for(roster: &Roster, viewer: &Viewer) -> Result<Dashboard, ViewError> {
    let dashboard = match viewer {
        Viewer::Manager { manages, .. } => {
            let team = roster.cohort(manages);
            Dashboard::Manager(ManagerDashboard {
                roles: distinct_roles(&team),
                distribution: aggregate::status_distribution(&team),
                perimeter_averages: aggregate::perimeter_averages(&team),
                team: team.iter().map(ScoredEmployee::from).collect(),
            })
        }
        Viewer::Employee {
            user_id,
            employee_id,
        } => {
            let employee = roster
                .employee(*employee_id)
                .ok_or(ViewError::MissingEmployeeRecord(*user_id))?;
            let (overall_score, status) = assess(&employee);
            Dashboard::Employee(EmployeeDashboard {
                employee,
                overall_score,
                status,
            })
        }
        Viewer::Hr { .. } => {
            let employees = roster.employees();
            Dashboard::Hr(HrDashboard {
                distribution: aggregate::status_distribution(&employees),
                programs: aggregate::training_effectiveness_by_program(&employees),
                trainers: aggregate::trainer_analytics(&employees),
                retraining: aggregate::retraining_candidates(&employees)
                    .into_iter()
                    .map(ScoredEmployee::from)
                    .collect(),
                employees: employees.iter().map(ScoredEmployee::from).collect(),
            })
        }
        Viewer::HigherManagement { .. } => {
            let employees = roster.employees();
            Dashboard::HigherManagement(OrgOverview {
                distribution: aggregate::status_distribution(&employees),
                perimeter_averages: aggregate::perimeter_averages(&employees),
                programs: aggregate::training_effectiveness_by_program(&employees),
                trainers: aggregate::trainer_analytics(&employees),
                retraining_count: aggregate::retraining_candidates(&employees).len(),
            })
        }
    };
    Ok(dashboard)
}

// ─── Cohorts ────────────────────────────────────────────────

/// A group of employees picked by id list or job role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cohort {
    All,
    Ids(Vec<EmployeeId>),
    Role(String),
}

impl Cohort {
    /// `ids` wins over `role`; neither selects everyone.
    pub fn from_parts(ids: Option<Vec<EmployeeId>>, role: Option<String>) -> Self {
        match (ids, role) {
            (Some(ids), _) => Cohort::Ids(ids),
            (None, Some(role)) => Cohort::Role(role),
            (None, None) => Cohort::All,
        }
    }

    pub fn resolve(&self, roster: &Roster) -> Vec<Employee> {
        match self {
            Cohort::All => roster.employees(),
            Cohort::Ids(ids) => roster.cohort(ids),
            Cohort::Role(role) => roster.by_role(role),
        }
    }

    /// CSV file name for an export of `members`.
    pub fn export_file_name(&self, members: &[Employee]) -> String {
        match (self, members) {
            (Cohort::Role(role), _) => export::file_name("team-comparison", role),
            (_, [single]) => export::file_name("proficiency-report", &single.name),
            _ => export::file_name("proficiency-report", "all"),
        }
    }
}

/// Parse `"1, 2,3"` into ids.
pub fn parse_ids(raw: &str) -> Result<Vec<EmployeeId>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Aggregate statistics for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortStats {
    pub distribution: StatusDistribution,
    pub perimeter_averages: Vec<PerimeterAverage>,
    pub programs: Vec<ProgramEffectiveness>,
    pub trainers: Vec<TrainerSummary>,
    pub retraining: Vec<ScoredEmployee>,
}

pub fn cohort_stats(employees: &[Employee]) -> CohortStats {
    CohortStats {
        distribution: aggregate::status_distribution(employees),
        perimeter_averages: aggregate::perimeter_averages(employees),
        programs: aggregate::training_effectiveness_by_program(employees),
        trainers: aggregate::trainer_analytics(employees),
        retraining: aggregate::retraining_candidates(employees)
            .into_iter()
            .map(ScoredEmployee::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::sample;
    use pretty_assertions::assert_eq;

    fn analysis() -> Analysis {
        Analysis {
            title: "Key Strategies & Real Solutions".into(),
            message: "Needs more practice.".into(),
            root_cause: Some("Few chances to apply the training.".into()),
            recommendations: Recommendations {
                manager: vec!["Assign a pilot project".into()],
                employee: vec!["Run one retro per sprint".into()],
                hr: vec!["Offer a refresher".into()],
            },
        }
    }

    fn viewer(roster: &Roster, id: UserId) -> Viewer {
        Viewer::from_user(roster.user(id).unwrap()).unwrap()
    }

    #[test]
    fn test_recommendations_scoped_by_role() {
        let roster = sample::roster().unwrap();
        let a = analysis();

        let manager = viewer(&roster, 101).visible_recommendations(&a);
        assert_eq!(manager, a.recommendations);

        let employee = viewer(&roster, 2).visible_recommendations(&a);
        assert_eq!(employee.employee, a.recommendations.employee);
        assert!(employee.manager.is_empty() && employee.hr.is_empty());

        let hr = viewer(&roster, 201).visible_recommendations(&a);
        assert_eq!(hr.hr, a.recommendations.hr);
        assert!(hr.manager.is_empty() && hr.employee.is_empty());

        let exec = viewer(&roster, 301).visible_recommendations(&a);
        assert_eq!(exec, a.recommendations);
    }

    #[test]
    fn test_permissions() {
        let roster = sample::roster().unwrap();
        let manager = viewer(&roster, 101);
        let employee = viewer(&roster, 2);
        let hr = viewer(&roster, 201);
        let exec = viewer(&roster, 301);

        assert!(manager.can_edit_steps() && hr.can_edit_steps());
        assert!(!employee.can_edit_steps() && !exec.can_edit_steps());
        assert!(hr.can_rate_training());
        assert!(!manager.can_rate_training());
        assert!(manager.can_request_action_plan());
        assert!(!employee.can_request_action_plan());
        assert_eq!(
            employee.require(employee.can_edit_steps(), "edit action steps"),
            Err(ViewError::Forbidden {
                role: Role::Employee,
                action: "edit action steps"
            })
        );
    }

    #[test]
    fn test_manager_sees_only_reports() {
        let roster = sample::roster().unwrap();
        let manager = viewer(&roster, 101);
        assert!(manager.can_view(1));
        assert!(!manager.can_view(2));
        assert!(viewer(&roster, 201).can_view(2));
    }

    #[test]
    fn test_employee_without_record_is_rejected() {
        let user = User {
            id: 9,
            name: "Orphan".into(),
            role: Role::Employee,
            employee_id: None,
            manages_ids: Vec::new(),
        };
        assert_eq!(
            Viewer::from_user(&user),
            Err(ViewError::MissingEmployeeRecord(9))
        );
    }

    #[test]
    fn test_manager_dashboard() {
        let roster = sample::roster().unwrap();
        let Dashboard::Manager(d) = build_dashboard(&roster, 101).unwrap() else {
            panic!("expected manager dashboard");
        };
        let ids: Vec<EmployeeId> = d.team.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(d.roles, vec!["Data Analyst".to_string()]);
        assert_eq!(d.distribution.pct_excelling, 100);

        let Dashboard::Manager(d) = build_dashboard(&roster, 102).unwrap() else {
            panic!("expected manager dashboard");
        };
        assert_eq!(d.roles, vec!["Junior Project Coordinator", "Team Lead"]);
    }

    #[test]
    fn test_hr_dashboard_lists_retraining() {
        let roster = sample::roster().unwrap();
        let Dashboard::Hr(d) = build_dashboard(&roster, 201).unwrap() else {
            panic!("expected HR dashboard");
        };
        assert_eq!(d.employees.len(), 5);
        let retraining: Vec<&str> = d.retraining.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(retraining, vec!["John Davis"]);
        assert_eq!(d.trainers[0].trainer, "Priya Nair");
    }

    #[test]
    fn test_employee_dashboard_is_own_record() {
        let roster = sample::roster().unwrap();
        let Dashboard::Employee(d) = build_dashboard(&roster, 2).unwrap() else {
            panic!("expected employee dashboard");
        };
        assert_eq!(d.employee.name, "John Davis");
        assert_eq!(d.overall_score, 53);
        assert_eq!(d.status, Status::NeedsSupport);
    }

    #[test]
    fn test_dashboard_tagged_by_view() {
        let roster = sample::roster().unwrap();
        let json = serde_json::to_value(build_dashboard(&roster, 301).unwrap()).unwrap();
        assert_eq!(json["view"], "higherManagement");
        assert_eq!(json["retrainingCount"], 1);
    }

    #[test]
    fn test_unknown_user() {
        let roster = sample::roster().unwrap();
        assert_eq!(
            build_dashboard(&roster, 999),
            Err(ViewError::UnknownUser(999))
        );
    }

    #[test]
    fn test_cohort_resolution_and_file_names() {
        let roster = sample::roster().unwrap();
        let by_role = Cohort::from_parts(None, Some("Data Analyst".into()));
        let members = by_role.resolve(&roster);
        assert_eq!(members.len(), 2);
        assert_eq!(
            by_role.export_file_name(&members),
            "team-comparison-Data_Analyst.csv"
        );

        let single = Cohort::from_parts(Some(vec![2]), Some("ignored".into()));
        let members = single.resolve(&roster);
        assert_eq!(
            single.export_file_name(&members),
            "proficiency-report-John_Davis.csv"
        );
        assert_eq!(Cohort::All.resolve(&roster).len(), 5);
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_ids("").unwrap(), Vec::<EmployeeId>::new());
        assert!(parse_ids("1,x").is_err());
    }

    #[test]
    fn test_cohort_stats_for_sample() {
        let roster = sample::roster().unwrap();
        let stats = cohort_stats(&roster.employees());
        assert_eq!(stats.distribution.pct_excelling, 40);
        let programs: Vec<&str> = stats.programs.iter().map(|p| p.program.as_str()).collect();
        assert_eq!(
            programs,
            vec!["Agile Project Management", "Advanced Python for Data Science"]
        );
    }
}
