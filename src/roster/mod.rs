// src/roster/mod.rs — Employee proficiency data model

pub mod loader;
pub mod sample;
pub mod store;
pub mod users;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use store::Roster;
pub use users::{Role, User, UserId};

pub type EmployeeId = u32;

/// A measured dimension of post-training transfer. Variant order is the
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Perimeter {
    #[serde(rename = "Perceived Utility & Relevance")]
    PerceivedUtility,
    #[serde(rename = "Learning Application & Frequency")]
    LearningApplicationFrequency,
    #[serde(rename = "Performance Improvement")]
    PerformanceImprovement,
    #[serde(rename = "Manager Support")]
    ManagerSupport,
    #[serde(rename = "Peer Support")]
    PeerSupport,
    #[serde(rename = "Workplace Enablers & Barriers")]
    WorkplaceEnablers,
    #[serde(rename = "Strategic Thinking")]
    StrategicThinking,
    #[serde(rename = "Team Leadership & Motivation")]
    TeamLeadership,
    #[serde(rename = "Conflict Resolution")]
    ConflictResolution,
}

impl Perimeter {
    pub const ALL: [Perimeter; 9] = [
        Perimeter::PerceivedUtility,
        Perimeter::LearningApplicationFrequency,
        Perimeter::PerformanceImprovement,
        Perimeter::ManagerSupport,
        Perimeter::PeerSupport,
        Perimeter::WorkplaceEnablers,
        Perimeter::StrategicThinking,
        Perimeter::TeamLeadership,
        Perimeter::ConflictResolution,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Perimeter::PerceivedUtility => "Perceived Utility & Relevance",
            Perimeter::LearningApplicationFrequency => "Learning Application & Frequency",
            Perimeter::PerformanceImprovement => "Performance Improvement",
            Perimeter::ManagerSupport => "Manager Support",
            Perimeter::PeerSupport => "Peer Support",
            Perimeter::WorkplaceEnablers => "Workplace Enablers & Barriers",
            Perimeter::StrategicThinking => "Strategic Thinking",
            Perimeter::TeamLeadership => "Team Leadership & Motivation",
            Perimeter::ConflictResolution => "Conflict Resolution",
        }
    }

    /// Perimeters measured only for manager-track trainees.
    pub fn is_leadership_track(&self) -> bool {
        matches!(
            self,
            Perimeter::StrategicThinking
                | Perimeter::TeamLeadership
                | Perimeter::ConflictResolution
        )
    }
}

impl fmt::Display for Perimeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A questionnaire answer: a 1-5 rating or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Rating(u8),
    Text(String),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Rating(r) => write!(f, "Rating: {r}/5"),
            Answer::Text(t) => f.write_str(t),
        }
    }
}

/// A follow-up question that only applies when the parent answer equals
/// `on_answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub on_answer: Answer,
    pub question: Box<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUp>,
}

impl Question {
    /// The follow-up question, if the recorded answer triggered it.
    pub fn active_follow_up(&self) -> Option<&Question> {
        self.follow_up
            .as_ref()
            .filter(|f| f.on_answer == self.answer)
            .map(|f| f.question.as_ref())
    }

    /// This question followed by every triggered follow-up beneath it.
    pub fn thread(&self) -> Vec<&Question> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(next) = current.active_follow_up() {
            chain.push(next);
            current = next;
        }
        chain
    }

    /// Visits this question and all nested follow-ups, triggered or not.
    pub(crate) fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Question)) {
        visit(self);
        if let Some(f) = &self.follow_up {
            f.question.walk(visit);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProficiencyRecord {
    pub perimeter: Perimeter,
    /// 1-5; validated on ingestion.
    pub score: u8,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub department: String,
    /// Name of the training program completed.
    pub training: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_name: Option<String>,
    /// 1-5 rating of the training program itself, not of the employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_effectiveness: Option<u8>,
    #[serde(default)]
    pub proficiency: Vec<ProficiencyRecord>,
}

impl Employee {
    pub fn record(&self, perimeter: Perimeter) -> Option<&ProficiencyRecord> {
        self.proficiency.iter().find(|p| p.perimeter == perimeter)
    }

    pub fn score_for(&self, perimeter: Perimeter) -> Option<u8> {
        self.record(perimeter).map(|p| p.score)
    }

    pub fn is_leadership_track(&self) -> bool {
        self.proficiency
            .iter()
            .any(|p| p.perimeter.is_leadership_track())
    }
}

/// Distinct job roles in first-seen order.
pub fn distinct_roles(employees: &[Employee]) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for employee in employees {
        if !roles.contains(&employee.role) {
            roles.push(employee.role.clone());
        }
    }
    roles
}
