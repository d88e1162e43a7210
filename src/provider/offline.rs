// src/provider/offline.rs — Deterministic rule-based provider
//
// Needs no credential and no network. Perimeters scored 4 or 5 count as
// strengths, 3 or below as gaps.

use async_trait::async_trait;

use super::AnalysisProvider;
use crate::analysis::{
    ActionPlan, ActionStep, Analysis, Recommendations, StepOwner, StepStatus, TeamAnalysis,
    TeamInsight,
};
use crate::infra::errors::{ConfigError, ProviderError};
use crate::roster::{Employee, Perimeter};
use crate::scoring::Status;

const STRENGTH_FROM: u8 = 4;
const MAX_STEPS: usize = 5;

pub struct OfflineProvider;

struct Playbook {
    manager: &'static str,
    employee: &'static str,
    hr: &'static str,
    owner: StepOwner,
    timeline: &'static str,
    resources: &'static str,
}

fn playbook(perimeter: Perimeter) -> Playbook {
    match perimeter {
        Perimeter::PerceivedUtility => Playbook {
            manager: "Map the training content to two live projects the employee owns",
            employee: "List three current tasks where the new skills apply",
            hr: "Review whether the program content matches the role profile",
            owner: StepOwner::Manager,
            timeline: "Within 2 weeks",
            resources: "Role profile and current project backlog",
        },
        Perimeter::LearningApplicationFrequency => Playbook {
            manager: "Assign one task per sprint that requires the new skill",
            employee: "Apply the skill at least weekly and keep a short log",
            hr: "Offer short refresher sessions spaced over the next quarter",
            owner: StepOwner::Employee,
            timeline: "Next 30 days",
            resources: "Practice log template on the learning portal",
        },
        Perimeter::PerformanceImprovement => Playbook {
            manager: "Agree on one measurable outcome that should improve",
            employee: "Track before-and-after results on a recurring task",
            hr: "Add the agreed outcome to the next performance review",
            owner: StepOwner::Employee,
            timeline: "Next 60 days",
            resources: "Team KPI dashboard",
        },
        Perimeter::ManagerSupport => Playbook {
            manager: "Hold a fortnightly check-in focused on applying the training",
            employee: "Bring one concrete question about the new skill to each check-in",
            hr: "Provide managers with a coaching guide for post-training follow-up",
            owner: StepOwner::Manager,
            timeline: "Ongoing",
            resources: "Manager coaching guide",
        },
        Perimeter::PeerSupport => Playbook {
            manager: "Pair the employee with a colleague who already uses the skill",
            employee: "Share one lesson learned with the team each month",
            hr: "Set up a peer practice group for program graduates",
            owner: StepOwner::Employee,
            timeline: "Within 1 month",
            resources: "Mentorship from a senior team member",
        },
        Perimeter::WorkplaceEnablers => Playbook {
            manager: "Remove one tooling or time barrier that blocks practice",
            employee: "Write down the barriers hit when trying the new approach",
            hr: "Audit tool access and workload for recent trainees",
            owner: StepOwner::Hr,
            timeline: "Within 2 weeks",
            resources: "IT request process and workload review",
        },
        Perimeter::StrategicThinking => Playbook {
            manager: "Involve the employee in quarterly planning discussions",
            employee: "Draft a one-page plan linking team goals to company objectives",
            hr: "Enroll the employee in the strategy module of the leadership track",
            owner: StepOwner::Employee,
            timeline: "Next quarter",
            resources: "Company strategy deck",
        },
        Perimeter::TeamLeadership => Playbook {
            manager: "Delegate ownership of one team ritual to the employee",
            employee: "Run team stand-ups for a month and collect feedback",
            hr: "Arrange 360 feedback after the first month",
            owner: StepOwner::Manager,
            timeline: "Next 30 days",
            resources: "360 feedback tool",
        },
        Perimeter::ConflictResolution => Playbook {
            manager: "Debrief recent disagreements together and discuss alternatives",
            employee: "Practice structured feedback conversations with a mentor",
            hr: "Offer a facilitated conflict-resolution workshop",
            owner: StepOwner::Hr,
            timeline: "Within 1 month",
            resources: "Conflict-resolution workshop",
        },
    }
}

fn names(perimeters: &[Perimeter]) -> String {
    perimeters
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn split(employee: &Employee) -> (Vec<Perimeter>, Vec<Perimeter>) {
    let mut strengths = Vec::new();
    let mut gaps = Vec::new();
    for record in &employee.proficiency {
        if record.score >= STRENGTH_FROM {
            strengths.push(record.perimeter);
        } else {
            gaps.push(record.perimeter);
        }
    }
    (strengths, gaps)
}

fn root_cause(gaps: &[Perimeter]) -> String {
    if gaps.contains(&Perimeter::ManagerSupport)
        && gaps.contains(&Perimeter::LearningApplicationFrequency)
    {
        return "Low manager support alongside infrequent application suggests the employee lacks \
                the opportunities and feedback needed to put the training into practice."
            .to_string();
    }
    if gaps.contains(&Perimeter::WorkplaceEnablers) {
        return format!(
            "Workplace barriers are likely holding back progress in {}.",
            names(gaps)
        );
    }
    format!("Lower scores in {} point to a weak transfer of the training into daily work.", names(gaps))
}

fn excelling_analysis(employee: &Employee, overall_score: u32, strengths: &[Perimeter]) -> Analysis {
    Analysis {
        title: "Benefits & New Scope".into(),
        message: format!(
            "{} is excelling after {} with an overall score of {}/100. Strongest areas: {}.",
            employee.name,
            employee.training,
            overall_score,
            names(strengths)
        ),
        root_cause: None,
        recommendations: Recommendations {
            manager: vec![
                format!("Recognize {}'s progress in the next team meeting", employee.name),
                "Widen the employee's scope with a stretch assignment".into(),
            ],
            employee: vec![
                "Mentor a colleague who is starting the same program".into(),
                "Pick an advanced course that builds on this training".into(),
            ],
            hr: vec!["Consider the employee for the next advanced cohort".into()],
        },
    }
}

fn support_analysis(employee: &Employee, overall_score: u32, status: Status, gaps: &[Perimeter]) -> Analysis {
    let mut recommendations = Recommendations::default();
    for gap in gaps {
        let book = playbook(*gap);
        recommendations.manager.push(book.manager.to_string());
        recommendations.employee.push(book.employee.to_string());
        recommendations.hr.push(book.hr.to_string());
    }
    Analysis {
        title: "Key Strategies & Real Solutions".into(),
        message: format!(
            "{} is {} after {} with an overall score of {}/100. Focus areas: {}.",
            employee.name,
            status.label().to_lowercase(),
            employee.training,
            overall_score,
            names(gaps)
        ),
        root_cause: Some(root_cause(gaps)),
        recommendations,
    }
}

fn insight(perimeter: Perimeter, count: usize, respondents: usize, average: f64, strong: bool) -> TeamInsight {
    let band = if strong { "4 or 5" } else { "3 or lower" };
    TeamInsight {
        perimeter: perimeter.label().to_string(),
        insight: format!("{count} of {respondents} members scored {band} (average {average:.1})."),
    }
}

#[async_trait]
impl AnalysisProvider for OfflineProvider {
    fn id(&self) -> &'static str {
        "offline"
    }

    fn ensure_configured(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    async fn request_individual_analysis(
        &self,
        employee: &Employee,
        overall_score: u32,
        status: Status,
    ) -> Result<Analysis, ProviderError> {
        let (strengths, gaps) = split(employee);
        if status == Status::Excelling || gaps.is_empty() {
            Ok(excelling_analysis(employee, overall_score, &strengths))
        } else {
            Ok(support_analysis(employee, overall_score, status, &gaps))
        }
    }

    async fn request_action_plan(
        &self,
        employee: &Employee,
        analysis: &Analysis,
    ) -> Result<ActionPlan, ProviderError> {
        let (_, gaps) = split(employee);
        let action_steps: Vec<ActionStep> = if analysis.root_cause.is_none() || gaps.is_empty() {
            analysis
                .recommendations
                .manager
                .iter()
                .map(|r| (r, StepOwner::Manager))
                .chain(analysis.recommendations.employee.iter().map(|r| (r, StepOwner::Employee)))
                .chain(analysis.recommendations.hr.iter().map(|r| (r, StepOwner::Hr)))
                .take(MAX_STEPS)
                .map(|(step, owner)| ActionStep {
                    step: step.clone(),
                    owner,
                    timeline: "Next quarter".into(),
                    resources: "Company learning portal".into(),
                    status: StepStatus::NotStarted,
                })
                .collect()
        } else {
            gaps.iter()
                .take(MAX_STEPS)
                .map(|gap| {
                    let book = playbook(*gap);
                    let step = match book.owner {
                        StepOwner::Manager => book.manager,
                        StepOwner::Employee => book.employee,
                        StepOwner::Hr => book.hr,
                    };
                    ActionStep {
                        step: step.to_string(),
                        owner: book.owner,
                        timeline: book.timeline.to_string(),
                        resources: book.resources.to_string(),
                        status: StepStatus::NotStarted,
                    }
                })
                .collect()
        };

        let goal = if gaps.is_empty() {
            format!("Build on {} to take on a wider role", employee.training)
        } else {
            format!(
                "Apply {} confidently in daily work, starting with {}",
                employee.training,
                gaps[0].label()
            )
        };

        Ok(ActionPlan {
            employee_id: employee.id,
            goal,
            action_steps,
        })
    }

    async fn request_team_analysis(
        &self,
        employees: &[Employee],
    ) -> Result<TeamAnalysis, ProviderError> {
        let mut team = TeamAnalysis::default();
        for perimeter in Perimeter::ALL {
            let scores: Vec<u8> = employees.iter().filter_map(|e| e.score_for(perimeter)).collect();
            if scores.is_empty() {
                continue;
            }
            let respondents = scores.len();
            let average = scores.iter().map(|s| *s as f64).sum::<f64>() / respondents as f64;
            let high = scores.iter().filter(|s| **s >= STRENGTH_FROM).count();
            let low = respondents - high;
            if high * 2 > respondents {
                team.common_strengths.push(insight(perimeter, high, respondents, average, true));
            } else if low * 2 > respondents {
                team.common_gaps.push(insight(perimeter, low, respondents, average, false));
                team.team_recommendations.push(playbook(perimeter).hr.to_string());
            }
        }
        if team.team_recommendations.is_empty() {
            team.team_recommendations
                .push("Run a team session where members share how they apply the training".into());
        }
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::sample;
    use crate::scoring::assess;

    fn employee(id: u32) -> Employee {
        sample::data()
            .unwrap()
            .employees
            .into_iter()
            .find(|e| e.id == id)
            .unwrap()
    }

    #[tokio::test]
    async fn test_excelling_employee_gets_growth_analysis() {
        let sarah = employee(1);
        let (score, status) = assess(&sarah);
        let analysis = OfflineProvider
            .request_individual_analysis(&sarah, score, status)
            .await
            .unwrap();
        assert_eq!(analysis.title, "Benefits & New Scope");
        assert!(analysis.root_cause.is_none());
    }

    #[tokio::test]
    async fn test_struggling_employee_gets_root_cause() {
        let john = employee(2);
        let (score, status) = assess(&john);
        let analysis = OfflineProvider
            .request_individual_analysis(&john, score, status)
            .await
            .unwrap();
        assert_eq!(analysis.title, "Key Strategies & Real Solutions");
        assert!(analysis.root_cause.unwrap().contains("manager support"));
        assert_eq!(analysis.recommendations.manager.len(), 5);
    }

    #[tokio::test]
    async fn test_action_plan_steps_start_not_started() {
        let john = employee(2);
        let (score, status) = assess(&john);
        let analysis = OfflineProvider
            .request_individual_analysis(&john, score, status)
            .await
            .unwrap();
        let plan = OfflineProvider.request_action_plan(&john, &analysis).await.unwrap();
        assert_eq!(plan.employee_id, 2);
        assert!(!plan.action_steps.is_empty() && plan.action_steps.len() <= MAX_STEPS);
        assert!(plan.action_steps.iter().all(|s| s.status == StepStatus::NotStarted));
    }

    #[tokio::test]
    async fn test_team_analysis_majority_rules() {
        let team = vec![employee(2), employee(4)];
        let analysis = OfflineProvider.request_team_analysis(&team).await.unwrap();
        let strengths: Vec<&str> = analysis.common_strengths.iter().map(|s| s.perimeter.as_str()).collect();
        let gaps: Vec<&str> = analysis.common_gaps.iter().map(|s| s.perimeter.as_str()).collect();
        assert_eq!(strengths, vec!["Perceived Utility & Relevance"]);
        // split 3/4 scores are neither a common strength nor a common gap
        assert_eq!(gaps, vec!["Learning Application & Frequency", "Workplace Enablers & Barriers"]);
        assert_eq!(analysis.team_recommendations.len(), 2);
    }
}
