// tests/scoring_test.rs — Score engine and cohort statistics

mod common;

use pretty_assertions::assert_eq;

use proficiencypro::roster::{Employee, Perimeter, ProficiencyRecord};
use proficiencypro::scoring::aggregate::{
    perimeter_averages, retraining_candidates, status_distribution,
    training_effectiveness_by_program, trainer_analytics,
};
use proficiencypro::scoring::{classify_status, compute_overall_score, Status};

fn employee(id: u32, scores: &[u8]) -> Employee {
    Employee {
        id,
        name: format!("Employee {id}"),
        role: "Analyst".into(),
        department: String::new(),
        training: "Program".into(),
        manager_id: None,
        trainer_name: None,
        training_effectiveness: None,
        proficiency: scores
            .iter()
            .zip(Perimeter::ALL)
            .map(|(&score, perimeter)| ProficiencyRecord {
                perimeter,
                score,
                questions: Vec::new(),
            })
            .collect(),
    }
}

fn rated(id: u32, training: &str, trainer: &str, rating: u8) -> Employee {
    Employee {
        training: training.into(),
        trainer_name: Some(trainer.into()),
        training_effectiveness: Some(rating),
        ..employee(id, &[3])
    }
}

#[test]
fn no_records_scores_zero_and_needs_support() {
    let e = employee(1, &[]);
    assert_eq!(compute_overall_score(&e), 0);
    assert_eq!(classify_status(0), Status::NeedsSupport);
}

#[test]
fn single_record_scales_to_hundred() {
    assert_eq!(compute_overall_score(&employee(1, &[5])), 100);
    assert_eq!(compute_overall_score(&employee(1, &[4])), 80);
    assert_eq!(compute_overall_score(&employee(1, &[1])), 20);
    assert_eq!(classify_status(80), Status::Developing);
}

#[test]
fn status_boundaries() {
    assert_eq!(classify_status(81), Status::Excelling);
    assert_eq!(classify_status(80), Status::Developing);
    assert_eq!(classify_status(60), Status::Developing);
    assert_eq!(classify_status(59), Status::NeedsSupport);
}

#[test]
fn overall_score_rounds_half_up() {
    // mean 3.5 -> 70; mean 4.125 -> 82.5 -> 83
    assert_eq!(compute_overall_score(&employee(1, &[3, 4])), 70);
    assert_eq!(compute_overall_score(&employee(1, &[4, 4, 4, 4, 4, 4, 4, 5])), 83);
}

#[test]
fn empty_cohort_distribution_is_zero() {
    let d = status_distribution(&[]);
    assert_eq!(
        (d.total, d.pct_excelling, d.pct_developing, d.pct_needs_support),
        (0, 0, 0, 0)
    );
}

#[test]
fn tiers_are_rounded_independently() {
    // One of each tier: 33.33% each rounds to 33, summing to 99.
    let cohort = [employee(1, &[5]), employee(2, &[3]), employee(3, &[1])];
    let d = status_distribution(&cohort);
    assert_eq!(
        (d.pct_excelling, d.pct_developing, d.pct_needs_support),
        (33, 33, 33)
    );
}

#[test]
fn programs_sorted_worst_first() {
    let cohort = [
        rated(1, "B", "T1", 4),
        rated(2, "A", "T1", 2),
        rated(3, "B", "T2", 5),
    ];
    let programs = training_effectiveness_by_program(&cohort);
    let order: Vec<(&str, f64)> = programs
        .iter()
        .map(|p| (p.program.as_str(), p.average_rating))
        .collect();
    assert_eq!(order, vec![("A", 2.0), ("B", 4.5)]);
}

#[test]
fn trainers_sorted_best_first_with_stable_ties() {
    let cohort = [
        rated(1, "A", "Ana", 3),
        rated(2, "B", "Ben", 5),
        rated(3, "C", "Cy", 3),
        employee(4, &[2]),
    ];
    let trainers = trainer_analytics(&cohort);
    let names: Vec<&str> = trainers.iter().map(|t| t.trainer.as_str()).collect();
    assert_eq!(names, vec!["Ben", "Ana", "Cy"]);
}

#[test]
fn sample_roster_aggregates() {
    let employees = common::roster().employees();

    let d = status_distribution(&employees);
    assert_eq!(
        (d.total, d.pct_excelling, d.pct_developing, d.pct_needs_support),
        (5, 40, 40, 20)
    );

    let trainers = trainer_analytics(&employees);
    assert_eq!(trainers[0].trainer, "Priya Nair");
    assert_eq!(trainers[0].average_effectiveness, Some(4.5));
    assert_eq!(trainers[1].trainees, 3);
    assert_eq!(trainers[1].programs, 2);

    let retraining: Vec<u32> = retraining_candidates(&employees)
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(retraining, vec![2]);

    let leadership = perimeter_averages(&employees)
        .into_iter()
        .find(|p| p.perimeter == Perimeter::TeamLeadership)
        .unwrap();
    assert_eq!(leadership.respondents, 1);
}
