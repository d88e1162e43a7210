// tests/analysis_test.rs — Analysis service caching against a fake provider

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{employee, FakeProvider};
use proficiencypro::analysis::{AnalysisService, CacheLookup, StepStatus};
use proficiencypro::infra::errors::{AnalysisError, AnalysisKind, ConfigError};
use proficiencypro::provider::AnalysisProvider;

fn service(provider: &Arc<FakeProvider>) -> AnalysisService {
    let provider: Arc<dyn AnalysisProvider> = provider.clone();
    AnalysisService::new(provider)
}

#[tokio::test]
async fn concurrent_requests_share_one_provider_call() {
    let (provider, gate) = FakeProvider::gated();
    let provider = Arc::new(provider);
    let service = service(&provider);
    let john = employee(2);

    let first = service.fetch_individual(&john);
    let second = service.fetch_individual(&john);
    let release = async {
        while provider.individual() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(service.lookup_individual(2), CacheLookup::Pending);
        gate.notify_one();
    };
    let (a, b, ()) = tokio::join!(first, second, release);

    assert_eq!(provider.individual(), 1);
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn concurrent_requests_share_one_failure() {
    let (provider, gate) = FakeProvider::gated();
    provider.fail.store(true, Ordering::SeqCst);
    let provider = Arc::new(provider);
    let service = service(&provider);
    let john = employee(2);

    let first = service.fetch_individual(&john);
    let second = service.fetch_individual(&john);
    let release = async {
        while provider.individual() == 0 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();
    };
    let (a, b, ()) = tokio::join!(first, second, release);

    assert_eq!(provider.individual(), 1);
    let a = a.unwrap_err();
    assert!(matches!(
        a,
        AnalysisError::Failed {
            kind: AnalysisKind::Individual,
            ..
        }
    ));
    assert_eq!(a, b.unwrap_err());
    assert_eq!(service.lookup_individual(2), CacheLookup::HitFailure);
}

#[tokio::test]
async fn failure_is_cached_for_the_key() {
    let provider = Arc::new(FakeProvider::failing());
    let service = service(&provider);
    let john = employee(2);

    let first = service.fetch_individual(&john).await.unwrap_err();
    assert!(matches!(
        first,
        AnalysisError::Failed {
            kind: AnalysisKind::Individual,
            ..
        }
    ));

    // Even once the provider recovers, the key stays failed.
    provider.fail.store(false, Ordering::SeqCst);
    let second = service.fetch_individual(&john).await.unwrap_err();
    assert_eq!(
        second,
        AnalysisError::Unavailable {
            kind: AnalysisKind::Individual
        }
    );
    assert_eq!(provider.individual(), 1);
    assert_eq!(service.lookup_individual(2), CacheLookup::HitFailure);

    // Other keys are unaffected.
    service.fetch_individual(&employee(4)).await.unwrap();
    assert_eq!(provider.individual(), 2);
}

#[tokio::test]
async fn rate_limit_has_its_own_message() {
    let provider = Arc::new(FakeProvider::new());
    provider.rate_limited.store(true, Ordering::SeqCst);
    let service = service(&provider);

    let err = service.fetch_individual(&employee(1)).await.unwrap_err();
    assert!(err
        .user_message()
        .contains("exceeded your API request limit"));
}

#[tokio::test]
async fn missing_credential_is_never_cached() {
    let provider = Arc::new(FakeProvider::new());
    provider.unconfigured.store(true, Ordering::SeqCst);
    let service = service(&provider);
    let sarah = employee(1);

    let err = service.fetch_individual(&sarah).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Configuration(ConfigError::MissingCredential { .. })
    ));
    assert_eq!(provider.individual(), 0);
    assert_eq!(service.lookup_individual(1), CacheLookup::Miss);

    provider.unconfigured.store(false, Ordering::SeqCst);
    assert!(service.fetch_individual(&sarah).await.is_ok());
    assert_eq!(provider.individual(), 1);
}

#[tokio::test]
async fn action_plan_reuses_cached_gap_analysis() {
    let provider = Arc::new(FakeProvider::new());
    let service = service(&provider);
    let john = employee(2);

    service.fetch_individual(&john).await.unwrap();
    let plan = service.fetch_action_plan(&john).await.unwrap();
    assert_eq!(plan.employee_id, 2);
    assert_eq!(provider.individual(), 1);
    assert_eq!(provider.plans(), 1);

    service.fetch_action_plan(&john).await.unwrap();
    assert_eq!(provider.plans(), 1);
}

#[tokio::test]
async fn step_edits_survive_later_reads() {
    let provider = Arc::new(FakeProvider::new());
    let service = service(&provider);
    let john = employee(2);

    assert_eq!(
        service.update_step_status(2, 0, StepStatus::Completed),
        Err(AnalysisError::NoActionPlan(2))
    );

    service.fetch_action_plan(&john).await.unwrap();
    let edited = service
        .update_step_status(2, 1, StepStatus::InProgress)
        .unwrap();
    assert_eq!(edited.action_steps[1].status, StepStatus::InProgress);

    let again = service.fetch_action_plan(&john).await.unwrap();
    assert_eq!(again.action_steps[0].status, StepStatus::NotStarted);
    assert_eq!(again.action_steps[1].status, StepStatus::InProgress);

    assert_eq!(
        service.update_step_status(2, 9, StepStatus::Completed),
        Err(AnalysisError::StepOutOfRange {
            employee_id: 2,
            index: 9
        })
    );
}

#[tokio::test]
async fn empty_team_skips_the_provider() {
    let provider = Arc::new(FakeProvider::new());
    let service = service(&provider);

    assert_eq!(service.fetch_team(&[]).await.unwrap(), None);
    assert_eq!(provider.teams(), 0);
}

#[tokio::test]
async fn team_cache_ignores_member_order() {
    let provider = Arc::new(FakeProvider::new());
    let service = service(&provider);

    let forward = [employee(2), employee(4)];
    let reverse = [employee(4), employee(2)];
    let a = service.fetch_team(&forward).await.unwrap();
    let b = service.fetch_team(&reverse).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(provider.teams(), 1);
}
