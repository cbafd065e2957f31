use crate::helpers::{failure, listed, spawn_api, spotify, success};
use claims::assert_ok;
use serde_json::json;
use subscription_tracker_e2e::checks;
use subscription_tracker_e2e::configuration::CheckMode;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn a_failed_update_does_not_stop_the_run() {
    // Arrange
    let test_api = spawn_api().await;
    test_api.mount_fatal_steps().await;
    test_api.mount_update(failure(500, "Database error")).await;
    // Delete, all three listings and the probe still happen
    test_api
        .mount_listings(vec![
            listed(json!([spotify(9.99, "music")])),
            listed(json!([spotify(9.99, "music")])),
            listed(json!([])),
        ])
        .await;
    test_api.mount_delete(success(200, json!({}))).await;
    test_api
        .mount_unauthenticated_listing(failure(401, "Unauthorized"))
        .await;

    // Act
    let report = assert_ok!(test_api.scenario(CheckMode::Observe).run().await);

    // Assert
    let update = report.check(checks::UPDATE_ACCEPTED).unwrap();
    assert!(!update.passed);
    let updated = report.check(checks::UPDATED_SUBSCRIPTION_IS_LISTED).unwrap();
    assert!(!updated.passed);
    assert!(report.check(checks::DELETED_SUBSCRIPTION_IS_GONE).unwrap().passed);
    assert!(report.is_acceptable());
}

#[tokio::test]
async fn failed_checks_make_an_enforced_run_unacceptable() {
    let test_api = spawn_api().await;
    test_api.mount_fatal_steps().await;
    test_api.mount_update(success(200, json!({}))).await;
    test_api
        .mount_listings(vec![
            listed(json!([spotify(9.99, "music")])),
            listed(json!([spotify(12.99, "premium music")])),
            // The delete claimed success but the subscription is still there
            listed(json!([spotify(12.99, "premium music")])),
        ])
        .await;
    test_api.mount_delete(success(200, json!({}))).await;
    test_api
        .mount_unauthenticated_listing(failure(401, "Unauthorized"))
        .await;

    let report = assert_ok!(test_api.scenario(CheckMode::Enforce).run().await);

    assert!(!report.check(checks::DELETED_SUBSCRIPTION_IS_GONE).unwrap().passed);
    assert_eq!(report.failed_checks().count(), 1);
    assert!(!report.is_acceptable());
}

#[tokio::test]
async fn unauthenticated_access_to_subscriptions_is_reported() {
    let test_api = spawn_api().await;
    test_api.mount_fatal_steps().await;
    test_api.mount_update(success(200, json!({}))).await;
    test_api
        .mount_listings(vec![
            listed(json!([spotify(9.99, "music")])),
            listed(json!([spotify(12.99, "premium music")])),
            listed(json!([])),
        ])
        .await;
    test_api.mount_delete(success(200, json!({}))).await;
    test_api
        .mount_unauthenticated_listing(listed(json!([{ "_id": "someone-elses" }])))
        .await;

    let report = assert_ok!(test_api.scenario(CheckMode::Observe).run().await);

    let probe = report
        .check(checks::UNAUTHENTICATED_REQUEST_IS_REJECTED)
        .unwrap();
    assert!(!probe.passed);
    assert!(report.is_acceptable());
}

#[tokio::test]
async fn non_json_listings_are_reported_without_stopping_the_run() {
    let test_api = spawn_api().await;
    test_api.mount_fatal_steps().await;
    test_api.mount_update(success(200, json!({}))).await;
    test_api
        .mount_listings(vec![
            ResponseTemplate::new(500).set_body_string("Internal Server Error"),
            ResponseTemplate::new(500).set_body_string("Internal Server Error"),
            ResponseTemplate::new(500).set_body_string("Internal Server Error"),
        ])
        .await;
    test_api.mount_delete(success(200, json!({}))).await;
    test_api
        .mount_unauthenticated_listing(failure(401, "Unauthorized"))
        .await;

    let report = assert_ok!(test_api.scenario(CheckMode::Observe).run().await);

    assert_eq!(report.checks().len(), 6);
    assert_eq!(report.failed_checks().count(), 3);
    assert!(report.check(checks::UPDATE_ACCEPTED).unwrap().passed);
    assert!(report.check(checks::DELETE_ACCEPTED).unwrap().passed);
}

#[tokio::test]
async fn an_update_that_times_out_is_reported_and_the_run_carries_on() {
    // Arrange
    let test_api = spawn_api().await;
    test_api.mount_fatal_steps().await;
    // Longer than the 2s timeout the test scenario is configured with
    test_api
        .mount_update(success(200, json!({})).set_delay(std::time::Duration::from_secs(4)))
        .await;
    test_api
        .mount_listings(vec![
            listed(json!([spotify(9.99, "music")])),
            listed(json!([spotify(9.99, "music")])),
            listed(json!([])),
        ])
        .await;
    test_api.mount_delete(success(200, json!({}))).await;
    test_api
        .mount_unauthenticated_listing(failure(401, "Unauthorized"))
        .await;

    // Act
    let report = assert_ok!(test_api.scenario(CheckMode::Enforce).run().await);

    // Assert
    let update = report.check(checks::UPDATE_ACCEPTED).unwrap();
    assert!(!update.passed);
    assert!(update.detail.contains("could not be completed"), "{}", update);
    assert_eq!(report.checks().len(), 6);
    assert!(report.check(checks::DELETE_ACCEPTED).unwrap().passed);
    assert!(report.check(checks::DELETED_SUBSCRIPTION_IS_GONE).unwrap().passed);
    assert!(!report.is_acceptable());
    // Delete and all three listings are checked on drop
}
