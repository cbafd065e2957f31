use anyhow::Context;
use subscription_tracker_e2e::configuration::get_configuration;
use subscription_tracker_e2e::scenario::Scenario;
use subscription_tracker_e2e::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries the run transcript
    let subscriber = get_subscriber(
        "subscription-tracker-e2e".into(),
        "info".into(),
        std::io::stderr,
    );
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let scenario = Scenario::build(configuration)?;

    // A fatal step failure ends the process with exit code 1
    let report = scenario.run().await?;

    if !report.is_acceptable() {
        anyhow::bail!(
            "{} check(s) failed while checks are enforced.",
            report.failed_checks().count()
        );
    }
    Ok(())
}
