use anyhow::Context;
use hipchat_notifier::configuration::NotifierConfig;
use hipchat_notifier::expression::AttributeExpression;
use hipchat_notifier::notifications::HttpNotificationSender;
use hipchat_notifier::notifier::Notifier;
use hipchat_notifier::session::{FlowUnit, MemorySession, Route};
use hipchat_notifier::telemetry::{get_subscriber, init_subscriber};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, BufRead};
use tracing::{info, instrument, warn};

/// One line of stdin
#[derive(Deserialize)]
struct UnitRecord {
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    content: String,
}

fn read_units(input: impl BufRead, session: &mut MemorySession) -> anyhow::Result<()> {
    for (n, line) in input.lines().enumerate() {
        let line = line.context("Failed to read unit from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let record: UnitRecord = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse unit on line {}", n + 1))?;
        session.enqueue(FlowUnit::new(record.attributes, record.content));
    }

    Ok(())
}

#[instrument]
fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("hipchat-notifier".into(), "info".into(), io::stdout);
    init_subscriber(subscriber);

    info!("Starting hipchat-notifier");

    let config = NotifierConfig::from_env().context("Invalid HipChat configuration")?;
    let sender = HttpNotificationSender::new(config.request_timeout)?;
    let notifier = Notifier::new(config, Box::new(sender), Box::new(AttributeExpression));

    let mut session = MemorySession::new();
    read_units(io::stdin().lock(), &mut session)?;
    info!(pending = session.pending(), "Queued units");

    while notifier.on_trigger(&mut session).is_some() {}

    let succeeded = session.routed_to(Route::Success).count();
    let failed = session.routed_to(Route::Failure).count();
    if failed > 0 {
        warn!(succeeded, failed, "Finished with failures");
    } else {
        info!(succeeded, "Finished");
    }

    Ok(())
}
