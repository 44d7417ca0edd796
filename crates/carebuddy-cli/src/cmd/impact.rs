use crate::cmd::{block_on, Session};
use crate::output::{print_fields, print_json};
use carebuddy_core::types::ReportingPeriod;
use carebuddy_core::Console;

pub fn run(session: &Session, period: Option<&str>) -> anyhow::Result<()> {
    let config = session.config()?;
    let period = match period {
        Some(raw) => raw.parse::<ReportingPeriod>()?,
        None => config.default_period,
    };

    let console = Console::new(session.client(&config));
    let view = console.impact_view();
    block_on(view.load(period))?;

    // An unavailable summary renders as zeros, like the dashboard cards.
    let summary = view.summary();

    if session.json {
        let value = serde_json::json!({
            "period": period,
            "available": summary.is_some(),
            "summary": summary.unwrap_or_default(),
        });
        return print_json(&value);
    }

    let summary = summary.unwrap_or_default();
    println!("Impact ({period})");
    println!();
    print_fields(&[
        ("Buddies", summary.total_buddies.to_string()),
        ("Patients", summary.total_patients.to_string()),
        ("Conversations", summary.total_conversations.to_string()),
        ("Rating", summary.average_rating_label()),
    ]);
    Ok(())
}
