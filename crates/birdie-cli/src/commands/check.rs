use super::BookArgs;
use anyhow::Result;
use birdie_core::{booking_now, ReleaseSchedule, TimeWindow};
use console::style;
use std::time::Duration;

/// Resolve the configuration and print the computed schedule without
/// touching a browser. Safe to run from a shell to sanity-check a cron
/// entry the night before.
pub fn execute(args: &BookArgs) -> Result<()> {
    // Same validation path `book` takes, so a config that would fail a
    // scheduled run fails here first. Stand-in credentials let a config
    // without secrets still be bound-checked; their presence is reported
    // separately below.
    let mut probe = args.clone();
    probe
        .url
        .get_or_insert_with(|| "https://placeholder.invalid/".to_string());
    probe
        .email
        .get_or_insert_with(|| "unset@placeholder.invalid".to_string());
    probe.password.get_or_insert_with(|| "unset".to_string());
    probe.to_config()?;

    let release_time = args.release_time()?;
    let window = TimeWindow::parse(&args.window)?;
    let schedule = ReleaseSchedule::new(
        release_time,
        args.advance_days,
        Duration::from_secs(args.lead_seconds),
    );
    let now = booking_now();

    println!("{}", style("Schedule").bold());
    println!("  Now:              {}", now.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("  Target date:      {}", schedule.target_date(now));

    match schedule.release_instant(now) {
        Ok(release) => {
            println!(
                "  Release instant:  {}",
                release.format("%Y-%m-%d %H:%M:%S %Z")
            );
            match schedule.lead_in(now) {
                Ok(wait) => println!("  Wait to attempts: {}s", wait.as_secs()),
                Err(e) => println!("  {}  {}", style("Note:").yellow(), e),
            }
        }
        Err(e) => println!("  {}  {}", style("Note:").yellow(), e),
    }

    println!();
    println!("{}", style("Booking").bold());
    println!("  Preferred window: {}", window);
    println!("  Players:          {}", args.players);
    println!(
        "  Mode:             {}",
        if args.test_mode { "test" } else { "scheduled" }
    );
    println!(
        "  Attempts:         up to {} every {}s within a {}s budget",
        args.max_attempts, args.retry_delay, args.retry_budget
    );

    println!();
    println!("{}", style("Environment").bold());
    println!(
        "  Booking URL:      {}",
        args.url.as_deref().unwrap_or("missing")
    );
    println!(
        "  Credentials:      email {}, password {}",
        presence(&args.email),
        presence(&args.password)
    );

    Ok(())
}

fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "missing"
    }
}
