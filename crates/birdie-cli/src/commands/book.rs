use super::BookArgs;
use anyhow::Result;
use birdie_browser::{find_chrome, ChromeProcess, LaunchOptions, Locator, Profile, Session};
use birdie_core::artifacts::{RunPaths, RunSummary};
use birdie_core::{booking_now, Attempt, BookingConfig, Mode, RetryError, TimeWindow};
use birdie_site as site;
use chrono::{NaiveDate, NaiveTime};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const PAGE_READY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum Outcome {
    Booked { time: NaiveTime, attempts: u32 },
    Exhausted { attempts: u32 },
}

pub fn execute(args: BookArgs, verbose: bool) -> Result<Outcome> {
    let config = args.to_config()?;
    let started = booking_now();
    let target_date = config.schedule().target_date(started);

    let paths = RunPaths::create(&args.output_dir, &started.format("%Y%m%d_%H%M%S").to_string())?;
    crate::init_logging(verbose, Some(&paths.log_file()))?;

    tracing::info!(
        "starting {} mode booking for {}; artifacts in {}",
        config.mode.as_str(),
        target_date,
        paths.root.display()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(&args, &config, &paths, target_date));
    runtime.shutdown_timeout(Duration::from_millis(100));

    write_summary(&config, &paths, target_date, &result);
    report(&paths, target_date, &result);

    result
}

async fn run(
    args: &BookArgs,
    config: &BookingConfig,
    paths: &RunPaths,
    target_date: NaiveDate,
) -> Result<Outcome> {
    // Browser up and logged in before any waiting: the member session must
    // already exist when the release lands.
    let chrome_binary = find_chrome(args.chrome_path.as_deref())?;
    tracing::info!("using Chrome at {}", chrome_binary.display());

    let profile = Profile::resolve(args.profile.as_deref())?;
    if let Some(name) = profile.name() {
        tracing::info!("using persistent profile '{}'", name);
    }

    let mut options = LaunchOptions::new(profile.path().to_path_buf());
    options.headless = !args.headed;

    let chrome = ChromeProcess::launch(&chrome_binary, &options)?;
    let session = Session::attach(chrome).await?;
    let locator = Locator::new(session.page().clone(), config.element_timeout);

    let outcome = drive(config, &session, &locator, paths, target_date).await;

    let _ = session.screenshot(&paths.screenshots, "99_final").await;
    session.close().await;
    outcome
}

async fn drive(
    config: &BookingConfig,
    session: &Session,
    locator: &Locator,
    paths: &RunPaths,
    target_date: NaiveDate,
) -> Result<Outcome> {
    session.goto(config.site_url.as_str()).await?;
    session.wait_for_ready(PAGE_READY_TIMEOUT).await?;

    let shots = paths.screenshots.as_path();
    step(
        session,
        shots,
        "01_login",
        site::login::login(locator, &config.email, &config.password),
    )
    .await?;

    match config.mode {
        Mode::Test => test_pass(config, session, locator, paths, target_date).await,
        Mode::Scheduled => scheduled_run(config, session, locator, paths, target_date).await,
    }
}

/// Single immediate pass through the whole flow, no waiting, no retries.
async fn test_pass(
    config: &BookingConfig,
    session: &Session,
    locator: &Locator,
    paths: &RunPaths,
    target_date: NaiveDate,
) -> Result<Outcome> {
    let shots = paths.screenshots.as_path();

    step(session, shots, "02_date", site::calendar::select_date(locator, target_date)).await?;
    step(
        session,
        shots,
        "03_players",
        site::players::select_players(locator, config.players),
    )
    .await?;
    step(session, shots, "04_continue", site::confirm::continue_to_slots(locator)).await?;

    let time = step(
        session,
        shots,
        "05_slot",
        site::slots::book_slot_in_window(locator, &config.window),
    )
    .await?;
    step(session, shots, "06_review", site::confirm::continue_to_review(locator)).await?;
    step(session, shots, "07_terms", site::confirm::accept_terms(locator)).await?;
    step(session, shots, "08_confirm", site::confirm::confirm_booking(locator)).await?;

    Ok(Outcome::Booked { time, attempts: 1 })
}

/// Wait for the lead window, set up date and players, then chase the
/// released slots on the retry budget.
async fn scheduled_run(
    config: &BookingConfig,
    session: &Session,
    locator: &Locator,
    paths: &RunPaths,
    target_date: NaiveDate,
) -> Result<Outcome> {
    let schedule = config.schedule();
    let now = booking_now();
    let release = schedule.release_instant(now)?;
    let wait = schedule.lead_in(now)?;

    tracing::info!(
        "release at {}, holding for {}s",
        release.format("%H:%M:%S %Z"),
        wait.as_secs()
    );
    countdown(wait).await;

    // Date, players, and the first continue happen inside the lead window,
    // so the attempt loop starts on the tee-time listing.
    let shots = paths.screenshots.as_path();
    step(session, shots, "02_date", site::calendar::select_date(locator, target_date)).await?;
    step(
        session,
        shots,
        "03_players",
        site::players::select_players(locator, config.players),
    )
    .await?;
    step(session, shots, "04_continue", site::confirm::continue_to_slots(locator)).await?;

    let policy = config.retry_policy();
    let window = config.window;
    let attempts_seen = AtomicU32::new(0);

    let result = policy
        .run(|attempt| {
            attempts_seen.store(attempt, Ordering::SeqCst);
            async move {
                match booking_attempt(session, locator, shots, window, attempt).await {
                    Ok(time) => Ok(Attempt::Complete(time)),
                    Err(e) if e.is_transient() => Ok(Attempt::Retry(e.to_string())),
                    Err(e) => Err(e),
                }
            }
        })
        .await;

    match result {
        Ok(time) => Ok(Outcome::Booked {
            time,
            attempts: attempts_seen.load(Ordering::SeqCst),
        }),
        Err(RetryError::Exhausted {
            attempts,
            elapsed,
            last,
        }) => {
            tracing::error!(
                "no booking after {} attempts in {:?}; last failure: {}",
                attempts,
                elapsed,
                last
            );
            Ok(Outcome::Exhausted { attempts })
        }
        Err(RetryError::Fatal(e)) => Err(e.into()),
    }
}

/// One pass over the released listing. Screenshot labels are stable across
/// attempts, so a retried step overwrites its own evidence instead of
/// flooding the run directory.
async fn booking_attempt(
    session: &Session,
    locator: &Locator,
    shots: &Path,
    window: TimeWindow,
    attempt: u32,
) -> site::Result<NaiveTime> {
    if attempt > 1 {
        session.reload().await.map_err(site::Error::from)?;
        session
            .wait_for_ready(PAGE_READY_TIMEOUT)
            .await
            .map_err(site::Error::from)?;
    }

    let time = step(
        session,
        shots,
        "05_slot",
        site::slots::book_slot_in_window(locator, &window),
    )
    .await?;
    step(session, shots, "06_review", site::confirm::continue_to_review(locator)).await?;
    step(session, shots, "07_terms", site::confirm::accept_terms(locator)).await?;
    step(session, shots, "08_confirm", site::confirm::confirm_booking(locator)).await?;
    Ok(time)
}

/// Run one flow step and screenshot the page either way: `<label>.png` on
/// completion, `<label>_failed.png` with the state that broke the step on
/// failure. Capture failures never mask the step's own result.
async fn step<T, F>(session: &Session, shots: &Path, label: &str, fut: F) -> site::Result<T>
where
    F: Future<Output = site::Result<T>>,
{
    match fut.await {
        Ok(value) => {
            let _ = session.screenshot(shots, label).await;
            Ok(value)
        }
        Err(e) => {
            let _ = session
                .screenshot(shots, &format!("{}_failed", label))
                .await;
            Err(e)
        }
    }
}

/// Sleep out the wait phase with a visible countdown. Attempts never start
/// before the deadline.
async fn countdown(wait: Duration) {
    if wait.is_zero() {
        return;
    }

    let deadline = tokio::time::Instant::now() + wait;
    let bar = ProgressBar::new(wait.as_secs().max(1));
    bar.set_style(
        ProgressStyle::with_template("{bar:40.green} {pos}/{len}s until attempts begin")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        bar.set_position(wait.as_secs().saturating_sub(remaining.as_secs()));
        tokio::time::sleep(remaining.min(Duration::from_secs(1))).await;
    }

    bar.finish_and_clear();
}

fn write_summary(
    config: &BookingConfig,
    paths: &RunPaths,
    target_date: NaiveDate,
    result: &Result<Outcome>,
) {
    let (outcome, attempts, booked_time) = match result {
        Ok(Outcome::Booked { time, attempts }) => (
            "booked".to_string(),
            *attempts,
            Some(time.format("%H:%M").to_string()),
        ),
        Ok(Outcome::Exhausted { attempts }) => ("exhausted".to_string(), *attempts, None),
        Err(e) => (format!("failed: {:#}", e), 0, None),
    };

    let summary = RunSummary {
        mode: config.mode.as_str().to_string(),
        target_date: target_date.to_string(),
        outcome,
        attempts,
        booked_time,
        finished_at: booking_now().to_rfc3339(),
    };

    if let Err(e) = summary.write(paths) {
        tracing::warn!("failed to write run summary: {}", e);
    }
}

fn report(paths: &RunPaths, target_date: NaiveDate, result: &Result<Outcome>) {
    match result {
        Ok(Outcome::Booked { time, attempts }) => println!(
            "{} booked {} on {} ({} attempt{})",
            style("✓").green().bold(),
            time.format("%H:%M"),
            target_date,
            attempts,
            if *attempts == 1 { "" } else { "s" }
        ),
        Ok(Outcome::Exhausted { attempts }) => println!(
            "{} no tee time for {} after {} attempts",
            style("✗").red().bold(),
            target_date,
            attempts
        ),
        Err(e) => println!("{} booking failed: {:#}", style("✗").red().bold(), e),
    }
    println!("  artifacts: {}", paths.root.display());
}
