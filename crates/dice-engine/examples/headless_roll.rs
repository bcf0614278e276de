//! Headless dice demo -- roll a few times and print each settled view.
//!
//! Run with:
//!   cargo run --example headless_roll -p dice-engine
//!
//! Set `API_KEY` to get Gemini commentary; without it the AI slot stays
//! empty. `DICE_SEED` makes the face sequence reproducible and `DICE_ROLLS`
//! sets how many rolls to make (default 3).

use std::sync::Arc;

use anyhow::Context;
use dice_engine::prelude::*;

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn env_number<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        Err(_) => Ok(None),
    }
}

fn build_session(seed: Option<u64>) -> RollSession {
    let clock = Arc::new(SystemClock);
    match seed {
        Some(seed) => RollSession::new(SessionConfig::default(), SeededRng::from_seed(seed), clock),
        None => RollSession::new(SessionConfig::default(), SeededRng::from_entropy(), clock),
    }
}

fn print_view(view: &SessionView) {
    let (x, y) = view.orientation.wrapped();
    println!(
        "roll #{:<3} face {}  pips {:?}  rest ({x:>5.1}, {y:>5.1})  transform {}",
        view.roll_trigger,
        view.current_value,
        view.pip_cells(),
        view.orientation.to_css_transform(),
    );
    if let Some(text) = &view.interpretation {
        println!("          {text}");
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let seed = env_number::<u64>("DICE_SEED")?;
    let rolls = env_number::<usize>("DICE_ROLLS")?.unwrap_or(3);

    let commentator = GeminiCommentator::from_env().context("building commentary client")?;
    if !commentator.is_configured() {
        tracing::warn!("API_KEY not set; commentary disabled");
    }

    let driver = SessionDriver::new(build_session(seed), Arc::new(commentator));

    for _ in 0..rolls {
        let Some(handle) = driver.roll() else {
            break;
        };
        tracing::info!(value = handle.started().value.get(), "spinning");
        handle.finished().await;
        print_view(&driver.view());
    }

    let view = driver.view();
    let tally = driver.with_session(|s| s.history().tally());
    println!();
    println!("history ({} rolls, newest first):", view.history.len());
    for record in &view.history {
        println!("  {} @ {}", record.value, record.timestamp_ms);
    }
    println!("tally 1..6: {tally:?}");
    println!("state hash: {}", view.state_hash());

    driver.shutdown();
    Ok(())
}
