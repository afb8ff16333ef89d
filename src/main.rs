use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;

use gamtrack::api::client::{ApiClient, ApiConfig, DEFAULT_BACKEND_URL};
use gamtrack::api::ProgressApi;
use gamtrack::progress::{self, commentary};
use gamtrack::risk::RiskConfigurator;
use gamtrack::store::daily::DailyQuestionsCache;
use gamtrack::store::session::{SessionGate, SessionStatus};
use gamtrack::store::stats::StatsCache;
use gamtrack::store;
use gamtrack::sync::SyncOperation;

#[tokio::main]
async fn main() -> Result<()> {
    // Begin logger
    env_logger::init();

    // Load backend settings
    dotenv().ok();
    let config = ApiConfig {
        base_url: env::var("GAMTRACK_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
        api_key: env::var("GAMTRACK_API_KEY")
            .context("Expected 'GAMTRACK_API_KEY=<key>' in .env in project root.")?,
    };

    let api = Arc::new(ApiClient::new(config)?);
    api.on_session_expired(|| {
        log::warn!("Session expired. Please login again.");
    });

    let gate = SessionGate::new(api.clone());
    let stats = Arc::new(StatsCache::new(api.clone()));
    let daily = Arc::new(DailyQuestionsCache::new(api.clone()));

    // Resolve the session; GAMTRACK_DEV_EMAIL takes the dev-login path.
    let status = match env::var("GAMTRACK_DEV_EMAIL") {
        Ok(email) => gate.login_dev(&email).await?,
        Err(_) => gate.refresh().await?,
    };

    let user = match status {
        SessionStatus::Anonymous => {
            println!("Not logged in.");
            return Ok(());
        }
        SessionStatus::Authenticated(user) => user,
    };
    api.set_at_entry_point(false);

    // Populate the caches for this identity.
    store::apply_session_change(&stats, &daily, &gate.status()).await;
    if daily.read().await.is_none() {
        daily
            .refresh()
            .await
            .context("Could not load today's problem set.")?;
    }

    if env::var("GAMTRACK_SYNC").is_ok_and(|v| v == "1") {
        println!("Syncing with LeetCode, this can take a while...");
        let sync = SyncOperation::new(api.clone(), stats.clone(), daily.clone());
        sync.run().await.context("Sync failed, try again later.")?;
        println!("Progress synchronized with LeetCode!");
    }

    let snapshot = match stats.read().await {
        Some(snapshot) => snapshot,
        None => stats.refresh().await.context("Could not load stats.")?,
    };

    println!("Welcome back, {}!", user.name);
    println!(
        "Level {} ({} / {} XP, {}%)",
        progress::level(snapshot.total_xp),
        progress::xp_into_level(snapshot.total_xp),
        progress::XP_PER_LEVEL,
        progress::level_progress_percent(snapshot.total_xp),
    );
    println!("{snapshot}");

    let loss = commentary::loss_commentary(snapshot.lifetime_loss);
    let streak = commentary::streak_commentary(snapshot.current_streak);
    let solved = commentary::solved_commentary(snapshot.problems_solved);
    println!("Losses: {} ({})", loss.main, loss.sub);
    println!("Streak: {} ({})", streak.main, streak.sub);
    println!("Solved: {} ({})", solved.main, solved.sub);

    if !snapshot.leetcode_connected {
        println!("LeetCode is not connected; curated problems are unavailable.");
    } else if let Some(questions) = daily.read().await {
        println!(
            "Daily progress: {} of 3 ({}%)",
            progress::daily_solved_count(&questions),
            progress::daily_progress_percent(&questions),
        );
        for question in [&questions.easy, &questions.medium, &questions.hard] {
            println!("{question}");
        }
    }

    let risk = RiskConfigurator::from_snapshot(&snapshot);
    println!(
        "Mode: {} | daily risk: Rs {} | {}",
        risk.mode(),
        risk.amount(),
        if risk.is_locked() { "locked for today" } else { "editable" },
    );
    println!(
        "A missed challenge right now would cost Rs {}.",
        progress::penalty_preview(&snapshot),
    );

    if snapshot.zerodha_connected {
        match api.fetch_margins().await {
            Ok(margins) => println!("Available margin: Rs {:.2}", margins.available),
            Err(err) => log::error!("Could not fetch margins: {err}"),
        }
    }

    Ok(())
}
