//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tech_pulse::adapters::ai::{MockSummarizer, OpenAiAdapter};
use tech_pulse::adapters::cache::MemoryCache;
use tech_pulse::adapters::sources::{HackerNewsAdapter, NewsApiAdapter, build_client};
use tech_pulse::adapters::ui::tui::TuiInputPort;
use tech_pulse::ports::{FeedCachePort, InputPort, NewsSourcePort, SummarizerPort};
use tech_pulse::shared::AppConfig;
use tech_pulse::usecases::{FeedService, SummaryService};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    // Logs go to stderr so they do not interleave with the dashboard on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });

    tech_pulse::adapters::ui::init_ui();

    // --- HTTP: one client per process; every round trip is bounded by the timeout ---
    let timeout_secs = cfg.http_timeout_secs_or_default();
    let http = build_client(Duration::from_secs(timeout_secs))
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    info!(timeout_secs, "HTTP client ready");

    // --- Sources (merge order = registration order) ---
    let news_api = NewsApiAdapter::new(
        http.clone(),
        cfg.news_api_url_or_default(),
        cfg.news_api_key(),
    );
    let news_api_available = news_api.has_credentials();
    if !news_api_available {
        info!("NEWS_API_KEY not set, NewsAPI source disabled");
    }
    let sources: Vec<Arc<dyn NewsSourcePort>> = vec![
        Arc::new(HackerNewsAdapter::new(
            http.clone(),
            cfg.hacker_news_url_or_default(),
        )),
        Arc::new(news_api),
    ];

    // --- Cache (time-boxed, cleared by Refresh) ---
    let cache_ttl_secs = cfg.cache_ttl_secs_or_default();
    info!(cache_ttl_secs, "source cache TTL");
    let cache: Arc<dyn FeedCachePort> =
        Arc::new(MemoryCache::new(Duration::from_secs(cache_ttl_secs)));

    let feed_service = Arc::new(FeedService::new(sources, cache));

    // --- AI summaries ---
    let summarizer: Option<Arc<dyn SummarizerPort>> = if let Some(api_key) = cfg.ai_api_key() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "AI summaries enabled with OpenAI adapter"
        );
        Some(Arc::new(OpenAiAdapter::new(
            http.clone(),
            cfg.ai_api_url_or_default(),
            api_key,
            cfg.ai_model_or_default(),
        )))
    } else if cfg.use_mock_ai() {
        warn!("OPENAI_API_KEY not set, using mock summarizer");
        Some(Arc::new(MockSummarizer::new()))
    } else {
        info!("OPENAI_API_KEY not set, AI summaries disabled");
        None
    };
    let summary_service = Arc::new(SummaryService::new(summarizer));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&feed_service),
        Arc::clone(&summary_service),
        cfg.feed_config(),
        news_api_available,
    ));

    // --- Run (feed -> Summarize / Refresh / Settings / Quit) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
