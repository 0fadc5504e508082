//! Tracker binary entry point: loads configuration, sets up tracing, builds the core
//! tracker, and starts the configured transport jobs.
use torrust_tracker::bootstrap;

#[tokio::main]
async fn main() {
    let (config, _tracing_level) = bootstrap::app::config();

    bootstrap::tracing::setup(&config);

    let tracker = bootstrap::app::tracker(&config);

    let jobs = torrust_tracker::app::start(&config, tracker).await;

    for job in jobs {
        let _ = job.await;
    }
}
