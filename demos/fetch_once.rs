// Run one poll cycle against a backend and print the resulting dashboard view as JSON.
//
// Usage: cargo run --example fetch_once -- [BASE_URL] [TIMEOUT_MS]
//   BASE_URL    default: http://localhost:8000
//   TIMEOUT_MS  default: 10000

use airguard::acquisition::Acquisition;
use airguard::source::HttpSource;
use airguard::view;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let base_url = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("http://localhost:8000");
    let timeout_ms: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let timeout = Duration::from_millis(timeout_ms);

    let source = HttpSource::new(base_url, timeout)?;
    let mut acquisition = Acquisition::new();
    let snapshot = acquisition.poll_once(&source, timeout).await;

    println!("{}", serde_json::to_string_pretty(&view::render(snapshot))?);
    Ok(())
}
