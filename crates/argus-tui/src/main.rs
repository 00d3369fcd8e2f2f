//! Argus TUI entry point.

use argus_tui::Runtime;
use clap::Parser;

/// Argus terminal dashboard
#[derive(Parser, Debug)]
#[command(name = "argus-tui")]
#[command(about = "Terminal dashboard for live media-playback sessions")]
#[command(version)]
struct Args {
    /// WebSocket endpoint of the aggregator feed
    ///
    /// If not provided, runs in demo mode against an in-process sample feed.
    #[arg(short, long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let runtime = match args.endpoint {
        Some(endpoint) => Runtime::with_endpoint(endpoint).await?,
        None => Runtime::demo().await?,
    };

    Ok(runtime.run().await?)
}

/// Log to a file when `RUST_LOG` is set. The terminal is in raw mode while
/// the dashboard runs, so stderr output would corrupt the screen.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Ok(file) = std::fs::File::create("argus-tui.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
