use std::process::ExitCode;
use std::sync::Arc;

use tracing::warn;

use iss_tracker::{AppState, Config, DatasetProvider, FileProvider, Server};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    let provider = match FileProvider::open(&config.dataset) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(every) = config.refresh {
        let reloader = Arc::clone(&provider);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                if let Err(e) = reloader.reload() {
                    // Keep serving the previous snapshot.
                    warn!("dataset reload failed: {e}");
                }
            }
        });
    }

    let state = AppState::new(provider as Arc<dyn DatasetProvider>);

    if let Err(e) = Server::bind(config.addr).serve(state).await {
        eprintln!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
