//! Offline play loop: one session driven from stdin, narrated with fallback text.
//!
//! Usage: `play [config.toml]`. Set `RUST_LOG` to see engine logs on stderr.

use narrative_core::{EngineConfig, EngineError, SessionStore, StoryResponse};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("narrative_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut store = SessionStore::new(config);
    let id = store.create();
    print_response(&store.start_new_game(id).await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }
        print_response(&store.respond(id, input).await?);
    }

    Ok(())
}

fn print_response(reply: &StoryResponse) {
    println!("\n{}", reply.response);
    println!(
        "[{} - {}%] discoveries: {}",
        reply.progress.stage,
        reply.progress.percentage,
        reply.progress.discoveries.join(", ")
    );
}
