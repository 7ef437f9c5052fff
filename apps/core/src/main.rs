// StoryAssist terminal chat
// Reads one message per line and prints every response as JSON.

use std::sync::Arc;

use anyhow::Context;
use storyassist_core::{load_stories, ChatConfig, ChatSupervisorHandle, InMemoryStoryStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

const CONFIRM: &str = "/ja";
const DISCARD: &str = "/nein";
const QUIT: &str = "/quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // stdout carries the JSON responses, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::from_env().context("invalid configuration")?;
    info!("storyassist v{} starting", env!("CARGO_PKG_VERSION"));

    let stories = match &config.stories_path {
        Some(path) => load_stories(path)
            .await
            .with_context(|| format!("failed to load stories from {}", path.display()))?,
        None => {
            warn!("STORYASSIST_STORIES_PATH not set, starting with an empty workspace");
            Vec::new()
        }
    };

    let store = Arc::new(InMemoryStoryStore::new(stories)?);
    let supervisor = ChatSupervisorHandle::new(store, config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let result = match input {
            QUIT => break,
            CONFIRM => supervisor.confirm_pending().await,
            DISCARD => supervisor.discard_pending().await,
            _ => supervisor.process_message(input.to_string()).await,
        };

        match result {
            Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
            Err(e) => error!("Request failed: {}", e),
        }
    }

    supervisor.shutdown().await?;
    info!("storyassist stopped");
    Ok(())
}
