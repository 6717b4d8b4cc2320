//! Terminal chat with the mascot.
//!
//! Usage: `mascot-chat [config.toml]`
//!
//! Type a message and press enter. Emotion changes are printed as they
//! happen. `/history` dumps the transcript as JSON, `/state` the controller
//! snapshot, `/prompts` the starter prompts, `/quit` exits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mascot_chat::driver::LlmDriver;
use mascot_chat::events::on_key_down;
use mascot_chat::runtime::MascotHandle;
use mascot_chat::session::ChatSession;
use mascot_chat::stage::Stage;
use mascot_core::catalog::EmotionCatalog;
use mascot_core::config::MascotConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => MascotConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MascotConfig::default(),
    };

    init_tracing(&config);

    let catalog = Arc::new(EmotionCatalog::new(&config.catalog));
    let driver = LlmDriver::from_config(&config, &catalog).context("configuring chat backend")?;
    let mascot = MascotHandle::spawn(&config, Arc::clone(&catalog));
    let stage = Stage::new(mascot.clone());
    let mut chat = ChatSession::new(driver, mascot.clone(), &config.chat);

    let mut emotions = mascot.subscribe();
    let printer = tokio::spawn(async move {
        while emotions.changed().await.is_ok() {
            let emotion = *emotions.borrow_and_update();
            println!("  (mascot: {emotion})");
        }
    });

    println!("[{}] {}", config.chat.persona_name, chat.history()[0].content);
    println!("  (mascot: {} -> {})", mascot.current(), stage.current_asset());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        on_key_down(&mascot, "Enter");
        match line.trim() {
            "/quit" => break,
            "/history" => println!("{}", serde_json::to_string_pretty(chat.history())?),
            "/state" => println!("{}", serde_json::to_string_pretty(&mascot.snapshot().await?)?),
            "/prompts" => {
                for prompt in chat.starter_prompts() {
                    println!("  - {prompt}");
                }
            }
            input => {
                if let Some(reply) = chat.send(input).await {
                    println!("[{}] {}", config.chat.persona_name, reply.content);
                }
            }
        }
    }

    mascot.teardown().await;
    printer.await?;
    Ok(())
}

fn init_tracing(config: &MascotConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.general.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
