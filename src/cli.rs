// src/cli.rs
use crate::core::{ConfigManager, FsOps, TelegramClient};
use crate::delivery::DeliveryAdapter;
use crate::format::to_file;
use crate::listings::{ChromeRenderer, ListingExtractor, PageRenderer};
use crate::polling::run_polling;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "jobs-bot")]
#[command(about = "Telegram bot that relays the current job listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: BotCommand,

    /// YAML config file (falls back to JOBS_BOT_CONFIG, then ./config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum BotCommand {
    /// Receive updates through the webhook server
    Serve,
    /// Receive updates by long polling
    Poll,
    /// Scrape once and write the CSV locally
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Override the listings page
        #[arg(long)]
        url: Option<String>,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let manager = ConfigManager::load(cli.config)?;
    manager.ensure_directories().await?;
    info!("Configuration source: {}", manager.config_path.display());
    let renderer = Arc::new(ChromeRenderer::new(manager.config.render.clone()));

    match cli.command {
        BotCommand::Serve => {
            let client = Arc::new(telegram_client(&manager)?);
            let adapter = Arc::new(DeliveryAdapter::from_config(
                &manager,
                renderer,
                client.clone(),
            ));
            start_web_server(&manager.config.server, adapter, &client).await
        }
        BotCommand::Poll => {
            let client = Arc::new(telegram_client(&manager)?);
            let adapter = Arc::new(DeliveryAdapter::from_config(
                &manager,
                renderer,
                client.clone(),
            ));
            run_polling(client, adapter, manager.config.telegram.poll_timeout_secs).await
        }
        BotCommand::Export { out, url } => {
            let url = url.unwrap_or_else(|| manager.config.source.url.clone());
            let (path, job_count) = export_once(&manager, renderer.as_ref(), &url, &out).await?;
            println!("✓ Wrote {} jobs to {}", job_count, path.display());
            Ok(())
        }
    }
}

fn telegram_client(manager: &ConfigManager) -> Result<TelegramClient> {
    let telegram = &manager.config.telegram;
    TelegramClient::new(
        &telegram.api_base,
        manager.bot_token()?,
        Duration::from_secs(telegram.request_timeout_secs),
    )
    .context("Failed to build Telegram client")
}

async fn export_once(
    manager: &ConfigManager,
    renderer: &dyn PageRenderer,
    url: &str,
    out: &std::path::Path,
) -> Result<(PathBuf, usize)> {
    let markup = renderer.render(url).await?;
    let batch = ListingExtractor::new(&manager.config.selectors)?.extract(&markup)?;
    let file = to_file(&batch, &Local::now())?;

    let path = out.join(&file.file_name);
    FsOps::write_bytes(&path, &file.bytes).await?;
    info!("Exported {} jobs from {}", file.job_count, url);
    Ok((path, file.job_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RenderError;
    use async_trait::async_trait;

    struct StaticPage(&'static str);

    #[async_trait]
    impl PageRenderer for StaticPage {
        async fn render(&self, _url: &str) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_parse_export_args() {
        let cli = Cli::try_parse_from([
            "jobs-bot",
            "export",
            "--out",
            "/tmp/out",
            "--config",
            "bot.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bot.yaml")));
        assert_eq!(
            cli.command,
            BotCommand::Export {
                out: PathBuf::from("/tmp/out"),
                url: None
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["jobs-bot", "scrape"]).is_err());
        assert_eq!(
            Cli::try_parse_from(["jobs-bot", "poll"]).unwrap().command,
            BotCommand::Poll
        );
    }

    #[tokio::test]
    async fn test_export_once_writes_csv() {
        let out = std::env::temp_dir().join(format!("jobs-bot-cli-{}", uuid::Uuid::new_v4()));
        let manager = ConfigManager::load(Some(out.join("missing.yaml"))).unwrap();
        let page = StaticPage(
            r#"<div class="job-card"><h3 class="job-card-title">Rust Dev</h3>
               <p>Remote</p><a class="btn btn-primary" href="https://x.example/1">Apply</a></div>"#,
        );

        let (path, job_count) = export_once(&manager, &page, "https://jobs.example.com", &out)
            .await
            .unwrap();
        assert_eq!(job_count, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("JOB TITLE,DESCRIPTION,URL\r\n"));
        assert!(content.contains("Rust Dev,Remote,https://x.example/1"));

        std::fs::remove_dir_all(&out).unwrap();
    }
}
