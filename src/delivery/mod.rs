// src/delivery/mod.rs
//! Chat commands wired to the render → extract → format → send pipeline

pub mod commands;
pub mod transport;

pub use commands::{Command, GREETING};
pub use transport::ChatTransport;

use crate::core::fs_ops::TempArtifact;
use crate::core::ConfigManager;
use crate::errors::{DeliveryError, ExportError, PipelineError, PipelineResult};
use crate::format::{to_chunks, to_file};
use crate::listings::{JobBatch, ListingExtractor, ListingSelectors, PageRenderer};
use crate::types::{ChatId, Update};
use crate::utils::caption_timestamp;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Rendering,
    Extracting,
    Formatting,
    Sending,
    Failed,
}

/// Progress of one command; nothing in here outlives the command
struct Invocation {
    command: Command,
    chat_id: ChatId,
    stage: Stage,
    started: Instant,
}

impl Invocation {
    fn start(command: Command, chat_id: ChatId) -> Self {
        info!("/{} requested by chat {}", command.name(), chat_id);
        Self {
            command,
            chat_id,
            stage: Stage::Idle,
            started: Instant::now(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!(
            "/{} chat {}: {:?} -> {:?}",
            self.command.name(),
            self.chat_id,
            self.stage,
            stage
        );
        self.stage = stage;
    }

    fn fail(mut self, err: &PipelineError) {
        let failed_in = self.stage;
        self.enter(Stage::Failed);
        error!(
            "/{} for chat {} failed while {:?}: {}",
            self.command.name(),
            self.chat_id,
            failed_in,
            err
        );
        self.enter(Stage::Idle);
    }

    fn complete(mut self) {
        self.enter(Stage::Idle);
        info!(
            "/{} for chat {} done in {:?}",
            self.command.name(),
            self.chat_id,
            self.started.elapsed()
        );
    }
}

pub struct DeliveryAdapter {
    renderer: Arc<dyn PageRenderer>,
    transport: Arc<dyn ChatTransport>,
    source_url: String,
    selectors: ListingSelectors,
    message_limit: usize,
    temp_dir: PathBuf,
}

impl DeliveryAdapter {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        transport: Arc<dyn ChatTransport>,
        source_url: String,
        selectors: ListingSelectors,
        message_limit: usize,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            renderer,
            transport,
            source_url,
            selectors,
            message_limit,
            temp_dir,
        }
    }

    pub fn from_config(
        config: &ConfigManager,
        renderer: Arc<dyn PageRenderer>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let config = &config.config;
        Self::new(
            renderer,
            transport,
            config.source.url.clone(),
            config.selectors.clone(),
            config.chat.message_limit,
            config.export.temp_dir.clone(),
        )
    }

    /// Handle an inbound update on its own task so slow renders never block
    /// the caller or other chats
    pub fn spawn_update(self: &Arc<Self>, update: Update) -> Option<JoinHandle<()>> {
        let (chat_id, text) = update.text_message()?;
        let text = text.to_string();
        let adapter = Arc::clone(self);
        Some(tokio::spawn(async move {
            adapter.handle_text(chat_id, &text).await;
        }))
    }

    /// Route an inbound chat text; anything that is not a known command is ignored
    pub async fn handle_text(&self, chat_id: ChatId, text: &str) {
        let Some(command) = Command::parse(text) else {
            debug!("Ignoring non-command message from chat {}", chat_id);
            return;
        };

        let outcome = match command {
            Command::Greet => self.greet(chat_id).await.map(|_| 0),
            Command::Table => self.deliver_table(chat_id).await,
            Command::File => self.deliver_file(chat_id).await,
        };

        if let Err(e) = outcome {
            debug!("/{} ended with error: {}", command.name(), e);
        }
    }

    pub async fn greet(&self, chat_id: ChatId) -> PipelineResult<()> {
        self.transport.send_text(chat_id, GREETING).await?;
        Ok(())
    }

    /// Send the listings as chat messages; returns the number of messages sent
    pub async fn deliver_table(&self, chat_id: ChatId) -> PipelineResult<usize> {
        let mut run = Invocation::start(Command::Table, chat_id);
        let result = self.send_table(&mut run).await;
        self.finish(run, result).await
    }

    /// Send the listings as a CSV attachment; returns the number of jobs in it
    pub async fn deliver_file(&self, chat_id: ChatId) -> PipelineResult<usize> {
        let mut run = Invocation::start(Command::File, chat_id);
        let result = self.send_file(&mut run).await;
        self.finish(run, result).await
    }

    async fn render_and_extract(&self, run: &mut Invocation) -> PipelineResult<JobBatch> {
        run.enter(Stage::Rendering);
        let markup = self.renderer.render(&self.source_url).await?;

        run.enter(Stage::Extracting);
        let batch = ListingExtractor::new(&self.selectors)?.extract(&markup)?;
        info!("Extracted {} jobs from {}", batch.len(), self.source_url);
        Ok(batch)
    }

    async fn send_table(&self, run: &mut Invocation) -> PipelineResult<usize> {
        let batch = self.render_and_extract(run).await?;

        run.enter(Stage::Formatting);
        let chunks = to_chunks(&batch, self.message_limit);

        run.enter(Stage::Sending);
        let total = chunks.len();
        for (sent, chunk) in chunks.iter().enumerate() {
            if let Err(e) = self.transport.send_text(run.chat_id, chunk).await {
                if sent == 0 {
                    return Err(e.into());
                }
                return Err(DeliveryError::Partial {
                    sent,
                    total,
                    reason: e.to_string(),
                }
                .into());
            }
        }
        Ok(total)
    }

    async fn send_file(&self, run: &mut Invocation) -> PipelineResult<usize> {
        let batch = self.render_and_extract(run).await?;

        run.enter(Stage::Formatting);
        let now = Local::now();
        let export = to_file(&batch, &now)?;
        let artifact = TempArtifact::write(&self.temp_dir, &export.file_name, &export.bytes)
            .await
            .map_err(ExportError::from)?;

        run.enter(Stage::Sending);
        let bytes = tokio::fs::read(artifact.path())
            .await
            .map_err(DeliveryError::from)?;
        let caption = format!(
            "📄 {} jobs, generated {}",
            export.job_count,
            caption_timestamp(&now)
        );
        self.transport
            .send_document(run.chat_id, artifact.file_name(), bytes, &caption)
            .await?;

        Ok(export.job_count)
    }

    async fn finish<T>(&self, run: Invocation, result: PipelineResult<T>) -> PipelineResult<T> {
        match &result {
            Ok(_) => run.complete(),
            Err(e) => {
                let chat_id = run.chat_id;
                run.fail(e);
                if let Err(send_err) = self.transport.send_text(chat_id, &e.user_message()).await {
                    warn!("Could not report failure to chat {}: {}", chat_id, send_err);
                }
            }
        }
        result
    }
}
