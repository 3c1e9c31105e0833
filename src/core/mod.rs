// src/core/mod.rs
//! Shared services: configuration, filesystem helpers and the Telegram client

pub mod config_manager;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
pub use service_client::TelegramClient;
