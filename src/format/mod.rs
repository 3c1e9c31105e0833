// src/format/mod.rs
pub mod chat;
pub mod csv_export;

pub use chat::{to_chunks, DEFAULT_MESSAGE_LIMIT};
pub use csv_export::{export_file_name, to_file, ExportFile};
