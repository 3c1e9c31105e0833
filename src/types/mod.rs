// src/types/mod.rs
pub mod telegram;

pub use telegram::{ChatId, Update};
