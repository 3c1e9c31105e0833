// src/delivery/commands.rs
use crate::utils::command_name;

pub const GREETING: &str = "👋 Hi! I collect today's tech job listings.\n\n\
Commands:\n\
/jobs - show the current listings as messages\n\
/getcsv - get the listings as a CSV file\n\
/help - show this message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Greet,
    Table,
    File,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        match command_name(text)?.to_ascii_lowercase().as_str() {
            "start" | "help" => Some(Command::Greet),
            "jobs" => Some(Command::Table),
            "getcsv" => Some(Command::File),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Greet => "help",
            Command::Table => "jobs",
            Command::File => "getcsv",
        }
    }
}
