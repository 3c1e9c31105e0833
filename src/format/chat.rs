// src/format/chat.rs
//! Paginates a job batch into chat-sized text messages.
//!
//! Lengths are UTF-16 code units, as Telegram counts them. Blocks are measured
//! before they are appended and never split while they fit the working
//! threshold. A block larger than the threshold (a very long link, say) is
//! spread over several chunks line by line, cutting only lines that are
//! themselves too long.

use crate::listings::{Job, JobBatch};
use crate::utils::{split_utf16, truncate_chars, utf16_len};

/// Telegram's message size limit
pub const DEFAULT_MESSAGE_LIMIT: usize = 4096;

/// Room kept free under the default limit for transport-side wrapping
pub const CHUNK_SAFETY_MARGIN: usize = 596;

/// Titles up to this many characters are shown as is. Output is plain text
/// with no column alignment, so shorter titles are not padded.
pub const TITLE_WIDTH: usize = 40;
pub const TITLE_KEEP: usize = 37;
pub const DESCRIPTION_PREVIEW: usize = 70;

const SEPARATOR_LINE: &str = "------------------------------";
const NO_DESCRIPTION: &str = "No description";

/// Largest chunk length the formatter aims for under `limit`
pub fn working_threshold(limit: usize) -> usize {
    let margin = limit.saturating_mul(CHUNK_SAFETY_MARGIN) / DEFAULT_MESSAGE_LIMIT;
    limit.saturating_sub(margin).max(1)
}

pub fn display_title(title: &str) -> String {
    truncate_chars(title, TITLE_WIDTH, TITLE_KEEP)
}

pub fn description_preview(description: &str) -> String {
    if description.is_empty() {
        return NO_DESCRIPTION.to_string();
    }
    truncate_chars(description, DESCRIPTION_PREVIEW, DESCRIPTION_PREVIEW)
}

pub fn header_line(count: usize) -> String {
    match count {
        1 => "Found 1 job\n\n".to_string(),
        n => format!("Found {} jobs\n\n", n),
    }
}

/// One job as it appears in a message; `index` is 1-based
pub fn format_job_block(index: usize, job: &Job) -> String {
    format!(
        "{}. {}\n📝 {}\n🔗 {}\n{}\n",
        index,
        display_title(&job.title),
        description_preview(&job.description),
        job.url,
        SEPARATOR_LINE
    )
}

pub fn to_chunks(batch: &JobBatch, limit: usize) -> Vec<String> {
    if batch.is_empty() {
        return vec!["Found 0 jobs. Nothing is listed right now, try again later.".to_string()];
    }

    let mut chunker = Chunker::new(working_threshold(limit), header_line(batch.len()));
    for (position, job) in batch.iter().enumerate() {
        let block = format_job_block(position + 1, job);
        if utf16_len(&block) <= chunker.threshold {
            chunker.push_whole(&block);
        } else {
            for line in block.split_inclusive('\n') {
                if utf16_len(line) <= chunker.threshold {
                    chunker.push_whole(line);
                } else {
                    chunker.push_split(line);
                }
            }
        }
    }
    chunker.finish()
}

struct Chunker {
    threshold: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Chunker {
    fn new(threshold: usize, header: String) -> Self {
        Self {
            threshold,
            chunks: Vec::new(),
            current_len: utf16_len(&header),
            current: header,
        }
    }

    /// Append `text` intact, opening a new chunk first if it would not fit
    fn push_whole(&mut self, text: &str) {
        let len = utf16_len(text);
        if self.current_len > 0 && self.current_len + len > self.threshold {
            self.close();
        }
        self.current.push_str(text);
        self.current_len += len;
    }

    /// Append `text` across as many chunks as it takes, filling the current one first
    fn push_split(&mut self, mut text: &str) {
        while !text.is_empty() {
            let room = self.threshold.saturating_sub(self.current_len).max(1);
            let head = split_utf16(text, room)[0];
            let len = utf16_len(head);
            if self.current_len > 0 && self.current_len + len > self.threshold {
                self.close();
                continue;
            }
            self.current.push_str(head);
            self.current_len += len;
            text = &text[head.len()..];
        }
    }

    fn close(&mut self) {
        let chunk = std::mem::take(&mut self.current);
        self.current_len = 0;
        let trimmed = chunk.trim_end();
        if !trimmed.is_empty() {
            self.chunks.push(trimmed.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.close();
        self.chunks
    }
}
