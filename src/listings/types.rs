// src/listings/types.rs
use serde::{Deserialize, Serialize};

/// Placeholder url for a listing without an action link
pub const MISSING_URL: &str = "N/A";

/// Separator between paragraph fragments of a description
pub const FRAGMENT_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl Job {
    pub fn new(title: impl Into<String>, description: impl Into<String>, url: Option<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.unwrap_or_else(|| MISSING_URL.to_string()),
        }
    }

    pub fn has_url(&self) -> bool {
        self.url != MISSING_URL
    }
}

/// Jobs of one extraction, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBatch {
    jobs: Vec<Job>,
}

impl JobBatch {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }
}

impl<'a> IntoIterator for &'a JobBatch {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
