// src/listings/extractor.rs
use super::types::{Job, JobBatch, FRAGMENT_SEPARATOR};
use crate::errors::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with a listing container that has no title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTitlePolicy {
    /// Drop the listing, log it and keep going
    #[default]
    Skip,
    /// Fail the whole batch
    Fail,
}

/// CSS selectors describing the listing page layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub container: String,
    pub title: String,
    pub fragment: String,
    pub link: String,
    pub link_attribute: String,
    pub missing_title: MissingTitlePolicy,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: "div.job-card".to_string(),
            title: "h3.job-card-title".to_string(),
            fragment: "p".to_string(),
            link: "a.btn.btn-primary".to_string(),
            link_attribute: "href".to_string(),
            missing_title: MissingTitlePolicy::Skip,
        }
    }
}

pub struct ListingExtractor {
    container: Selector,
    title: Selector,
    fragment: Selector,
    link: Selector,
    link_attribute: String,
    missing_title: MissingTitlePolicy,
}

impl ListingExtractor {
    pub fn new(selectors: &ListingSelectors) -> Result<Self, ExtractionError> {
        Ok(Self {
            container: Self::compile(&selectors.container)?,
            title: Self::compile(&selectors.title)?,
            fragment: Self::compile(&selectors.fragment)?,
            link: Self::compile(&selectors.link)?,
            link_attribute: selectors.link_attribute.clone(),
            missing_title: selectors.missing_title,
        })
    }

    /// Parse rendered markup into the jobs it lists, in document order
    pub fn extract(&self, markup: &str) -> Result<JobBatch, ExtractionError> {
        let document = Html::parse_document(markup);
        let mut jobs = Vec::new();

        for (position, container) in document.select(&self.container).enumerate() {
            let index = position + 1;

            let Some(title) = self.title_of(container) else {
                match self.missing_title {
                    MissingTitlePolicy::Fail => {
                        return Err(ExtractionError::MissingTitle { index });
                    }
                    MissingTitlePolicy::Skip => {
                        warn!("Skipping listing #{}: no title element", index);
                        continue;
                    }
                }
            };

            let description = container
                .select(&self.fragment)
                .map(element_text)
                .collect::<Vec<_>>()
                .join(FRAGMENT_SEPARATOR);

            let url = container
                .select(&self.link)
                .next()
                .and_then(|a| a.value().attr(&self.link_attribute))
                .map(str::to_string);

            jobs.push(Job::new(title, description, url));
        }

        let linkless = jobs.iter().filter(|job| !job.has_url()).count();
        debug!("Extracted {} listings, {} without a link", jobs.len(), linkless);
        Ok(JobBatch::new(jobs))
    }

    fn title_of(&self, container: ElementRef<'_>) -> Option<String> {
        container
            .select(&self.title)
            .next()
            .map(element_text)
            .filter(|title| !title.is_empty())
    }

    fn compile(selector: &str) -> Result<Selector, ExtractionError> {
        Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::MISSING_URL;

    const THREE_CARDS: &str = r#"
        <html><body><div id="listings">
          <div class="job-card">
            <h3 class="job-card-title">  Backend Engineer </h3>
            <p> Stockholm </p>
            <p>Rust, Postgres</p>
            <a class="btn btn-primary" href="https://example.com/jobs/1">Apply</a>
          </div>
          <div class="job-card">
            <h3 class="job-card-title">Data Analyst</h3>
            <p>Remote</p>
          </div>
          <div class="job-card">
            <h3 class="job-card-title">Site Reliability Engineer</h3>
            <p>Gothenburg</p>
            <p></p>
            <p>On-call <b>rotation</b></p>
            <a class="btn" href="/ignored">Details</a>
            <a class="btn btn-primary" href="/jobs/3">Apply</a>
          </div>
        </div></body></html>
    "#;

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(&ListingSelectors::default()).unwrap()
    }

    #[test]
    fn test_extracts_cards_in_document_order() {
        let batch = extractor().extract(THREE_CARDS).unwrap();
        assert_eq!(batch.len(), 3);

        let jobs = batch.jobs();
        assert_eq!(jobs[0].title, "Backend Engineer");
        assert_eq!(jobs[0].description, "Stockholm | Rust, Postgres");
        assert_eq!(jobs[0].url, "https://example.com/jobs/1");

        assert_eq!(jobs[1].title, "Data Analyst");
        assert_eq!(jobs[1].description, "Remote");
        assert_eq!(jobs[1].url, MISSING_URL);
        assert!(!jobs[1].has_url());

        assert_eq!(jobs[2].description, "Gothenburg |  | On-call rotation");
        assert_eq!(jobs[2].url, "/jobs/3");
    }

    #[test]
    fn test_extract_is_deterministic() {
        let ex = extractor();
        assert_eq!(ex.extract(THREE_CARDS).unwrap(), ex.extract(THREE_CARDS).unwrap());
    }

    #[test]
    fn test_link_without_href_uses_sentinel() {
        let markup = r#"<div class="job-card"><h3 class="job-card-title">QA</h3>
            <a class="btn btn-primary">Apply</a></div>"#;
        let batch = extractor().extract(markup).unwrap();
        assert_eq!(batch.jobs()[0].url, MISSING_URL);
        assert_eq!(batch.jobs()[0].description, "");
    }

    #[test]
    fn test_missing_title_is_skipped_by_default() {
        let markup = r#"
            <div class="job-card"><p>no title here</p></div>
            <div class="job-card"><h3 class="job-card-title">   </h3></div>
            <div class="job-card"><h3 class="job-card-title">Kept</h3></div>"#;
        let batch = extractor().extract(markup).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.jobs()[0].title, "Kept");
    }

    #[test]
    fn test_missing_title_fails_batch_when_configured() {
        let selectors = ListingSelectors {
            missing_title: MissingTitlePolicy::Fail,
            ..ListingSelectors::default()
        };
        let markup = r#"
            <div class="job-card"><h3 class="job-card-title">First</h3></div>
            <div class="job-card"><p>broken</p></div>"#;
        let err = ListingExtractor::new(&selectors)
            .unwrap()
            .extract(markup)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::MissingTitle { index: 2 }));
    }

    #[test]
    fn test_page_without_cards_yields_empty_batch() {
        let batch = extractor().extract("<html><body><p>Nothing</p></body></html>").unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let selectors = ListingSelectors {
            container: "div[".to_string(),
            ..ListingSelectors::default()
        };
        let err = ListingExtractor::new(&selectors).err().unwrap();
        assert!(matches!(err, ExtractionError::InvalidSelector { .. }));
    }
}
