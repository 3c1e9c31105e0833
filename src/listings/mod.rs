// src/listings/mod.rs
pub mod extractor;
pub mod renderer;
pub mod types;

pub use extractor::{ListingExtractor, ListingSelectors, MissingTitlePolicy};
pub use renderer::{ChromeRenderer, PageRenderer, RenderSettings};
pub use types::{Job, JobBatch, FRAGMENT_SEPARATOR, MISSING_URL};
