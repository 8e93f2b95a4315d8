//! Lectern scrape crate - headless page rendering and profile extraction.
//!
//! The review site populates its data client-side, so a plain HTTP fetch
//! sees incomplete content; `PageRenderer` abstracts a full browser load.
//! `ProfileExtractor` pulls the professor fields out of rendered HTML with
//! fixed CSS selectors coupled to the site's markup.

pub mod extractor;
pub mod renderer;

pub use extractor::ProfileExtractor;
pub use renderer::{ChromeRenderer, FixtureRenderer, PageRenderer};
