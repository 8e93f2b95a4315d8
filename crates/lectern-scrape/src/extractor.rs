//! Profile extraction from rendered review pages.
//!
//! The selectors are an external contract with one specific version of the
//! review site's markup. A structural change on the site produces empty
//! extractions, which the ingestion pipeline rejects; that validation is the
//! only defense against malformed scrapes.

use scraper::{Html, Selector};

use lectern_core::types::ExtractedProfile;

/// Pre-parsed selectors for the professor profile page.
#[derive(Clone)]
struct ProfileSelectors {
    first_name: Selector,
    last_name: Selector,
    department: Selector,
    rating: Selector,
}

impl ProfileSelectors {
    fn new() -> Self {
        Self {
            first_name: Selector::parse("div.NameTitle__Name-dowf0z-0 span")
                .expect("first name selector"),
            last_name: Selector::parse("span.NameTitle__LastNameWrapper-dowf0z-2")
                .expect("last name selector"),
            department: Selector::parse(
                "div.NameTitle__Title-dowf0z-1 a.TeacherDepartment__StyledDepartmentLink-fl79e8-0.iMmVHb b",
            )
            .expect("department selector"),
            rating: Selector::parse(".RatingValue__Numerator-qw8sqy-2").expect("rating selector"),
        }
    }
}

/// Extracts professor name, department, and rating from rendered HTML.
#[derive(Clone)]
pub struct ProfileExtractor {
    selectors: ProfileSelectors,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileExtractor {
    pub fn new() -> Self {
        Self {
            selectors: ProfileSelectors::new(),
        }
    }

    /// Pull the profile fields out of a rendered document.
    ///
    /// Fields that fail to match come back empty; completeness is the
    /// caller's check via [`ExtractedProfile::is_complete`].
    pub fn extract(&self, html: &str) -> ExtractedProfile {
        let document = Html::parse_document(html);

        let first = first_text(&document, &self.selectors.first_name);
        // The last-name wrapper carries stray quote characters on the live site.
        let last = first_text(&document, &self.selectors.last_name)
            .replace('"', "")
            .trim()
            .to_string();

        let name = format!("{} {}", first, last).trim().to_string();

        // The department anchor text ends with a literal "department" label.
        let department = first_text(&document, &self.selectors.department)
            .replacen("department", "", 1)
            .trim()
            .to_string();

        let rating = first_text(&document, &self.selectors.rating)
            .trim()
            .to_string();

        ExtractedProfile {
            name,
            department,
            rating,
        }
    }
}

/// Concatenated text of the first element matching `selector`, if any.
fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}
