//! Page URLs for the Violation Tracker search listing.

use url::Url;

use crate::FetchError;

/// Search listing for Puerto Rico violations, newest penalty year first.
pub const DEFAULT_SEARCH_URL: &str = "https://violationtracker.goodjobsfirst.org/?company_op=starts&company=&penalty_op=%3E&penalty=&offense_group=&case_category=&govt_level=&agency_code_st%5B%5D=&pres_term=&case_type=&free_text=&hq_id=&state=PR&order=pen_year&sort=";

/// A search listing whose result pages are addressed by a `page` parameter.
///
/// Page 1 is the bare listing URL; later pages append `page=<n>`.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    base: Url,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_SEARCH_URL).expect("default search url is valid"),
        }
    }
}

impl SearchQuery {
    /// Creates a query for a custom listing URL. Used for testing with wiremock.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            base: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL for the given 1-indexed page.
    pub fn page_url(&self, page: u32) -> Url {
        if page <= 1 {
            return self.base.clone();
        }
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        url
    }
}
