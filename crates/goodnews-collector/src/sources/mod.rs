//! Search providers that turn a keyword into raw article hits.

mod google;

use std::future::Future;

pub use google::GoogleSearchClient;

use crate::error::CollectorError;
use crate::types::RawResult;

/// One page of results for one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl SearchRequest {
    /// 1-based index of the first result on this page.
    #[must_use]
    pub fn start_index(&self) -> u32 {
        self.page.saturating_sub(1) * self.page_size + 1
    }
}

/// A keyword search backend.
///
/// "No results" is an empty `Vec`, never an error. Errors mean the call
/// itself failed.
pub trait SearchProvider {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<RawResult>, CollectorError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_index_is_one_based_per_page() {
        let mut request = SearchRequest {
            keyword: "pets".to_string(),
            page: 1,
            page_size: 10,
        };
        assert_eq!(request.start_index(), 1);
        request.page = 3;
        assert_eq!(request.start_index(), 21);
    }
}
