use std::future::Future;

use crate::api::{ApiError, Page};
use crate::fetch::Pagination;

/// Identifies one in-flight load; results carrying an old ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Whether a settled result was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Stale,
}

/// Remote data with its loading and error state
///
/// A page calls [`Resource::begin`] before issuing a request and
/// [`Resource::settle`] with the outcome. Every `begin` supersedes the
/// previous one, so a slow response for an old query can never overwrite
/// a newer one.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    data: Option<T>,
    loading: bool,
    error: Option<ApiError>,
    generation: u64,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Error text for display, using `fallback` when the server said nothing useful
    pub fn error_message(&self, fallback: &str) -> Option<String> {
        self.error.as_ref().map(|e| e.user_message(fallback))
    }

    /// Start a load. Previous data stays visible until the result arrives.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.generation)
    }

    /// Record the outcome of the load identified by `ticket`
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> Settled {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale result"
            );
            return Settled::Stale;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                self.data = None;
                self.error = Some(err);
            }
        }
        Settled::Applied
    }

    /// Run `fetch` to completion and settle its result
    ///
    /// Returns the error so the caller can react to 401s.
    pub async fn load<F, Fut>(&mut self, fetch: F) -> Result<(), ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let ticket = self.begin();
        let result = fetch().await;
        let outcome = result.as_ref().err().cloned();
        self.settle(ticket, result);
        match outcome {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Fetch again from scratch, e.g. behind a "Try again" button
    pub async fn reload<F, Fut>(&mut self, fetch: F) -> Result<(), ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.data = None;
        self.load(fetch).await
    }

    /// Replace the data locally, e.g. after a successful update
    pub fn set(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
        self.loading = false;
    }
}

/// A list resource together with its page controls
#[derive(Debug, Clone)]
pub struct PagedResource<T> {
    pub resource: Resource<Page<T>>,
    pub pagination: Pagination,
}

impl<T> PagedResource<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            resource: Resource::new(),
            pagination: Pagination::new(1, page_size, 0),
        }
    }

    pub fn items(&self) -> &[T] {
        self.resource
            .data()
            .map(|page| page.results.as_slice())
            .unwrap_or_default()
    }

    pub fn page(&self) -> u32 {
        self.pagination.page()
    }

    pub fn page_size(&self) -> u32 {
        self.pagination.page_size()
    }

    /// Fetch `page` and update the total page count from the response
    pub async fn load_page<F, Fut>(&mut self, page: u32, fetch: F) -> Result<(), ApiError>
    where
        F: FnOnce(u32, u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>>,
    {
        let page = page.max(1);
        let page_size = self.pagination.page_size();
        self.resource.load(|| fetch(page, page_size)).await?;
        let total = self
            .resource
            .data()
            .map(|p| p.total_count())
            .unwrap_or_default();
        self.pagination = Pagination::new(page, page_size, total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_result_is_discarded() {
        let mut resource: Resource<Vec<&str>> = Resource::new();
        let old = resource.begin();
        let new = resource.begin();

        assert_eq!(resource.settle(new, Ok(vec!["fever"])), Settled::Applied);
        assert_eq!(resource.settle(old, Ok(vec!["f"])), Settled::Stale);
        assert_eq!(resource.data(), Some(&vec!["fever"]));
        assert!(!resource.is_loading());
    }

    #[test]
    fn test_error_clears_data() {
        let mut resource = Resource::new();
        let ticket = resource.begin();
        resource.settle(ticket, Ok(1));
        let ticket = resource.begin();
        assert!(resource.is_loading());
        resource.settle(
            ticket,
            Err(ApiError::Server {
                status: 500,
                message: None,
            }),
        );
        assert_eq!(resource.data(), None);
        assert_eq!(
            resource.error_message("Failed to load"),
            Some("Failed to load".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_returns_error() {
        let mut resource: Resource<u32> = Resource::new();
        let err = resource
            .load(|| async { Err(ApiError::Unauthorized { message: None }) })
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!resource.is_loading());

        resource.load(|| async { Ok(7) }).await.unwrap();
        assert_eq!(resource.data(), Some(&7));
        assert!(resource.error().is_none());
    }

    #[tokio::test]
    async fn test_paged_load_updates_pagination() {
        let mut listing: PagedResource<u32> = PagedResource::new(10);
        listing
            .load_page(2, |page, size| async move {
                assert_eq!((page, size), (2, 10));
                Ok(Page {
                    results: (11..=20).collect(),
                    count: Some(25),
                    next: None,
                    previous: None,
                })
            })
            .await
            .unwrap();

        assert_eq!(listing.items().len(), 10);
        assert_eq!(listing.page(), 2);
        assert_eq!(listing.pagination.total_pages(), 3);
    }
}
