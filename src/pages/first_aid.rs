use super::{Effect, Form};
use crate::api::{ApiError, FirstAidGuide, MediHelpApi};
use crate::fetch::{Resource, Settled, Ticket};

/// Fetch the full listing for a blank query, otherwise search
pub async fn fetch_guides(
    api: &dyn MediHelpApi,
    query: &str,
) -> Result<Vec<FirstAidGuide>, ApiError> {
    let query = query.trim();
    let page = if query.is_empty() {
        api.first_aid().await?
    } else {
        api.search_first_aid(query).await?
    };
    Ok(page.results)
}

/// First aid guides with a search box
///
/// The search box is debounced by the caller; this page only tracks which
/// request is current so late answers for old queries are ignored.
#[derive(Debug, Clone, Default)]
pub struct FirstAidPage {
    guides: Resource<Vec<FirstAidGuide>>,
    query: String,
    selected: usize,
}

impl FirstAidPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        self.query.clear();
        self.search(api).await
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Update the search box; the returned text is what should be debounced
    pub fn set_query(&mut self, query: impl Into<String>) -> String {
        self.query = query.into();
        self.query.clone()
    }

    /// Mark a request for `query` as in flight
    pub fn begin_search(&mut self) -> Ticket {
        self.guides.begin()
    }

    /// Apply the answer to the request identified by `ticket`
    ///
    /// Stale answers are discarded, except that a 401 still reports expiry.
    pub fn finish_search(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<FirstAidGuide>, ApiError>,
    ) -> Effect {
        let expired = matches!(&result, Err(err) if err.is_unauthorized());
        if let Settled::Applied = self.guides.settle(ticket, result) {
            self.selected = 0;
        }
        // A rejected token ends the session even when the answer is stale
        if expired {
            Effect::SessionExpired
        } else {
            Effect::Stay
        }
    }

    /// Run the current query to completion
    pub async fn search(&mut self, api: &dyn MediHelpApi) -> Effect {
        let ticket = self.begin_search();
        let result = fetch_guides(api, &self.query).await;
        self.finish_search(ticket, result)
    }

    pub fn guides(&self) -> &[FirstAidGuide] {
        self.guides.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.guides.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.guides
            .error_message("Failed to fetch first aid guides")
    }

    pub fn selected(&self) -> Option<&FirstAidGuide> {
        self.guides().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.guides().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

impl Form for FirstAidPage {
    fn labels(&self) -> &'static [&'static str] {
        &["Search"]
    }

    fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.query),
            _ => None,
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.query),
            _ => None,
        }
    }
}
