use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Effect, Form};
use crate::api::{Article, MediHelpApi, Video};
use crate::constants::ARTICLE_PREVIEW_CHARS;
use crate::fetch::Resource;

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#)
        .expect("valid youtube pattern")
});

/// Eleven character video id from any of the usual YouTube URL shapes
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First `limit` characters of `content`, with "..." when cut
pub fn truncate_preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

fn video_is_published(video: &Video) -> bool {
    video
        .is_published
        .unwrap_or_else(|| video.published_at.is_some())
}

/// Published articles with per-article expand toggles
#[derive(Debug, Clone, Default)]
pub struct ArticlesPage {
    articles: Resource<Vec<Article>>,
    expanded: HashSet<i64>,
}

impl ArticlesPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let result = self
            .articles
            .load(|| async {
                api.articles().await.map(|page| {
                    page.results
                        .into_iter()
                        .filter(|a| a.is_published)
                        .collect::<Vec<_>>()
                })
            })
            .await;
        Effect::from_result(result)
    }

    pub fn articles(&self) -> &[Article] {
        self.articles.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.articles.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.articles.error_message("Failed to fetch articles")
    }

    pub fn toggle(&mut self, id: i64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    /// Body text as it should be shown right now
    pub fn body(&self, article: &Article) -> String {
        if self.is_expanded(article.id) {
            article.content.clone()
        } else {
            truncate_preview(&article.content, ARTICLE_PREVIEW_CHARS)
        }
    }
}

/// Videos that have been published
#[derive(Debug, Clone, Default)]
pub struct VideosPage {
    videos: Resource<Vec<Video>>,
}

impl VideosPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let result = self
            .videos
            .load(|| async {
                api.videos().await.map(|page| {
                    page.results
                        .into_iter()
                        .filter(|v| v.published_at.is_some())
                        .collect::<Vec<_>>()
                })
            })
            .await;
        Effect::from_result(result)
    }

    pub fn videos(&self) -> &[Video] {
        self.videos.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.videos.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.videos.error_message("Failed to fetch videos")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EducationTab {
    #[default]
    Articles,
    Videos,
}

/// Articles and videos side by side with a shared search box
#[derive(Debug, Clone, Default)]
pub struct EducationPage {
    content: Resource<(Vec<Article>, Vec<Video>)>,
    pub tab: EducationTab,
    pub query: String,
}

impl EducationPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both listings are fetched together; either failing fails the page
    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let result = self
            .content
            .load(|| async {
                futures::try_join!(api.articles(), api.videos()).map(|(articles, videos)| {
                    let articles = articles
                        .results
                        .into_iter()
                        .filter(|a| a.is_published)
                        .collect::<Vec<_>>();
                    let videos = videos
                        .results
                        .into_iter()
                        .filter(video_is_published)
                        .collect::<Vec<_>>();
                    (articles, videos)
                })
            })
            .await;
        Effect::from_result(result)
    }

    pub fn is_loading(&self) -> bool {
        self.content.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.content
            .error_message("Failed to fetch educational content")
    }

    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            EducationTab::Articles => EducationTab::Videos,
            EducationTab::Videos => EducationTab::Articles,
        };
    }

    /// Articles matching the query on title, summary or tags
    pub fn articles(&self) -> Vec<&Article> {
        let query = self.query.to_lowercase();
        self.content
            .data()
            .map(|(articles, _)| {
                articles
                    .iter()
                    .filter(|a| {
                        a.title.to_lowercase().contains(&query)
                            || a.summary.to_lowercase().contains(&query)
                            || a.tags.join(", ").to_lowercase().contains(&query)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Videos matching the query on title or related symptom names
    pub fn videos(&self) -> Vec<&Video> {
        let query = self.query.to_lowercase();
        self.content
            .data()
            .map(|(_, videos)| {
                videos
                    .iter()
                    .filter(|v| {
                        v.title.to_lowercase().contains(&query)
                            || v
                                .related_symptoms
                                .iter()
                                .any(|s| s.to_lowercase().contains(&query))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Form for EducationPage {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockMediHelpApi, Page};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn article(id: i64, title: &str, published: bool) -> Article {
        Article {
            id,
            title: title.to_string(),
            summary: String::new(),
            content: "x".repeat(150),
            cover_image: None,
            tags: vec!["first aid".to_string()],
            related_conditions: Vec::new(),
            is_published: published,
            published_at: None,
        }
    }

    fn video(id: i64, title: &str, published: bool) -> Video {
        Video {
            id,
            title: title.to_string(),
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            description: String::new(),
            related_symptoms: vec!["Headache".to_string()],
            is_published: None,
            published_at: published.then(|| Utc.with_ymd_and_hms(2025, 5, 4, 0, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_only_published_articles_listed() {
        let mut api = MockMediHelpApi::new();
        api.expect_articles().times(1).returning(|| {
            Ok(Page::from_items(vec![
                article(1, "A", true),
                article(2, "B", false),
                article(3, "C", true),
            ]))
        });
        let mut page = ArticlesPage::new();

        assert_eq!(page.mount(&api).await, Effect::Stay);
        let titles: Vec<_> = page.articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_article_expand_toggle() {
        let mut api = MockMediHelpApi::new();
        api.expect_articles()
            .returning(|| Ok(Page::from_items(vec![article(1, "A", true)])));
        let mut page = ArticlesPage::new();
        page.mount(&api).await;

        let first = page.articles()[0].clone();
        assert_eq!(page.body(&first).chars().count(), 103);
        page.toggle(1);
        assert_eq!(page.body(&first).chars().count(), 150);
        page.toggle(1);
        assert!(!page.is_expanded(1));
    }

    #[tokio::test]
    async fn test_articles_401_expires_session() {
        let mut api = MockMediHelpApi::new();
        api.expect_articles()
            .returning(|| Err(ApiError::Unauthorized { message: None }));
        let mut page = ArticlesPage::new();

        assert_eq!(page.mount(&api).await, Effect::SessionExpired);
        assert!(page.articles().is_empty());
    }

    #[tokio::test]
    async fn test_videos_need_publish_date() {
        let mut api = MockMediHelpApi::new();
        api.expect_videos().returning(|| {
            Ok(Page::from_items(vec![video(1, "Burns", true), video(2, "Draft", false)]))
        });
        let mut page = VideosPage::new();
        page.mount(&api).await;
        assert_eq!(page.videos().len(), 1);
        assert_eq!(page.videos()[0].title, "Burns");
    }

    #[tokio::test]
    async fn test_education_search_per_tab() {
        let mut api = MockMediHelpApi::new();
        api.expect_articles().returning(|| {
            Ok(Page::from_items(vec![
                article(1, "Treating burns", true),
                article(2, "Sleep", true),
            ]))
        });
        api.expect_videos().returning(|| {
            Ok(Page::from_items(vec![video(1, "Migraine relief", true)]))
        });
        let mut page = EducationPage::new();
        page.mount(&api).await;

        page.query = "BURN".to_string();
        assert_eq!(page.articles().len(), 1);

        page.switch_tab();
        assert_eq!(page.tab, EducationTab::Videos);
        page.query = "headache".to_string();
        assert_eq!(page.videos().len(), 1);
        page.query = "cough".to_string();
        assert!(page.videos().is_empty());
    }

    #[tokio::test]
    async fn test_education_fails_when_either_listing_fails() {
        let mut api = MockMediHelpApi::new();
        api.expect_articles().returning(|| Ok(Page::default()));
        api.expect_videos()
            .returning(|| Err(ApiError::Network("refused".to_string())));
        let mut page = EducationPage::new();
        page.mount(&api).await;
        assert_eq!(
            page.error().as_deref(),
            Some("Failed to fetch educational content")
        );
    }

    #[test]
    fn test_youtube_id_shapes() {
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_id("https://vimeo.com/123"), None);
    }

    #[test]
    fn test_truncate_preview_is_char_safe() {
        assert_eq!(truncate_preview("short", 100), "short");
        assert_eq!(truncate_preview("ሰላም ዓለም", 3), "ሰላም...");
    }
}
