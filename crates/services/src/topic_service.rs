use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::model::Topic;

use crate::api::QuizApi;
use crate::error::LoadError;

/// Read-only topic catalogue, cached after the first successful load.
#[derive(Clone)]
pub struct TopicService {
    api: Arc<dyn QuizApi>,
    cache: Arc<Mutex<Option<Vec<Topic>>>>,
}

impl TopicService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self {
            api,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    fn cached(&self) -> Option<Vec<Topic>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// List all topics, from cache when available.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the catalogue cannot be fetched.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, LoadError> {
        if let Some(topics) = self.cached() {
            return Ok(topics);
        }
        self.refresh().await
    }

    /// Fetch the catalogue again and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the catalogue cannot be fetched. The previous cache is kept.
    pub async fn refresh(&self) -> Result<Vec<Topic>, LoadError> {
        let topics = self.api.list_topics().await?;
        tracing::debug!(count = topics.len(), "loaded topics");
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(topics.clone());
        Ok(topics)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, InMemoryApi};

    #[tokio::test]
    async fn catalogue_is_cached_until_refreshed() {
        let api = Arc::new(InMemoryApi::demo());
        let topics = TopicService::new(api.clone());

        let first = topics.list_topics().await.unwrap();
        assert_eq!(first.len(), 5);
        topics.list_topics().await.unwrap();
        assert_eq!(api.call_count(Endpoint::ListTopics), 1);

        assert_eq!(first[0].name, "RAG Systems");

        topics.refresh().await.unwrap();
        topics.list_topics().await.unwrap();
        assert_eq!(api.call_count(Endpoint::ListTopics), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_cache() {
        let api = Arc::new(InMemoryApi::demo());
        let topics = TopicService::new(api.clone());
        topics.list_topics().await.unwrap();

        api.set_offline(true);
        assert!(topics.refresh().await.is_err());
        assert_eq!(topics.list_topics().await.unwrap().len(), 5);
    }
}
