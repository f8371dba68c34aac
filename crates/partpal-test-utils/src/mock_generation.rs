// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation/vision adapter for deterministic testing.
//!
//! `MockGeneration` implements `GenerationAdapter` with pre-configured replies,
//! scripted failures and call recording.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use partpal_core::traits::{GenerationAdapter, PluginAdapter, TextStream};
use partpal_core::{ChatMessage, HealthStatus, PartpalError, Service};

/// Reply used when the queue is empty.
pub const DEFAULT_REPLY: &str = "mock response";

#[derive(Debug, Clone)]
enum Failure {
    /// Every call fails before producing anything.
    Immediate(String),
    /// Streams yield `prefix` and then fail.
    MidStream { prefix: String, message: String },
}

/// A mock generation adapter.
///
/// Replies are popped from a FIFO queue shared by `generate` and
/// `generate_stream`. When the queue is empty, [`DEFAULT_REPLY`] is returned.
/// Streamed replies are split at word boundaries so callers see several
/// chunks.
pub struct MockGeneration {
    replies: Arc<Mutex<VecDeque<String>>>,
    failure: Option<Failure>,
    delay: Option<Duration>,
    generate_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_history: Mutex<Vec<ChatMessage>>,
    last_image: Mutex<Option<Vec<u8>>>,
}

impl MockGeneration {
    /// Create a mock with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            failure: None,
            delay: None,
            generate_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_history: Mutex::new(Vec::new()),
            last_image: Mutex::new(None),
        }
    }

    /// Create a mock pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::new()
        }
    }

    /// Create a mock whose every call fails with an upstream error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(Failure::Immediate(message.into())),
            ..Self::new()
        }
    }

    /// Create a mock whose streams yield `prefix` and then fail.
    pub fn failing_mid_stream(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: Some(Failure::MidStream {
                prefix: prefix.into(),
                message: message.into(),
            }),
            ..Self::new()
        }
    }

    /// Delay every call by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(text.into());
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    /// The prompt of the most recent call of either kind.
    pub async fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().await.clone()
    }

    /// The history passed to the most recent `generate_stream` call.
    pub async fn last_history(&self) -> Vec<ChatMessage> {
        self.last_history.lock().await.clone()
    }

    /// The image of the most recent `generate` call.
    pub async fn last_image(&self) -> Option<Vec<u8>> {
        self.last_image.lock().await.clone()
    }

    async fn next_reply(&self) -> String {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockGeneration {
    fn default() -> Self {
        Self::new()
    }
}

fn upstream(message: &str) -> PartpalError {
    PartpalError::upstream(Service::Generation, message)
}

#[async_trait]
impl PluginAdapter for MockGeneration {
    fn name(&self) -> &str {
        "mock-generation"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn service(&self) -> Service {
        Service::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, PartpalError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PartpalError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationAdapter for MockGeneration {
    async fn generate(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, PartpalError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());
        *self.last_image.lock().await = image.map(<[u8]>::to_vec);
        self.pause().await;

        match &self.failure {
            Some(Failure::Immediate(message)) | Some(Failure::MidStream { message, .. }) => {
                Err(upstream(message))
            }
            None => Ok(self.next_reply().await),
        }
    }

    async fn generate_stream(
        &self,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<TextStream, PartpalError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());
        *self.last_history.lock().await = history.to_vec();
        self.pause().await;

        let chunks: Vec<Result<String, PartpalError>> = match &self.failure {
            Some(Failure::Immediate(message)) => return Err(upstream(message)),
            Some(Failure::MidStream { prefix, message }) => {
                vec![Ok(prefix.clone()), Err(upstream(message))]
            }
            None => {
                let reply = self.next_reply().await;
                reply
                    .split_inclusive(' ')
                    .map(|chunk| Ok(chunk.to_string()))
                    .collect()
            }
        };

        Ok(Box::pin(stream::iter(chunks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(stream: TextStream) -> Vec<Result<String, PartpalError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let generation = MockGeneration::new();
        assert_eq!(generation.generate("p", None).await.unwrap(), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let generation = MockGeneration::with_replies(vec!["first".into(), "second".into()]);
        assert_eq!(generation.generate("p", None).await.unwrap(), "first");
        assert_eq!(generation.generate("p", None).await.unwrap(), "second");
        assert_eq!(generation.generate("p", None).await.unwrap(), DEFAULT_REPLY);
        assert_eq!(generation.generate_calls(), 3);
    }

    #[tokio::test]
    async fn stream_splits_reply_into_word_chunks() {
        let generation = MockGeneration::with_replies(vec!["use a resistor".into()]);
        let chunks: Vec<String> = collect(generation.generate_stream(&[], "p").await.unwrap())
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect();
        assert_eq!(chunks, vec!["use ", "a ", "resistor"]);
        assert_eq!(chunks.concat(), "use a resistor");
        assert_eq!(generation.stream_calls(), 1);
    }

    #[tokio::test]
    async fn failing_mock_fails_both_calls() {
        let generation = MockGeneration::failing("boom");
        assert!(generation.generate("p", Some(&b"img"[..])).await.is_err());
        assert!(generation.generate_stream(&[], "p").await.is_err());
        assert_eq!(generation.last_image().await.as_deref(), Some(&b"img"[..]));
    }

    #[tokio::test]
    async fn mid_stream_failure_yields_prefix_then_error() {
        let generation = MockGeneration::failing_mid_stream("partial", "reset");
        let items = collect(generation.generate_stream(&[], "p").await.unwrap()).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "partial");
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn add_reply_after_construction() {
        let generation = MockGeneration::new();
        generation.add_reply("dynamic").await;
        assert_eq!(generation.generate("p", None).await.unwrap(), "dynamic");
        assert_eq!(generation.last_prompt().await.as_deref(), Some("p"));
    }

    #[tokio::test]
    async fn stream_records_history() {
        let generation = MockGeneration::new();
        let history = [ChatMessage::user("q"), ChatMessage::model("a")];
        generation.generate_stream(&history, "next").await.unwrap();
        assert_eq!(generation.last_history().await, history);
        assert_eq!(generation.last_prompt().await.as_deref(), Some("next"));
    }
}
