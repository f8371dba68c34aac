// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn production: one user action in, display-ready turns out.
//!
//! The [`TurnProducer`] drives the generation, catalog and speech
//! collaborators in a fixed order and isolates their failures:
//!
//! - **Image action**: vision failure is fatal to the action and becomes the
//!   only emitted turn. Catalog and speech failures are absorbed.
//! - **Text action**: every failure is absorbed. A failed generation becomes
//!   an `Error: <cause>` reply so the action still yields a displayable turn.
//!
//! Every collaborator call is bounded by [`ProducerConfig::call_timeout`].
//!
//! Successful text exchanges are remembered, up to
//! [`ProducerConfig::history_exchanges`], and replayed to the generation
//! collaborator so follow-up questions keep their context.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use partpal_config::PartpalConfig;
use partpal_core::{
    AssistantPayload, CatalogAdapter, ChatMessage, GenerationAdapter, PartResult, PartpalError,
    Service, SpeechAdapter, Turn,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::sanitize::sanitize;

/// Instruction prepended to every text action when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a concise and friendly computer science tutor.
- Give answers in 3-4 short, clear sentences.
- Do NOT include code unless the user says 'show code'.
- Suggest electronics parts (Arduino, ESP32, resistor) with a short description, price and link.
- End each response with a thank you note.";

/// Instruction sent alongside every uploaded image.
pub const DEFAULT_VISION_PROMPT: &str =
    "Identify the electronic component in this image. Respond only with the component name.";

/// User text recorded for an image action.
pub const IMAGE_UPLOADED: &str = "image uploaded";

/// Reply shown when a catalog search for an identified component finds nothing.
pub const NO_MATCHING_PARTS: &str = "No matching parts found";

const IDENTIFIED_PREFIX: &str = "Identified: ";
const IMAGE_ERROR_PREFIX: &str = "Image recognition error: ";
const TEXT_ERROR_PREFIX: &str = "Error: ";

/// Prompts and bounds used by a [`TurnProducer`].
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Fixed instruction placed before the user's text.
    pub system_prompt: String,
    /// Fixed instruction sent with every image.
    pub vision_prompt: String,
    /// Upper bound on each collaborator call.
    pub call_timeout: Duration,
    /// Maximum number of catalog hits requested per search.
    pub catalog_limit: usize,
    /// Earlier text exchanges replayed to generation; 0 disables memory.
    pub history_exchanges: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            vision_prompt: DEFAULT_VISION_PROMPT.to_string(),
            call_timeout: Duration::from_secs(20),
            catalog_limit: 3,
            history_exchanges: 10,
        }
    }
}

impl ProducerConfig {
    /// Builds the producer settings from the loaded configuration.
    ///
    /// # System Prompt Resolution
    /// 1. `session.system_prompt_file` if set and readable and non-empty
    /// 2. `session.system_prompt` if set and non-empty
    /// 3. [`DEFAULT_SYSTEM_PROMPT`]
    pub async fn from_config(config: &PartpalConfig) -> Self {
        let system_prompt = load_system_prompt(
            config.session.system_prompt.as_deref(),
            config.session.system_prompt_file.as_deref(),
        )
        .await;

        Self {
            system_prompt,
            vision_prompt: config.session.vision_prompt.clone(),
            call_timeout: Duration::from_secs(config.session.call_timeout_secs),
            catalog_limit: config.mouser.max_results,
            history_exchanges: config.session.history_exchanges,
        }
    }
}

/// Loads the system prompt following priority: file > inline > default.
async fn load_system_prompt(inline_prompt: Option<&str>, prompt_file: Option<&str>) -> String {
    if let Some(file_path) = prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = file_path, "loaded system prompt from file");
                    return trimmed.to_string();
                }
                warn!(path = file_path, "system prompt file is empty, falling back");
            }
            Err(e) => {
                warn!(
                    path = file_path,
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = inline_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.trim().to_string();
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Converts one user action into the turns to append to the transcript.
///
/// Catalog and speech collaborators are optional; `None` means the service
/// is not configured and behaves as "no parts" and "no audio" respectively.
pub struct TurnProducer {
    generation: Arc<dyn GenerationAdapter>,
    catalog: Option<Arc<dyn CatalogAdapter>>,
    speech: Option<Arc<dyn SpeechAdapter>>,
    config: ProducerConfig,
    history: Mutex<VecDeque<ChatMessage>>,
}

impl TurnProducer {
    pub fn new(
        generation: Arc<dyn GenerationAdapter>,
        catalog: Option<Arc<dyn CatalogAdapter>>,
        speech: Option<Arc<dyn SpeechAdapter>>,
        config: ProducerConfig,
    ) -> Self {
        info!(
            generation = generation.name(),
            catalog = catalog.as_ref().map(|c| c.name()).unwrap_or("disabled"),
            speech = speech.as_ref().map(|s| s.name()).unwrap_or("disabled"),
            timeout_secs = config.call_timeout.as_secs(),
            "turn producer initialized"
        );
        Self {
            generation,
            catalog,
            speech,
            config,
            history: Mutex::new(VecDeque::new()),
        }
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// The remembered conversation, oldest message first.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.iter().cloned().collect()
    }

    /// Forgets every remembered exchange.
    pub fn clear_history(&mut self) {
        self.history.get_mut().clear();
    }

    /// Identifies the component in `image`, then looks it up and voices it.
    ///
    /// Returns one turn if recognition fails, otherwise two: the
    /// identification (with audio when synthesized) and the catalog result.
    pub async fn handle_image(&self, image: &[u8]) -> Vec<Turn> {
        let started = Instant::now();

        let identified_name = match self.identify(image).await {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    service = %Service::Generation,
                    error = %e,
                    "image recognition failed, skipping catalog and speech"
                );
                return vec![Turn::new(
                    Some(IMAGE_UPLOADED.to_string()),
                    AssistantPayload::text(format!("{IMAGE_ERROR_PREFIX}{}", e.cause())),
                    None,
                )];
            }
        };

        let identification = format!("{IDENTIFIED_PREFIX}{identified_name}");
        let parts = self.search_parts(&identified_name).await;
        let audio = self.synthesize(&identification).await;

        info!(
            component = identified_name.as_str(),
            parts = parts.len(),
            audio = audio.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image action complete"
        );

        let catalog_turn = if parts.is_empty() {
            Turn::assistant_only(AssistantPayload::text(NO_MATCHING_PARTS))
        } else {
            Turn::assistant_only(AssistantPayload::parts_only(parts))
        };

        vec![
            Turn::new(
                Some(IMAGE_UPLOADED.to_string()),
                AssistantPayload::text(identification),
                audio,
            ),
            catalog_turn,
        ]
    }

    /// Answers `user_text` with a generated reply plus matching catalog parts.
    ///
    /// Returns exactly one turn, or none for blank input.
    pub async fn handle_text(&self, user_text: &str) -> Vec<Turn> {
        if user_text.trim().is_empty() {
            debug!("ignoring blank text action");
            return Vec::new();
        }
        let started = Instant::now();

        let prompt = self.text_prompt(user_text);
        let history = self.history().await;
        let (parts, reply) = tokio::join!(
            self.search_parts(user_text),
            self.generate_reply(&history, &prompt)
        );

        let body = match reply {
            Ok(text) => {
                self.remember(user_text, &text).await;
                sanitize(&text)
            }
            Err(e) => {
                warn!(
                    service = %Service::Generation,
                    error = %e,
                    "generation failed, replying with error text"
                );
                sanitize(&format!("{TEXT_ERROR_PREFIX}{}", e.cause()))
            }
        };

        let audio = self.synthesize(&body).await;

        info!(
            parts = parts.len(),
            reply_chars = body.chars().count(),
            audio = audio.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "text action complete"
        );

        vec![Turn::new(
            Some(user_text.to_string()),
            AssistantPayload::text_with_parts(body, parts),
            audio,
        )]
    }

    /// The full generation prompt for a text action.
    pub fn text_prompt(&self, user_text: &str) -> String {
        format!(
            "{}\n\nUser project/question: {user_text}",
            self.config.system_prompt
        )
    }

    async fn identify(&self, image: &[u8]) -> Result<String, PartpalError> {
        if image.is_empty() {
            return Err(PartpalError::UnsupportedMedia("empty image".into()));
        }

        let raw = self
            .bounded(
                Service::Generation,
                self.generation
                    .generate(&self.config.vision_prompt, Some(image)),
            )
            .await?;

        let name = sanitize(&raw);
        if name.is_empty() {
            return Err(PartpalError::upstream(
                Service::Generation,
                "no component name in reply",
            ));
        }
        Ok(name)
    }

    /// Streams the reply and joins the chunks in arrival order. Any chunk
    /// error fails the whole reply.
    async fn generate_reply(
        &self,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<String, PartpalError> {
        self.bounded(Service::Generation, async {
            let mut stream = self.generation.generate_stream(history, prompt).await?;
            let mut reply = String::new();
            let mut chunks = 0usize;
            while let Some(chunk) = stream.next().await {
                reply.push_str(&chunk?);
                chunks += 1;
            }
            debug!(chunks, chars = reply.len(), "generation stream finished");
            Ok(reply)
        })
        .await
    }

    /// Records one exchange, dropping the oldest beyond the configured limit.
    async fn remember(&self, user_text: &str, reply: &str) {
        let limit = self.config.history_exchanges;
        if limit == 0 {
            return;
        }
        let mut history = self.history.lock().await;
        history.push_back(ChatMessage::user(user_text));
        history.push_back(ChatMessage::model(reply));
        while history.len() > limit * 2 {
            history.pop_front();
        }
    }

    /// Best-effort catalog lookup; failures and a missing catalog yield no parts.
    async fn search_parts(&self, keyword: &str) -> Vec<PartResult> {
        let Some(catalog) = &self.catalog else {
            debug!("catalog search disabled");
            return Vec::new();
        };

        match self
            .bounded(
                Service::Catalog,
                catalog.search(keyword, self.config.catalog_limit),
            )
            .await
        {
            Ok(mut parts) => {
                parts.truncate(self.config.catalog_limit);
                debug!(parts = parts.len(), "catalog search complete");
                parts
            }
            Err(e) => {
                warn!(service = %Service::Catalog, error = %e, "catalog search failed, using no parts");
                Vec::new()
            }
        }
    }

    /// Best-effort speech synthesis; failures and a missing synthesizer yield no audio.
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>> {
        let speech = self.speech.as_ref()?;

        match self.bounded(Service::Speech, speech.synthesize(text)).await {
            Ok(Some(audio)) if !audio.is_empty() => {
                debug!(bytes = audio.len(), "speech synthesized");
                Some(audio)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(service = %Service::Speech, error = %e, "speech synthesis failed, continuing without audio");
                None
            }
        }
    }

    async fn bounded<T>(
        &self,
        service: Service,
        call: impl Future<Output = Result<T, PartpalError>>,
    ) -> Result<T, PartpalError> {
        let duration = self.config.call_timeout;
        match tokio::time::timeout(duration, call).await {
            Ok(result) => result,
            Err(_) => Err(PartpalError::Timeout { service, duration }),
        }
    }
}
