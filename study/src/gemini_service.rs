use crate::backend::{ModelBackend, TextStream};
use crate::config::{Config, ModelProfile};
use crate::error::GenerationError;
use crate::models::*;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// The key travels in a header so it never shows up in URLs or error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiService {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone(), config.base_url.clone())
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post(
        &self,
        url: &str,
        request: &GeminiRequest,
    ) -> Result<reqwest::Response, GenerationError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ExternalCallFailure(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ModelBackend for GeminiService {
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        profile: &ModelProfile,
    ) -> Result<String, GenerationError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![
                    GeminiPart::text(request.instruction),
                    GeminiPart::inline(request.payload),
                ],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: profile.temperature,
                max_output_tokens: profile.max_output_tokens,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.output_schema.to_response_schema()),
            }),
        };

        log::debug!(
            "Calling {} for {} ({} byte document)",
            profile.model,
            request.kind,
            request.payload.len()
        );

        let response = self
            .post(&self.url(&profile.model, "generateContent"), &body)
            .await?;
        let gemini_response: GeminiResponse = response.json().await?;

        answer_text(&gemini_response)
    }

    async fn stream(
        &self,
        instruction: &str,
        profile: &ModelProfile,
    ) -> Result<TextStream, GenerationError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart::text(instruction)],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: profile.temperature,
                max_output_tokens: profile.max_output_tokens,
                response_mime_type: None,
                response_schema: None,
            }),
        };

        let url = format!("{}?alt=sse", self.url(&profile.model, "streamGenerateContent"));
        let response = self.post(&url, &body).await?;

        let (tx, rx) = mpsc::channel::<Result<String, GenerationError>>(32);
        let mut bytes = response.bytes_stream();

        tokio::spawn(async move {
            let mut decoder = SseDecoder::default();

            while let Some(chunk) = bytes.next().await {
                let events = match chunk {
                    Ok(chunk) => decoder.push(&chunk),
                    Err(e) => {
                        let _ = tx.send(Err(e.into())).await;
                        return;
                    }
                };
                if !forward_events(&tx, events).await {
                    return;
                }
            }

            forward_events(&tx, decoder.finish()).await;
        });

        Ok(ReceiverStream::new(rx).boxed())
    }
}

/// Send the text of each event downstream. False once the receiver is gone
/// or an event carried an error.
async fn forward_events(
    tx: &mpsc::Sender<Result<String, GenerationError>>,
    events: Vec<String>,
) -> bool {
    for data in events {
        let item = match serde_json::from_str::<GeminiResponse>(&data) {
            Ok(response) => match answer_text(&response) {
                Ok(text) if text.is_empty() => continue,
                other => other,
            },
            Err(e) => Err(GenerationError::ExternalCallFailure(format!(
                "unreadable stream event: {}",
                e
            ))),
        };

        let failed = item.is_err();
        if tx.send(item).await.is_err() {
            log::debug!("Stream receiver dropped, stopping");
            return false;
        }
        if failed {
            return false;
        }
    }
    true
}

fn answer_text(response: &GeminiResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response.block_reason() {
        return Err(GenerationError::ExternalCallFailure(format!(
            "prompt blocked: {}",
            reason
        )));
    }

    response.text().ok_or_else(|| {
        let finish = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("no candidates");
        GenerationError::ExternalCallFailure(format!("no response generated ({})", finish))
    })
}

/// Incremental decoder for `text/event-stream` bodies; yields the `data`
/// payload of every complete event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(event) = self.take_event() {
                    events.push(event);
                }
            } else if let Some(value) = line.strip_prefix("data:") {
                self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
        }

        events
    }

    /// Flush an event left unterminated at end of stream.
    pub fn finish(&mut self) -> Vec<String> {
        let mut events = self.push(b"\n");
        events.extend(self.take_event());
        events
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data).join("\n"))
    }
}
