// provider api clients - anthropic, openai and google behind one entry point

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{AiConfig, AiProvider};

use super::prompts::SYSTEM_PROMPT;

const MAX_TOKENS: u32 = 200;

/// send the prompt to the configured provider and return the raw response text
pub async fn request_suggestions(ai: &AiConfig, api_key: &str, prompt: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("failed to build http client")?;

    match ai.provider {
        AiProvider::Anthropic => call_anthropic(&client, api_key, &ai.model, prompt).await,
        AiProvider::OpenAi => call_openai(&client, api_key, &ai.model, prompt).await,
        AiProvider::Google => call_gemini(&client, api_key, &ai.model, prompt).await,
    }
}

// anthropic messages api

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String,
}

async fn call_anthropic(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let request = AnthropicRequest {
        model,
        max_tokens: MAX_TOKENS,
        system: SYSTEM_PROMPT,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    };

    let response = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .json(&request)
        .send()
        .await
        .context("failed to reach the anthropic api")?;

    let body: AnthropicResponse = read_json(response, "anthropic").await?;
    body.content
        .first()
        .map(|c| c.text.clone())
        .ok_or_else(|| anyhow!("anthropic api returned no content"))
}

// openai chat completions api

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

async fn call_openai(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let request = OpenAiRequest {
        model,
        max_tokens: MAX_TOKENS,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
    };

    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&request)
        .send()
        .await
        .context("failed to reach the openai api")?;

    let body: OpenAiResponse = read_json(response, "openai").await?;
    body.choices
        .first()
        .map(|c| c.message.content.clone())
        .ok_or_else(|| anyhow!("openai api returned no choices"))
}

// google gemini generateContent api

#[derive(Serialize)]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: String,
}

async fn call_gemini(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let request = GeminiRequest {
        system_instruction: GeminiContent {
            parts: vec![GeminiPart { text: SYSTEM_PROMPT }],
        },
        contents: vec![GeminiContent {
            parts: vec![GeminiPart { text: prompt }],
        }],
    };

    let url =
        format!("https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent");
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(&request)
        .send()
        .await
        .context("failed to reach the gemini api")?;

    let body: GeminiResponse = read_json(response, "gemini").await?;
    body.candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.clone())
        .ok_or_else(|| anyhow!("gemini api returned no candidates"))
}

async fn read_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    provider: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(anyhow!("{provider} api error ({status}): {error_text}"));
    }
    response
        .json::<T>()
        .await
        .with_context(|| format!("failed to parse {provider} api response"))
}
