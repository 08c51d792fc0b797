use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::chat::{ChatMessage, ChatTurn, ToolCall, ToolDefinition};
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

/// Client for OpenAI-compatible `/chat/completions` endpoints (Groq by default).
pub struct ChatCompletionsClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Value {
        let mut body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages.iter().map(message_json).collect::<Vec<_>>(),
        });
        if !tools.is_empty() {
            body["tools"] = tools.iter().map(tool_json).collect();
            body["tool_choice"] = json!("auto");
        }
        body
    }
}

#[async_trait]
impl LanguageModelService for ChatCompletionsClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AppResult<ChatTurn> {
        debug!(model = %self.model, messages = messages.len(), "requesting completion");

        let response = self
            .http
            .post(self.completions_endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(messages, tools))
            .send()
            .await
            .map_err(|err| AppError::Network(format!("failed to call language model: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::HttpStatus {
                service: "language model",
                status: status.as_u16(),
                body,
            });
        }

        let payload: CompletionResponse = response.json().await.map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse completion: {err}"))
        })?;

        let message = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| {
                AppError::LanguageModel("completion contained no choices".to_string())
            })?;

        Ok(message.into_turn())
    }
}

fn message_json(message: &ChatMessage) -> Value {
    match message {
        ChatMessage::System(content) => json!({"role": "system", "content": content}),
        ChatMessage::User(content) => json!({"role": "user", "content": content}),
        ChatMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut value = json!({"role": "assistant", "content": content});
            if !tool_calls.is_empty() {
                value["tool_calls"] = tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
            }
            value
        }
        ChatMessage::Tool {
            call_id,
            name,
            content,
        } => json!({
            "role": "tool",
            "tool_call_id": call_id,
            "name": name,
            "content": content,
        }),
    }
}

fn tool_json(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: Option<String>,
}

impl CompletionMessage {
    fn into_turn(self) -> ChatTurn {
        let tool_calls = self
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, call)| {
                let raw = call.function.arguments.unwrap_or_else(|| "{}".to_string());
                // Kept as-is so the agent can report the parse failure back to the model.
                let arguments = serde_json::from_str::<Value>(&raw)
                    .unwrap_or_else(|_| json!({ "raw_arguments": raw }));
                ToolCall {
                    id: call
                        .id
                        .unwrap_or_else(|| format!("tool_call_{}", idx + 1)),
                    name: call.function.name,
                    arguments,
                }
            })
            .collect();

        ChatTurn {
            content: self.content.unwrap_or_default(),
            tool_calls,
        }
    }
}
