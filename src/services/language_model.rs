use async_trait::async_trait;

use crate::domain::chat::{ChatMessage, ChatTurn, ToolDefinition};
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AppResult<ChatTurn>;
}
