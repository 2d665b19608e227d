use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    ImageUrlArgs,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Message content, either plain text or a list of multimodal parts.
/// The vision model takes an instruction part plus an image part in one
/// user message; the text model takes plain text.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone)]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
}

#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Only sent upstream when present; the OCR call relies on the model's
    /// default while the generation call pins 0.7.
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }

    pub fn to_openai_message(&self) -> Result<ChatCompletionRequestMessage, crate::Error> {
        match self.role.as_str() {
            "system" => {
                let text = match &self.content {
                    MessageContent::Text(text) => text.clone(),
                    MessageContent::Parts(_) => {
                        return Err(crate::Error::upstream(
                            "System messages do not support multimodal content",
                        ));
                    }
                };
                let msg = ChatCompletionRequestSystemMessageArgs::default()
                    .content(ChatCompletionRequestSystemMessageContent::Text(text))
                    .build()
                    .map_err(|e| {
                        crate::Error::upstream(format!("Failed to build system message: {}", e))
                    })?;
                Ok(msg.into())
            }
            "user" => {
                let content = match &self.content {
                    MessageContent::Text(text) => {
                        ChatCompletionRequestUserMessageContent::Text(text.clone())
                    }
                    MessageContent::Parts(parts) => {
                        let mut openai_parts = Vec::new();
                        for part in parts {
                            openai_parts.push(part.to_openai_part()?);
                        }
                        ChatCompletionRequestUserMessageContent::Array(openai_parts)
                    }
                };
                let msg = ChatCompletionRequestUserMessageArgs::default()
                    .content(content)
                    .build()
                    .map_err(|e| {
                        crate::Error::upstream(format!("Failed to build user message: {}", e))
                    })?;
                Ok(msg.into())
            }
            _ => Err(crate::Error::upstream(format!(
                "Unknown message role: {}",
                self.role
            ))),
        }
    }
}

impl ContentPart {
    fn to_openai_part(&self) -> Result<ChatCompletionRequestUserMessageContentPart, crate::Error> {
        match self {
            Self::Text { text } => {
                let part = ChatCompletionRequestMessageContentPartTextArgs::default()
                    .text(text.clone())
                    .build()
                    .map_err(|e| {
                        crate::Error::upstream(format!("Failed to build text part: {}", e))
                    })?;
                Ok(part.into())
            }
            Self::ImageUrl { url } => {
                let image_url = ImageUrlArgs::default().url(url.clone()).build().map_err(
                    |e| crate::Error::upstream(format!("Failed to build image url: {}", e)),
                )?;
                let part = ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(image_url)
                    .build()
                    .map_err(|e| {
                        crate::Error::upstream(format!("Failed to build image part: {}", e))
                    })?;
                Ok(part.into())
            }
        }
    }
}

impl MessageContent {
    /// Plain text of the content, if it is not multimodal.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Parts(_) => None,
        }
    }
}

impl ChatCompletionResponse {
    /// Text of the first completion choice, the only one the pipeline uses.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_text())
    }
}
