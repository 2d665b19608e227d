use super::types::*;
use crate::{Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

/// Chat-completion client over the OpenAI-compatible Zhipu API. One instance
/// serves both the vision and the text model; the model travels per request.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        let client = Client::with_config(openai_config);

        Self { client }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        debug!(
            "Creating chat completion for model {} with {} messages",
            request.model,
            request.messages.len()
        );

        // Convert our types to OpenAI types
        let mut messages = Vec::new();
        for msg in &request.messages {
            messages.push(msg.to_openai_message()?);
        }

        let mut request_builder = openai_types::CreateChatCompletionRequestArgs::default();
        request_builder.model(&request.model).messages(messages);

        if let Some(temperature) = request.temperature {
            request_builder.temperature(temperature);
        }

        let openai_request = request_builder.build()?;

        let response = self.client.chat().create(openai_request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        // Convert OpenAI response to our types
        let choices: Vec<Choice> = response
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                message: ChatMessage {
                    role: choice.message.role.to_string(),
                    content: MessageContent::Text(choice.message.content.unwrap_or_default()),
                },
                finish_reason: choice.finish_reason.map(|fr| format!("{fr:?}")),
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatCompletionResponse {
            id: response.id,
            model: response.model,
            choices,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use async_openai::types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageContent,
    };
    use pretty_assertions::assert_eq;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
            api_key: "test-api-key".to_string(),
            ocr_model: "glm-4v-flash".to_string(),
            generation_model: "glm-4-flash".to_string(),
            temperature: 0.7,
        }
    }

    #[test]
    fn test_openai_client_creation() {
        let config = create_test_config();
        let _client = OpenAiClient::new(config);
    }

    #[test]
    fn test_openai_client_with_empty_base_url() {
        let mut config = create_test_config();
        config.base_url = String::new();

        let _client = OpenAiClient::new(config);
    }

    #[test]
    fn test_chat_message_to_openai_user_text() {
        let msg = ChatMessage::user("请提取这道题目");

        let openai_msg = msg.to_openai_message().unwrap();
        assert!(matches!(openai_msg, ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_chat_message_to_openai_user_parts() {
        let msg = ChatMessage::user_parts(vec![
            ContentPart::Text {
                text: "请提取这道题目".to_string(),
            },
            ContentPart::ImageUrl {
                url: "data:image/jpeg;base64,aGVsbG8=".to_string(),
            },
        ]);

        let openai_msg = msg.to_openai_message().unwrap();
        match openai_msg {
            ChatCompletionRequestMessage::User(user) => match user.content {
                ChatCompletionRequestUserMessageContent::Array(parts) => {
                    assert_eq!(parts.len(), 2);
                }
                other => panic!("Expected multimodal content, got {:?}", other),
            },
            other => panic!("Expected user message, got {:?}", other),
        }
    }

    #[test]
    fn test_chat_message_to_openai_system() {
        let msg = ChatMessage {
            role: "system".to_string(),
            content: MessageContent::Text("You are a helpful assistant".to_string()),
        };

        let openai_msg = msg.to_openai_message().unwrap();
        assert!(matches!(
            openai_msg,
            ChatCompletionRequestMessage::System(_)
        ));
    }

    #[test]
    fn test_chat_message_invalid_role() {
        let msg = ChatMessage {
            role: "tool".to_string(),
            content: MessageContent::Text("This should fail".to_string()),
        };

        let result = msg.to_openai_message();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unknown message role")
        );
    }

    #[test]
    fn test_first_content() {
        let response = ChatCompletionResponse {
            id: "chatcmpl-123".to_string(),
            model: "glm-4-flash".to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: MessageContent::Text("2+3=?".to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        };

        assert_eq!(response.first_content(), Some("2+3=?"));
    }

    #[test]
    fn test_first_content_empty_choices() {
        let response = ChatCompletionResponse {
            id: "chatcmpl-123".to_string(),
            model: "glm-4-flash".to_string(),
            choices: vec![],
            usage: None,
        };

        assert_eq!(response.first_content(), None);
    }
}
