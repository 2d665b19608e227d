use async_trait::async_trait;
use quizgen::{
    Error, Result,
    llm::{
        ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, LlmClient,
        MessageContent,
    },
};
use std::sync::{Arc, Mutex};

/// Mock LLM client for testing. Records every request and plays back scripted
/// results in order, so tests can observe call counts and wire contents.
#[derive(Clone)]
pub struct MockLlmClient {
    pub scripts: Arc<Mutex<Vec<Result<ChatCompletionResponse>>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: ChatCompletionResponse) -> Self {
        self.scripts.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_content(self, content: &str) -> Self {
        self.with_response(create_mock_chat_response(content))
    }

    pub fn with_error(self, error: &str) -> Self {
        self.scripts.lock().unwrap().push(Err(Error::upstream(error)));
        self
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        let mut scripts = self.scripts.lock().unwrap();
        if scripts.is_empty() {
            return Err(Error::upstream("No more mock responses available"));
        }

        scripts.remove(0)
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_mock_chat_response(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "test-id".to_string(),
        model: "test-model".to_string(),
        choices: vec![Choice {
            index: 0,
            message: ChatMessage {
                role: "assistant".to_string(),
                content: MessageContent::Text(content.to_string()),
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

/// Response with an empty choice list, as a misbehaving upstream would return.
pub fn create_empty_chat_response() -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "test-id".to_string(),
        model: "test-model".to_string(),
        choices: vec![],
        usage: None,
    }
}
