use super::fsm::{RequestEvent, RequestStateMachine};
use crate::{
    Error, Result,
    config::LlmConfig,
    llm::{ChatCompletionRequest, ChatMessage, ContentPart, LlmClient, OpenAiClient},
};
use tracing::{debug, error, info};

/// Fixed instruction for the OCR stage: verbatim extraction of stem, options
/// and any image-embedded description, no added commentary.
const OCR_INSTRUCTION: &str = "这张图片里是一道初高中题目。请把题目原文完整提取出来，包括题干、选项（如果有）、图片描述（如果有）。只输出文字，不要额外解释。";

fn authoring_prompt(original_text: &str) -> String {
    format!(
        "你是一个出题老师。根据下面这道题，**创作一道全新的、难度相似的题目**。

要求：
- 考察相同的知识点
- 难度相当
- 题型一致（选择题/填空题/解答题）
- 完全原创，不能和原题一样
- 如果是选择题，必须给出4个选项并标注正确答案
- 如果是解答题，给出完整解析

原题：
{original_text}

请按以下格式返回：
【原题文字】
（这里放OCR提取的原文）

【相似新题】
（这里放你出的新题）

【答案】
（新题的答案）

【解析】
（简要解析）"
    )
}

#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub original: String,
    pub generated: String,
}

/// Two-stage inference pipeline: extract the original question text from the
/// uploaded image with the vision model, then author a similar question with
/// the text model. Constructed once at startup and shared across requests;
/// holds no mutable state.
pub struct Pipeline {
    llm_client: Box<dyn LlmClient>,
    ocr_model: String,
    generation_model: String,
    temperature: f32,
}

impl Pipeline {
    pub fn new(config: LlmConfig) -> Self {
        let llm_client = Box::new(OpenAiClient::new(config.clone()));
        Self::with_client(llm_client, &config)
    }

    /// Builds the pipeline around an explicit client.
    pub fn with_client(llm_client: Box<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            llm_client,
            ocr_model: config.ocr_model.clone(),
            generation_model: config.generation_model.clone(),
            temperature: config.temperature,
        }
    }

    /// Runs OCR then generation in sequence. Generation is never invoked when
    /// extraction fails; no retry, no partial result. Empty extracted text is
    /// still forwarded to the generation stage.
    pub async fn run(&self, image_base64: &str) -> Result<PipelineResult> {
        let mut fsm = RequestStateMachine::new();
        fsm.transition(RequestEvent::StartExtraction)?;

        let original = match self.extract(image_base64).await {
            Ok(text) => {
                fsm.transition(RequestEvent::ExtractionSucceeded)?;
                text
            }
            Err(e) => {
                error!("OCR stage failed: {}", e);
                fsm.transition(RequestEvent::StageFailed)?;
                return Err(e);
            }
        };

        let generated = match self.generate(&original).await {
            Ok(text) => {
                fsm.transition(RequestEvent::GenerationSucceeded)?;
                text
            }
            Err(e) => {
                error!("Generation stage failed: {}", e);
                fsm.transition(RequestEvent::StageFailed)?;
                return Err(e);
            }
        };

        info!(
            "Pipeline completed: {} chars extracted, {} chars generated",
            original.chars().count(),
            generated.chars().count()
        );

        Ok(PipelineResult {
            original,
            generated,
        })
    }

    /// OCR stage: one user message carrying the fixed extraction instruction
    /// and the image as a data URI. Returns the first completion's text with
    /// no post-processing.
    pub async fn extract(&self, image_base64: &str) -> Result<String> {
        debug!("Extracting question text with model {}", self.ocr_model);

        let message = ChatMessage::user_parts(vec![
            ContentPart::Text {
                text: OCR_INSTRUCTION.to_string(),
            },
            ContentPart::ImageUrl {
                url: format!("data:image/jpeg;base64,{image_base64}"),
            },
        ]);

        let request = ChatCompletionRequest {
            model: self.ocr_model.clone(),
            messages: vec![message],
            temperature: None,
        };

        let response = self.llm_client.create_chat_completion(request).await?;
        let text = response
            .first_content()
            .ok_or_else(|| Error::upstream("OCR response contained no completion choices"))?;

        Ok(text.to_string())
    }

    /// Generation stage: the extracted text embedded in the fixed authoring
    /// template, sampled at the configured temperature so repeated calls on
    /// the same question yield different new questions.
    pub async fn generate(&self, original_text: &str) -> Result<String> {
        debug!(
            "Generating similar question with model {}",
            self.generation_model
        );

        let request = ChatCompletionRequest {
            model: self.generation_model.clone(),
            messages: vec![ChatMessage::user(authoring_prompt(original_text))],
            temperature: Some(self.temperature),
        };

        let response = self.llm_client.create_chat_completion(request).await?;
        let text = response.first_content().ok_or_else(|| {
            Error::upstream("Generation response contained no completion choices")
        })?;

        Ok(text.to_string())
    }
}
