use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, warn};

use crate::{
    access::{self, Action, Caller},
    errors::PlanResult,
    models::event::{Category, EventDraft, ScheduleEvent},
    ports::{GenerationRequest, LanguageModel},
};

/// Returned to the user whenever the model cannot be reached.
pub const AI_FAILURE_MESSAGE: &str = "Lỗi kết nối AI.";

const ASSISTANT_PERSONA: &str =
    "Bạn là trợ lý ảo của UBND Thành phố. Trả lời ngắn gọn, chính xác dựa trên dữ liệu cung cấp.";

/// Natural-language questions over the schedule and event auto-fill.
#[derive(Clone)]
pub struct Assistant {
    model: Arc<dyn LanguageModel>,
}

impl Assistant {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Answers `question` using `events` as context. Never fails: connection
    /// problems yield [`AI_FAILURE_MESSAGE`].
    pub async fn ask(&self, events: &[ScheduleEvent], question: &str) -> String {
        let context = match serde_json::to_string(events) {
            Ok(context) => context,
            Err(e) => {
                error!("Failed to serialize schedule context: {}", e);
                return AI_FAILURE_MESSAGE.to_string();
            }
        };

        let request = GenerationRequest {
            prompt: format!(
                "Dưới đây là danh sách lịch công tác: {}. Trả lời câu hỏi: {}",
                context, question
            ),
            system_instruction: Some(ASSISTANT_PERSONA.to_string()),
            response_schema: None,
        };

        match self.model.generate(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Assistant request failed: {}", e);
                AI_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// Pulls event fields out of free text to pre-fill the edit form.
    ///
    /// The result is never saved here. `editing_id` is carried over so that
    /// auto-filling an existing entry still updates it.
    pub async fn extract_event(
        &self,
        caller: Caller,
        text: &str,
        editing_id: Option<String>,
    ) -> PlanResult<Option<EventDraft>> {
        access::ensure(caller, Action::AutofillEvents)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let request = GenerationRequest {
            prompt: format!("Trích xuất thông tin lịch họp từ văn bản sau: \"{}\"", text),
            system_instruction: None,
            response_schema: Some(extraction_schema()),
        };

        let raw = match self.model.generate(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Event extraction failed: {}", e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<EventDraft>(strip_code_fence(&raw)) {
            Ok(mut draft) => {
                debug!("Extracted draft '{}'", draft.title.as_deref().unwrap_or_default());
                draft.id = editing_id;
                Ok(Some(draft))
            }
            Err(e) => {
                warn!("Model returned unusable event JSON: {}", e);
                Ok(None)
            }
        }
    }
}

/// JSON schema the model's extraction answer must follow.
pub fn extraction_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "start_time": { "type": "STRING", "description": "HH:mm format" },
            "end_time": { "type": "STRING", "description": "HH:mm format" },
            "location": { "type": "STRING" },
            "participants": { "type": "ARRAY", "items": { "type": "STRING" } },
            "description": { "type": "STRING" },
            "date": { "type": "STRING", "description": "YYYY-MM-DD format" },
            "category": { "type": "STRING", "enum": categories }
        },
        "required": ["title", "date", "start_time"]
    })
}

fn strip_code_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
