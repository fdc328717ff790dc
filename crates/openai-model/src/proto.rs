use little_react_model::{
    ModelFinishReason, ModelMessage, ModelRequest, ModelResponse, TokenUsage,
};
use serde::{Deserialize, Serialize};

use crate::OpenAIConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    top_p: f32,
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<String>,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        temperature: config.temperature,
        top_p: config.top_p,
        max_completion_tokens: config.max_completion_tokens,
        reasoning_effort: config.reasoning_effort.clone(),
        stream: false,
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    match msg {
        ModelMessage::System(content) => Message::System {
            content: content.clone(),
        },
        ModelMessage::User(content) => Message::User {
            content: content.clone(),
        },
        ModelMessage::Assistant(content) => Message::Assistant {
            content: content.clone(),
        },
    }
}

/// Converts the server reply, or `None` if it carries no choice at all.
pub fn into_model_response(completion: ChatCompletion) -> Option<ModelResponse> {
    let usage = completion.usage.map(|usage| TokenUsage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    });
    let choice = completion.choices.into_iter().next()?;
    Some(ModelResponse {
        content: choice.message.content,
        finish_reason: choice.finish_reason.as_deref().map(finish_reason),
        usage,
    })
}

#[inline]
fn finish_reason(reason: &str) -> ModelFinishReason {
    match reason {
        "stop" => ModelFinishReason::Stop,
        "length" => ModelFinishReason::Length,
        "content_filter" => ModelFinishReason::ContentFilter,
        _ => ModelFinishReason::Other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::System("You run in a loop.".to_owned()),
                ModelMessage::User("What is 2+2?".to_owned()),
                ModelMessage::Assistant("Action: calculate: 2+2".to_owned()),
            ],
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("custom")
            .build();
        let value = serde_json::to_value(create_request(&request, &config))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "model": "custom",
                "messages": [
                    { "role": "system", "content": "You run in a loop." },
                    { "role": "user", "content": "What is 2+2?" },
                    { "role": "assistant", "content": "Action: calculate: 2+2" },
                ],
                "temperature": 1.0,
                "top_p": 1.0,
                "max_completion_tokens": 8192,
                "reasoning_effort": "medium",
                "stream": false,
            })
        );
        // Provider-side tool calling stays disabled.
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_into_model_response() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Answer: 4",
                    "reasoning": "Simple sum."
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 3,
                "total_tokens": 13
            }
        }))
        .unwrap();
        let resp = into_model_response(completion).unwrap();
        assert_eq!(resp.content.as_deref(), Some("Answer: 4"));
        assert_eq!(resp.finish_reason, Some(ModelFinishReason::Stop));
        assert_eq!(resp.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_into_model_response_without_choices() {
        let completion: ChatCompletion =
            serde_json::from_value(json!({ "id": "x", "choices": [] }))
                .unwrap();
        assert!(into_model_response(completion).is_none());
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(finish_reason("length"), ModelFinishReason::Length);
        assert_eq!(
            finish_reason("content_filter"),
            ModelFinishReason::ContentFilter
        );
        assert_eq!(finish_reason("tool_calls"), ModelFinishReason::Other);
    }
}
