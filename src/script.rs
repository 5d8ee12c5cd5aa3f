use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ReelError, ReelResult};
use crate::openai::{OpenAi, describe_failure};

pub const SCRIPT_MODEL: &str = "gpt-4o-mini";

const PROMPT: &str = r#"
Return valid JSON like:
{
 "hook": "≤12 words, no hashtags",
 "caption": "30-40 words, 3 emojis, 1 branded #YourBrand",
 "narr": "two sentences to be read aloud"
}
Topic: {topic}
"#;

/// Text for one Reel: image prompt, post caption and voice-over.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptPayload {
    pub hook: String,
    pub caption: String,
    #[serde(rename = "narr")]
    pub narration: String,
}

impl ScriptPayload {
    /// Validates raw model output into a payload.
    pub fn parse(content: &str) -> ReelResult<Self> {
        let payload: ScriptPayload = serde_json::from_str(content)
            .map_err(|e| ReelError::schema(format!("{} in {:?}", e, content)))?;
        for (field, value) in [
            ("hook", &payload.hook),
            ("caption", &payload.caption),
            ("narr", &payload.narration),
        ] {
            if value.trim().is_empty() {
                return Err(ReelError::schema(format!("field `{}` is empty", field)));
            }
        }
        Ok(payload)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub fn prompt_for(topic: &str) -> String {
    PROMPT.replace("{topic}", topic)
}

pub async fn script_for(openai: &OpenAi, topic: &str) -> ReelResult<ScriptPayload> {
    info!("Writing script for topic: {}", topic);
    let body = json!({
        "model": SCRIPT_MODEL,
        "messages": [{"role": "user", "content": prompt_for(topic)}],
        "response_format": {"type": "json_object"},
        "temperature": 0.9,
    });

    let res = openai.post_json("chat/completions", &body).send().await?;
    if !res.status().is_success() {
        return Err(ReelError::generation(format!(
            "chat completion failed: {}",
            describe_failure(res).await
        )));
    }

    let completion: ChatCompletion = res
        .json()
        .await
        .map_err(|e| ReelError::schema(format!("unexpected completion body: {}", e)))?;
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ReelError::schema("completion has no message content"))?;
    debug!("Model output: {}", content);

    let payload = ScriptPayload::parse(&content)?;
    info!("Hook: {}", payload.hook);
    Ok(payload)
}
