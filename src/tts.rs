use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::info;

use crate::error::{ReelError, ReelResult};
use crate::openai::{OpenAi, describe_failure};

pub const TTS_MODEL: &str = "tts-1";
pub const TTS_VOICE: &str = "alloy";

/// Speaks `text` and writes the WAV to `dir/narration.wav`.
pub async fn tts(openai: &OpenAi, text: &str, dir: &Path) -> ReelResult<PathBuf> {
    info!("Synthesizing narration ({} chars)", text.chars().count());
    let body = json!({
        "model": TTS_MODEL,
        "voice": TTS_VOICE,
        "input": text,
        "response_format": "wav",
    });

    let res = openai
        .post_json("audio/speech", &body)
        .send()
        .await
        .map_err(|e| ReelError::generation(format!("speech request failed: {}", e)))?;
    if !res.status().is_success() {
        return Err(ReelError::generation(format!(
            "speech synthesis failed: {}",
            describe_failure(res).await
        )));
    }
    let audio = res
        .bytes()
        .await
        .map_err(|e| ReelError::generation(format!("speech body unreadable: {}", e)))?;
    if audio.is_empty() {
        return Err(ReelError::generation("speech synthesis returned no audio"));
    }

    let out = dir.join("narration.wav");
    tokio::fs::write(&out, &audio).await?;
    info!("Narration written to {}", out.display());
    Ok(out)
}
