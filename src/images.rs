use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ReelError, ReelResult};
use crate::openai::{OpenAi, describe_failure};

pub const IMAGE_COUNT: usize = 4;
pub const IMAGE_MODEL: &str = "dall-e-3";
pub const IMAGE_SIZE: &str = "1024x1792";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// Generates `count` stills for `prompt` and saves them as `image_<i>.png` under `dir`.
pub async fn gen_images(
    openai: &OpenAi,
    prompt: &str,
    count: usize,
    dir: &Path,
) -> ReelResult<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(count);
    for i in 0..count {
        info!("Generating image {}/{}", i + 1, count);
        let url = request_image(openai, prompt).await?;
        let out = dir.join(format!("image_{}.png", i));
        download(openai.http(), &url, &out).await?;
        debug!("Saved image {} to {}", i, out.display());
        paths.push(out);
    }
    Ok(paths)
}

async fn request_image(openai: &OpenAi, prompt: &str) -> ReelResult<String> {
    let body = json!({
        "model": IMAGE_MODEL,
        "prompt": prompt,
        "n": 1,
        "size": IMAGE_SIZE,
    });
    let res = openai
        .post_json("images/generations", &body)
        .send()
        .await
        .map_err(|e| ReelError::generation(format!("image request failed: {}", e)))?;
    if !res.status().is_success() {
        return Err(ReelError::generation(format!(
            "image generation failed: {}",
            describe_failure(res).await
        )));
    }
    let parsed: ImagesResponse = res
        .json()
        .await
        .map_err(|e| ReelError::generation(format!("unexpected images body: {}", e)))?;
    parsed
        .data
        .into_iter()
        .find_map(|d| d.url)
        .ok_or_else(|| ReelError::generation("image response carried no url"))
}

async fn download(http: &reqwest::Client, url: &str, out: &Path) -> ReelResult<()> {
    let bytes = http
        .get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|e| ReelError::generation(format!("image download failed: {}", e)))?
        .bytes()
        .await
        .map_err(|e| ReelError::generation(format!("image download failed: {}", e)))?;
    tokio::fs::write(out, &bytes).await?;
    Ok(())
}
