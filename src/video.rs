use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, error, info, warn};

use crate::audio::wav_duration_seconds;
use crate::error::{ReelError, ReelResult};

/// Slideshow encoding parameters.
#[derive(Debug, Clone)]
pub struct VideoSettings {
    pub seconds_per_image: u32,
    pub height: u32,
    pub fps: u32,
    pub preset: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            seconds_per_image: 3,
            height: 1920,
            fps: 30,
            preset: "medium".to_string(),
        }
    }
}

const LIST_FILE: &str = "images.txt";
const OUTPUT_FILE: &str = "reel.mp4";

/// Encodes the images as a slideshow under the narration and returns the MP4 path inside `work_dir`.
pub fn build_video(
    images: &[PathBuf],
    audio: &Path,
    work_dir: &Path,
    settings: &VideoSettings,
) -> ReelResult<PathBuf> {
    if images.is_empty() {
        return Err(ReelError::Assembly("no images to assemble".to_string()));
    }

    let total_secs = images.len() as u32 * settings.seconds_per_image;
    match wav_duration_seconds(audio) {
        Ok(narration) if narration > total_secs as f64 => warn!(
            "Narration runs {:.2}s but the slideshow is {}s; audio will be trimmed",
            narration, total_secs
        ),
        Ok(narration) => info!("Narration {:.2}s over a {}s slideshow", narration, total_secs),
        Err(e) => warn!("Could not probe narration length: {}", e),
    }

    fs::write(
        work_dir.join(LIST_FILE),
        concat_list(images, settings.seconds_per_image),
    )?;
    debug!("Wrote concat list {}", work_dir.join(LIST_FILE).display());

    let args = ffmpeg_args(audio, total_secs, settings);
    info!("Encoding {} images into {}", images.len(), OUTPUT_FILE);
    let output = Command::new("ffmpeg")
        .current_dir(work_dir)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ReelError::Assembly(format!("could not run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffmpeg failed to produce the reel");
        return Err(ReelError::Assembly(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            tail(&stderr, 20)
        )));
    }

    let out = work_dir.join(OUTPUT_FILE);
    info!("Video written to {}", out.display());
    Ok(out)
}

/// Concat-demuxer script; the last image is listed twice so its duration is honoured.
fn concat_list(images: &[PathBuf], seconds_per_image: u32) -> String {
    let mut list = String::new();
    for p in images {
        let _ = writeln!(list, "file '{}'", escape_quoted(p));
        let _ = writeln!(list, "duration {}", seconds_per_image);
    }
    if let Some(last) = images.last() {
        let _ = writeln!(list, "file '{}'", escape_quoted(last));
    }
    list
}

fn escape_quoted(p: &Path) -> String {
    p.display().to_string().replace('\'', r"'\''")
}

fn ffmpeg_args(audio: &Path, total_secs: u32, settings: &VideoSettings) -> Vec<String> {
    let audio = audio.display().to_string();
    let filter = format!("scale=-2:{},format=yuv420p", settings.height);
    let fps = settings.fps.to_string();
    let duration = total_secs.to_string();
    let args: [&str; 26] = [
        "-y",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        LIST_FILE,
        "-i",
        &audio,
        "-vf",
        &filter,
        "-r",
        &fps,
        "-map",
        "0:v:0",
        "-map",
        "1:a:0",
        "-c:v",
        "libx264",
        "-preset",
        &settings.preset,
        "-c:a",
        "aac",
        "-t",
        &duration,
        OUTPUT_FILE,
    ];
    args.iter().map(|s| s.to_string()).collect()
}

fn tail(s: &str, lines: usize) -> String {
    let all: Vec<&str> = s.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
