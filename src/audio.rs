use std::path::Path;

use hound::WavReader;

use crate::error::{ReelError, ReelResult};

pub fn wav_duration_seconds(path: &Path) -> ReelResult<f64> {
    let reader = WavReader::open(path)
        .map_err(|e| ReelError::generation(format!("unreadable WAV {}: {}", path.display(), e)))?;
    let spec = reader.spec();
    let samples = reader.len();
    let frames = samples as f64 / spec.channels as f64;
    let duration = frames / spec.sample_rate as f64;
    Ok(duration)
}
