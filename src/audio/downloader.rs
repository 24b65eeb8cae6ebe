//! Audio download and conversion through yt-dlp and ffmpeg.

use crate::error::{Result, TubesumError};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Sample rate expected by speech-to-text models.
const SPEECH_SAMPLE_RATE: &str = "16000";

/// Run an external tool to completion, capturing stderr.
async fn run_tool(tool: &str, command: &mut Command) -> Result<Output> {
    let output = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TubesumError::ToolNotFound(tool.to_string())
            } else {
                TubesumError::AudioDownload(format!("{} execution failed: {}", tool, e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TubesumError::AudioDownload(format!(
            "{} failed: {}",
            tool,
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Downloads the audio track of `url` as MP3 into `output_dir`.
///
/// An existing `<video_id>.mp3` is reused.
#[instrument(skip(output_dir), fields(video_id = %video_id))]
pub async fn download_audio(url: &str, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let target_path = output_dir.join(format!("{}.mp3", video_id));
    if target_path.exists() {
        info!("Using cached audio file");
        return Ok(target_path);
    }

    info!("Downloading audio from {}", url);

    let template = output_dir.join(format!("{}.%(ext)s", video_id));
    run_tool(
        "yt-dlp",
        Command::new("yt-dlp")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--audio-quality")
            .arg("0")
            .arg("--output")
            .arg(&template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url),
    )
    .await?;

    let downloaded = find_audio_file(output_dir, video_id)?;
    if downloaded != target_path {
        // Postprocessing was skipped; convert whatever yt-dlp left behind.
        transcode(&downloaded, &target_path, &["-codec:a", "libmp3lame", "-qscale:a", "2"]).await?;
        let _ = std::fs::remove_file(&downloaded);
    }

    Ok(target_path)
}

/// Locates a downloaded audio file by video ID.
fn find_audio_file(dir: &Path, video_id: &str) -> Result<PathBuf> {
    for ext in ["mp3", "opus", "m4a", "webm", "ogg"] {
        let candidate = dir.join(format!("{}.{}", video_id, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    std::fs::read_dir(dir)?
        .flatten()
        .find(|entry| entry.file_name().to_string_lossy().starts_with(video_id))
        .map(|entry| entry.path())
        .ok_or_else(|| TubesumError::AudioDownload("Audio file not found after download".into()))
}

/// Converts any audio file to 16 kHz mono PCM WAV.
#[instrument(skip_all, fields(source = %source.display()))]
pub async fn convert_to_wav(source: &Path, dest: &Path) -> Result<PathBuf> {
    debug!("Converting to WAV");
    transcode(
        source,
        dest,
        &["-ar", SPEECH_SAMPLE_RATE, "-ac", "1", "-codec:a", "pcm_s16le"],
    )
    .await?;
    Ok(dest.to_path_buf())
}

async fn transcode(source: &Path, dest: &Path, codec_args: &[&str]) -> Result<()> {
    run_tool(
        "ffmpeg",
        Command::new("ffmpeg")
            .arg("-i")
            .arg(source)
            .arg("-vn")
            .args(codec_args)
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg(dest),
    )
    .await?;
    Ok(())
}

/// Segments a long audio file into smaller chunks for upload.
///
/// Returns `(chunk_path, offset_seconds)` pairs in playback order. Audio no
/// longer than `chunk_seconds` is returned as a single unsplit entry.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    info!("Total audio duration: {:.1}s", total_duration);

    let chunk_len = f64::from(chunk_seconds.max(1));
    if total_duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let extension = source
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("mp3");

    let mut segments = Vec::new();
    let mut offset = 0.0;
    let mut idx = 0u32;

    while offset < total_duration {
        let segment_path = output_dir.join(format!("{}_{:04}.{}", base_name, idx, extension));
        let segment_len = chunk_len.min(total_duration - offset);

        extract_segment(source, &segment_path, offset, segment_len).await?;
        debug!("Created segment {} at offset {:.1}s", idx, offset);
        segments.push((segment_path, offset));

        offset += chunk_len;
        idx += 1;
    }

    info!("Created {} audio segments", segments.len());
    Ok(segments)
}

/// Extracts a time segment, stream-copying when possible.
async fn extract_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    let copied = Command::new("ffmpeg")
        .arg("-ss")
        .arg(format!("{:.3}", start))
        .arg("-i")
        .arg(source)
        .arg("-t")
        .arg(format!("{:.3}", length))
        .arg("-c")
        .arg("copy")
        .arg("-y")
        .arg("-loglevel")
        .arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if matches!(copied, Ok(status) if status.success()) && dest.exists() {
        return Ok(());
    }

    warn!("Stream copy failed, re-encoding segment");

    let codec = match dest.extension().and_then(|e| e.to_str()) {
        Some("wav") => "pcm_s16le",
        _ => "libmp3lame",
    };

    run_tool(
        "ffmpeg",
        Command::new("ffmpeg")
            .arg("-ss")
            .arg(format!("{:.3}", start))
            .arg("-i")
            .arg(source)
            .arg("-t")
            .arg(format!("{:.3}", length))
            .arg("-codec:a")
            .arg(codec)
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg(dest),
    )
    .await?;
    Ok(())
}

/// Queries the duration of an audio file in seconds.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let output = run_tool(
        "ffprobe",
        Command::new("ffprobe")
            .arg("-v")
            .arg("quiet")
            .arg("-print_format")
            .arg("json")
            .arg("-show_format")
            .arg(path),
    )
    .await?;

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_duration(json: &str) -> Result<f64> {
    let parsed: serde_json::Value = serde_json::from_str(json)
        .map_err(|_| TubesumError::AudioDownload("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| TubesumError::AudioDownload("Could not determine audio duration".into()))
}
