//! Audio download and processing utilities.
//!
//! Used when a video has no captions: the audio track is downloaded with
//! yt-dlp and converted with ffmpeg before speech-to-text.

mod downloader;

pub use downloader::{convert_to_wav, download_audio, probe_duration, split_audio};

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Fetches a video's audio as a file ready for speech-to-text.
#[async_trait]
pub trait AudioDownloader: Send + Sync {
    async fn download(&self, url: &str, video_id: &str, output_dir: &Path) -> Result<PathBuf>;
}

/// yt-dlp download followed by conversion to 16 kHz mono WAV.
#[derive(Debug, Default, Clone, Copy)]
pub struct YtDlpDownloader;

#[async_trait]
impl AudioDownloader for YtDlpDownloader {
    async fn download(&self, url: &str, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
        let mp3 = download_audio(url, video_id, output_dir).await?;
        let wav = convert_to_wav(&mp3, &output_dir.join(format!("{}.wav", video_id))).await?;
        let _ = std::fs::remove_file(&mp3);
        Ok(wav)
    }
}
