//! Caption retrieval through YouTube's InnerTube player API.

use super::{parse_timedtext, CaptionProvider, CaptionTrack, Fragment, TrackList, TranslationLanguage};
use crate::error::{Result, TubesumError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, instrument};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";
const REQUEST_TIMEOUT_SECS: u64 = 30;

static API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
});

/// Fetches caption tracks straight from youtube.com.
pub struct YoutubeCaptions {
    client: reqwest::Client,
}

impl YoutubeCaptions {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
        // Pre-accepts the EU consent interstitial.
        headers.insert(COOKIE, HeaderValue::from_static("CONSENT=YES+cb"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_watch_html(&self, video_id: &str) -> Result<String> {
        let response = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .send()
            .await?;
        let response = check_status(response, video_id)?;
        let html = response.text().await?;

        if html.contains("action=\"https://consent.youtube.com/s\"") {
            return Err(TubesumError::Captions(format!(
                "YouTube consent page could not be bypassed for {}",
                video_id
            )));
        }

        Ok(html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, video_id)?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            TubesumError::Captions(format!("Unparsable player response for {}: {}", video_id, e))
        })
    }
}

#[async_trait]
impl CaptionProvider for YoutubeCaptions {
    #[instrument(skip(self))]
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList> {
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        debug!("Found InnerTube API key");

        let player = self.fetch_player(video_id, &api_key).await?;
        let tracks = tracks_from_player(video_id, player)?;

        info!(
            "Video {} has {} manual and {} generated caption track(s)",
            video_id,
            tracks.manually_created.len(),
            tracks.generated.len()
        );
        Ok(tracks)
    }

    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch(&self, track: &CaptionTrack) -> Result<Vec<Fragment>> {
        if track.base_url.contains("&exp=xpe") {
            return Err(TubesumError::Captions(
                "Caption track requires a proof-of-origin token".to_string(),
            ));
        }

        let response = self.client.get(&track.base_url).send().await?;
        let response = check_status(response, &track.language_code)?;
        let xml = response.text().await?;

        let fragments = parse_timedtext(&xml)?;
        debug!("Fetched {} caption fragments", fragments.len());
        Ok(fragments)
    }
}

fn check_status(response: reqwest::Response, video_id: &str) -> Result<reqwest::Response> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TubesumError::RequestBlocked(format!(
            "HTTP 429 while fetching {}",
            video_id
        )));
    }

    if !status.is_success() {
        return Err(TubesumError::Captions(format!(
            "HTTP {} while fetching {}",
            status, video_id
        )));
    }

    Ok(response)
}

fn extract_api_key(html: &str, video_id: &str) -> Result<String> {
    if let Some(key) = API_KEY.captures(html).and_then(|c| c.get(1)) {
        return Ok(key.as_str().to_string());
    }

    if html.contains("class=\"g-recaptcha\"") {
        return Err(TubesumError::RequestBlocked(format!(
            "captcha served for {}",
            video_id
        )));
    }

    Err(TubesumError::Captions(format!(
        "Watch page for {} has no InnerTube API key",
        video_id
    )))
}

// === InnerTube response types ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<PlayerCaptions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
    #[serde(default)]
    translation_languages: Vec<RawTranslationLanguage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    name: Option<TextRuns>,
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTranslationLanguage {
    language_code: String,
    language_name: Option<TextRuns>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRuns {
    #[serde(default)]
    runs: Vec<TextRun>,
    simple_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TextRuns {
    fn text(&self) -> Option<String> {
        self.runs
            .first()
            .map(|r| r.text.clone())
            .or_else(|| self.simple_text.clone())
    }
}

fn check_playability(video_id: &str, status: Option<&PlayabilityStatus>) -> Result<()> {
    let Some(status) = status else {
        return Ok(());
    };

    let code = status.status.as_deref().unwrap_or("");
    if code == "OK" {
        return Ok(());
    }

    let reason = status.reason.as_deref().unwrap_or("");

    match code {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(TubesumError::RequestBlocked(format!("bot check for {}", video_id)))
        }
        "ERROR" if reason.contains("unavailable") => {
            Err(TubesumError::VideoUnavailable(video_id.to_string()))
        }
        _ => Err(TubesumError::VideoUnavailable(format!(
            "{} is not playable: {}",
            video_id, reason
        ))),
    }
}

fn tracks_from_player(video_id: &str, player: PlayerResponse) -> Result<TrackList> {
    check_playability(video_id, player.playability_status.as_ref())?;

    let renderer = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .ok_or_else(|| TubesumError::TranscriptsDisabled(video_id.to_string()))?;

    let translation_languages: Vec<TranslationLanguage> = renderer
        .translation_languages
        .into_iter()
        .map(|t| TranslationLanguage {
            language: t
                .language_name
                .and_then(|n| n.text())
                .unwrap_or_else(|| t.language_code.clone()),
            language_code: t.language_code,
        })
        .collect();

    let mut list = TrackList {
        video_id: video_id.to_string(),
        ..Default::default()
    };

    for raw in renderer.caption_tracks {
        let is_generated = raw.kind.as_deref() == Some("asr");
        let track = CaptionTrack {
            language: raw
                .name
                .and_then(|n| n.text())
                .unwrap_or_else(|| raw.language_code.clone()),
            language_code: raw.language_code,
            is_generated,
            is_translatable: raw.is_translatable,
            base_url: raw.base_url.replace("&fmt=srv3", ""),
            translation_languages: if raw.is_translatable {
                translation_languages.clone()
            } else {
                Vec::new()
            },
            translated_from: None,
        };

        if is_generated {
            list.generated.push(track);
        } else {
            list.manually_created.push(track);
        }
    }

    if list.is_empty() {
        return Err(TubesumError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(list)
}
