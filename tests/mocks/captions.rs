use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tubesum::captions::{CaptionProvider, CaptionTrack, Fragment, TrackList, TranslationLanguage};
use tubesum::{Result, TubesumError};

/// Caption provider serving canned tracks, keyed by track URL.
#[derive(Clone, Default)]
pub struct MockCaptions {
    pub tracks: TrackList,
    pub fragments: HashMap<String, Vec<Fragment>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Number of `list_tracks` calls that fail before one succeeds.
    pub list_failures: Arc<Mutex<u32>>,
    pub disabled: bool,
}

impl MockCaptions {
    /// One manual track in `code` whose text is `text`, translatable into `translations`.
    pub fn with_track(code: &str, text: &str, translations: &[&str]) -> Self {
        let base_url = format!("https://captions.test/{}", code);
        let track = CaptionTrack {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: false,
            is_translatable: !translations.is_empty(),
            base_url: base_url.clone(),
            translation_languages: translations
                .iter()
                .map(|t| TranslationLanguage {
                    language_code: t.to_string(),
                    language: t.to_string(),
                })
                .collect(),
            translated_from: None,
        };

        let mut fragments = HashMap::new();
        fragments.insert(base_url, vec![fragment(text)]);

        Self {
            tracks: TrackList {
                video_id: String::new(),
                manually_created: vec![track],
                generated: Vec::new(),
            },
            fragments,
            ..Default::default()
        }
    }

    /// Serve `text` for the translation of the `from` track into `to`.
    pub fn with_translation(mut self, from: &str, to: &str, text: &str) -> Self {
        let url = format!("https://captions.test/{}?tlang={}", from, to);
        self.fragments.insert(url, vec![fragment(text)]);
        self
    }

    /// A video with captions turned off.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Default::default()
        }
    }

    pub fn failing_lists(self, failures: u32) -> Self {
        *self.list_failures.lock().unwrap() = failures;
        self
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

fn fragment(text: &str) -> Fragment {
    Fragment {
        text: text.to_string(),
        start: 0.0,
        duration: 1.0,
    }
}

#[async_trait]
impl CaptionProvider for MockCaptions {
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList> {
        self.calls.lock().unwrap().push(format!("list:{}", video_id));

        {
            let mut failures = self.list_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(TubesumError::RequestBlocked("mock 429".to_string()));
            }
        }

        if self.disabled {
            return Err(TubesumError::TranscriptsDisabled(video_id.to_string()));
        }

        let mut tracks = self.tracks.clone();
        tracks.video_id = video_id.to_string();
        Ok(tracks)
    }

    async fn fetch(&self, track: &CaptionTrack) -> Result<Vec<Fragment>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("fetch:{}", track.base_url));

        self.fragments
            .get(&track.base_url)
            .cloned()
            .ok_or_else(|| TubesumError::Captions(format!("no fixture for {}", track.base_url)))
    }
}
