mod mocks;

use mocks::{captions::MockCaptions, chat::MockChat, test_settings, Harness};
use std::time::Duration;
use tubesum::language::Language;
use tubesum::transcript::TranscriptSource;
use tubesum::TubesumError;

const URL: &str = "https://www.youtube.com/watch?v=abc123XYZ&t=42";

// ─── Transcripts ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_transcript_in_track_language() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "hello there", &[]),
        MockChat::new("unused"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let transcript = assistant.transcript(URL, Language::En).await.unwrap();

    assert_eq!(transcript.video_id, "abc123XYZ");
    assert_eq!(transcript.text, "hello there");
    assert_eq!(transcript.language, "en");
    assert!(!transcript.translated);
    assert_eq!(transcript.source, TranscriptSource::Captions);
    assert_eq!(transcript.fallback_notice(Language::En), None);
}

#[tokio::test]
async fn test_transcript_is_translated_when_offered() {
    let dir = tempfile::tempdir().unwrap();
    let captions = MockCaptions::with_track("en", "hello", &["es"]).with_translation("en", "es", "hola");
    let harness = Harness::new(captions, MockChat::new("unused"));
    let assistant = harness.assistant(test_settings(dir.path()));

    let transcript = assistant.transcript(URL, Language::Es).await.unwrap();

    assert_eq!(transcript.text, "hola");
    assert_eq!(transcript.language, "es");
    assert_eq!(transcript.original_language, "en");
    assert!(transcript.translated);
}

#[tokio::test]
async fn test_untranslatable_track_falls_back_to_original() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("hi", "namaste", &[]),
        MockChat::new("unused"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let transcript = assistant.transcript(URL, Language::Fr).await.unwrap();

    assert_eq!(transcript.text, "namaste");
    assert_eq!(transcript.language, "hi");
    assert!(!transcript.translated);
    assert_eq!(
        transcript.fallback_notice(Language::Fr).as_deref(),
        Some("Could not translate to French. Using original language (hi).")
    );
}

#[tokio::test]
async fn test_failed_translated_fetch_falls_back_to_original() {
    let dir = tempfile::tempdir().unwrap();
    // Spanish is offered but its download fails.
    let harness = Harness::new(
        MockCaptions::with_track("en", "hello", &["es"]),
        MockChat::new("unused"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let transcript = assistant.transcript(URL, Language::Es).await.unwrap();

    assert_eq!(transcript.text, "hello");
    assert_eq!(transcript.language, "en");
    assert!(!transcript.translated);
    assert_eq!(harness.captions.count("fetch:"), 2);
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_any_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "hello", &[]),
        MockChat::new("unused"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let result = assistant.transcript("https://vimeo.com/12345", Language::En).await;

    assert!(matches!(result, Err(TubesumError::InvalidUrl(_))));
    assert!(harness.captions.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transcript_is_cached_per_url_and_language() {
    let dir = tempfile::tempdir().unwrap();
    let captions = MockCaptions::with_track("en", "hello", &["es"]).with_translation("en", "es", "hola");
    let harness = Harness::new(captions, MockChat::new("unused"));
    let assistant = harness.assistant(test_settings(dir.path()));

    assistant.transcript(URL, Language::En).await.unwrap();
    assistant.transcript(URL, Language::En).await.unwrap();
    assert_eq!(harness.captions.count("list:"), 1);

    assistant.transcript(URL, Language::Es).await.unwrap();
    assert_eq!(harness.captions.count("list:"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_expired_transcript_is_fetched_again() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "hello", &[]),
        MockChat::new("unused"),
    );
    let mut settings = test_settings(dir.path());
    settings.cache.transcript_ttl_seconds = 60;
    let assistant = harness.assistant(settings);

    assistant.transcript(URL, Language::En).await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    assistant.transcript(URL, Language::En).await.unwrap();

    assert_eq!(harness.captions.count("list:"), 2);
}

// ─── Retries ─────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_track_listing_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let captions = MockCaptions::with_track("en", "hello", &[]).failing_lists(2);
    let harness = Harness::new(captions, MockChat::new("unused"));
    let assistant = harness.assistant(test_settings(dir.path()));

    let transcript = assistant.transcript(URL, Language::En).await.unwrap();

    assert_eq!(transcript.text, "hello");
    assert_eq!(harness.captions.count("list:"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retries_give_up_with_last_error() {
    let dir = tempfile::tempdir().unwrap();
    let captions = MockCaptions::with_track("en", "hello", &[]).failing_lists(5);
    let harness = Harness::new(captions, MockChat::new("unused"));
    let assistant = harness.assistant(test_settings(dir.path()));

    let result = assistant.transcript(URL, Language::En).await;

    assert!(matches!(result, Err(TubesumError::RequestBlocked(_))));
    assert_eq!(harness.captions.count("list:"), 3);
}

// ─── Audio fallback ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_disabled_captions_error_without_audio_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(MockCaptions::disabled(), MockChat::new("unused"));
    let assistant = harness.assistant(test_settings(dir.path()));

    let result = assistant.transcript(URL, Language::En).await;

    assert!(matches!(result, Err(TubesumError::TranscriptsDisabled(_))));
    assert!(harness.downloader.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_audio_fallback_transcribes_speech() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(MockCaptions::disabled(), MockChat::new("unused"));
    let mut settings = test_settings(dir.path());
    settings.captions.audio_fallback = true;
    let assistant = harness.assistant(settings);

    let transcript = assistant.transcript(URL, Language::En).await.unwrap();

    assert_eq!(transcript.source, TranscriptSource::Speech);
    assert_eq!(transcript.text, "spoken words from the audio");
    assert_eq!(transcript.language, "en");
    assert_eq!(harness.downloader.calls.lock().unwrap().len(), 1);
    assert_eq!(harness.transcriber.calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_blocked_requests_do_not_trigger_audio_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let captions = MockCaptions::with_track("en", "hello", &[]).failing_lists(10);
    let harness = Harness::new(captions, MockChat::new("unused"));
    let mut settings = test_settings(dir.path());
    settings.captions.audio_fallback = true;
    let assistant = harness.assistant(settings);

    let result = assistant.transcript(URL, Language::En).await;

    assert!(matches!(result, Err(TubesumError::RequestBlocked(_))));
    assert!(harness.downloader.calls.lock().unwrap().is_empty());
}

// ─── Notes and Q&A ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_summary_includes_transcript_and_is_cached() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "the mitochondria is the powerhouse", &[]),
        MockChat::new("## Notes\n- cells"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let first = assistant.summarize(URL, Language::En).await.unwrap();
    let second = assistant.summarize(URL, Language::En).await.unwrap();

    assert_eq!(first, "## Notes\n- cells");
    assert_eq!(first, second);

    let calls = harness.chat.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].user.ends_with("the mitochondria is the powerhouse"));
    assert!(calls[0].system.is_some());
    assert_eq!(calls[0].temperature, Some(0.7));
    assert_eq!(calls[0].max_tokens, Some(2000));
}

#[tokio::test]
async fn test_llm_failure_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "hello", &[]),
        MockChat::failing("rate limited"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    assert!(matches!(
        assistant.summarize(URL, Language::En).await,
        Err(TubesumError::Llm(_))
    ));
    assert!(assistant.summarize(URL, Language::En).await.is_err());
    assert_eq!(harness.chat.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_ask_builds_question_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "rust has no garbage collector", &[]),
        MockChat::new("No, it uses ownership."),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let answer = assistant
        .ask(URL, "  Does Rust have a GC?  ", Language::En)
        .await
        .unwrap();

    assert_eq!(answer, "No, it uses ownership.");
    let calls = harness.chat.calls.lock().unwrap();
    assert_eq!(
        calls[0].user,
        "Based on this video transcript: rust has no garbage collector\n\nQuestion: Does Rust have a GC?\n\nAnswer:"
    );
    assert_eq!(calls[0].system, None);
    assert_eq!(calls[0].temperature, None);
}

#[tokio::test]
async fn test_blank_question_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        MockCaptions::with_track("en", "hello", &[]),
        MockChat::new("unused"),
    );
    let assistant = harness.assistant(test_settings(dir.path()));

    let result = assistant.ask(URL, "   ", Language::En).await;

    assert!(matches!(result, Err(TubesumError::InvalidInput(_))));
    assert!(harness.captions.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_speak_returns_audio() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(MockCaptions::default(), MockChat::new("unused"));
    let assistant = harness.assistant(test_settings(dir.path()));

    let audio = assistant.speak("Hello").await.unwrap();

    assert_eq!(audio.format, "wav");
    assert!(audio.to_html_player().starts_with("<audio controls"));
    assert_eq!(harness.speech.calls.lock().unwrap().as_slice(), ["Hello"]);
}
