//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{LlmSettings, Settings};
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("tubesum doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api = vec![
        check_api_key(&settings.llm),
        CheckResult::ok("Endpoint", &settings.llm.base_url),
        CheckResult::ok("Model", &settings.llm.model),
    ];
    api.iter().for_each(CheckResult::print);
    checks.extend(api);
    println!();

    // Media tools only matter for the audio fallback.
    println!("{}", style("Audio Fallback Tools").bold());
    let required = settings.captions.audio_fallback;
    let tools = vec![
        check_tool("yt-dlp", &["--version"], install_hint_ytdlp(), required),
        check_tool("ffmpeg", &["-version"], install_hint_ffmpeg(), required),
        check_tool("ffprobe", &["-version"], install_hint_ffmpeg(), required),
    ];
    tools.iter().for_each(CheckResult::print);
    checks.extend(tools);
    println!();

    println!("{}", style("Files").bold());
    let files = vec![check_temp_dir(settings), check_config_file()];
    files.iter().for_each(CheckResult::print);
    checks.extend(files);
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using tubesum.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! tubesum is ready to use.");
    }

    Ok(())
}

/// Check an external tool. Missing tools are errors only when `required`.
fn check_tool(name: &str, args: &[&str], hint: &str, required: bool) -> CheckResult {
    let missing = |message: &str| {
        if required {
            CheckResult::error(name, message, hint)
        } else {
            CheckResult::warning(name, message, hint)
        }
    };

    match Command::new(name).args(args).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok(name, &truncate(&version, 50))
        }
        Ok(_) => missing("installed but not working"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => missing("not found"),
        Err(e) => missing(&format!("error: {}", e)),
    }
}

fn check_api_key(llm: &LlmSettings) -> CheckResult {
    let name = llm.api_key_env.as_str();
    match llm.api_key() {
        Ok(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(&key))),
        Err(_) => CheckResult::error(
            name,
            "not set",
            &format!("Set with: export {}='...' or add it to a .env file", name),
        ),
    }
}

fn check_temp_dir(settings: &Settings) -> CheckResult {
    let temp_dir = settings.temp_dir();
    if temp_dir.exists() {
        CheckResult::ok("Temp directory", &temp_dir.display().to_string())
    } else {
        CheckResult::warning(
            "Temp directory",
            &format!("{} (will be created)", temp_dir.display()),
            "Directory will be created on first use",
        )
    }
}

fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: tubesum config init",
        )
    }
}

/// Show only the edges of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_missing_optional_tool_is_warning() {
        let result = check_tool("tubesum-missing-tool", &["--version"], "install it", false);
        assert_eq!(result.status, CheckStatus::Warning);

        let result = check_tool("tubesum-missing-tool", &["--version"], "install it", true);
        assert_eq!(result.status, CheckStatus::Error);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("gsk_abcdefghijklmnop1234"), "gsk_...1234");
        assert_eq!(mask_key("short"), "*****");
    }
}
