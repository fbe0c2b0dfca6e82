//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the language model that interprets transcripts.
///
/// No request timeout is configured: a model call either returns a result or
/// an error outcome. The inactivity timer on the listening side is the only
/// deadline in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API endpoint.
    pub base_url: String,
    /// API key — `None` falls back to the `OPENAI_API_KEY` environment
    /// variable, and local providers need neither.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0). Lower = more deterministic.
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4".into(),
            temperature: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper transcription engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model name / file stem (e.g. `"base.en"`).
    pub model: String,
    /// Speech language as an ISO-639-1 code, or `"auto"` for Whisper's
    /// built-in language detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "base.en".into(),
            language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Toggle chord: held modifiers plus the trigger key, `+`-separated.
    /// The toggle fires when the trigger is released while the rest of the
    /// chord is held (e.g. `"Command+Control"`).
    pub toggle_chord: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_chord: "Command+Control".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ListeningConfig
// ---------------------------------------------------------------------------

/// Settings for the listening state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningConfig {
    /// Seconds of listening after which capture stops automatically when the
    /// user never toggles off.
    pub timeout_secs: u64,
    /// Milliseconds between capture pulls while listening.
    pub tick_ms: u64,
}

impl Default for ListeningConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            tick_ms: 1_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Few-shot examples
// ---------------------------------------------------------------------------

/// One sample `{input, output}` pair shown to the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FewShotExample {
    /// A transcript the user might say.
    pub input: String,
    /// The directive the model should produce for it.
    pub output: String,
}

/// The ordered few-shot examples registered for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramExamples {
    /// Application name as reported by the active-application resolver.
    /// Matching is exact and case-sensitive.
    pub program: String,
    /// Examples in the order they are sent to the model.
    pub examples: Vec<FewShotExample>,
}

fn example(input: &str, output: &str) -> FewShotExample {
    FewShotExample {
        input: input.into(),
        output: output.into(),
    }
}

/// Built-in example sets for a terminal and a browser, so a first run can
/// interpret common requests before the user writes any configuration.
fn default_programs() -> Vec<ProgramExamples> {
    vec![
        ProgramExamples {
            program: "iTerm2".into(),
            examples: vec![
                example("change to my home directory", "cd ~"),
                example("new tab", "{Command}+t"),
                example(
                    "Interactively rebase the last 3 commits",
                    "git rebase -i HEAD~3",
                ),
                example("split horizontally", "{Command+Shift}+d"),
            ],
        },
        ProgramExamples {
            program: "Google Chrome".into(),
            examples: vec![example(
                "Visit CNN.com in a new tab.",
                "{Command}+t\nhttps://cnn.com{Enter}",
            )],
        },
    ]
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use handsfree::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model settings.
    pub llm: LlmConfig,
    /// Transcription engine settings.
    pub stt: SttConfig,
    /// Global hotkey binding.
    pub hotkey: HotkeyConfig,
    /// Listening state-machine settings.
    pub listening: ListeningConfig,
    /// Per-application few-shot example sets.
    pub programs: Vec<ProgramExamples>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            stt: SttConfig::default(),
            hotkey: HotkeyConfig::default(),
            listening: ListeningConfig::default(),
            programs: default_programs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
