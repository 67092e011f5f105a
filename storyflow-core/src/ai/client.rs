//! AI Client Module
//!
//! Handles communication with the enrichment model via the Gemini REST API
//! or a locally installed Claude CLI.

use crate::ai::enricher::EnrichmentService;
use crate::ai::prompts;
use crate::ai::responses::{self, EnrichedFields};
use crate::models::DraftRow;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use thiserror::Error;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default Gemini REST base URL
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur during AI operations
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Claude CLI not found at {0}")]
    CliNotFound(PathBuf),

    #[error("Claude CLI execution failed: {0}")]
    CliExecFailed(String),

    #[error("API key missing")]
    ApiKeyMissing,

    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    #[error("Invalid response from AI: {0}")]
    InvalidResponse(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("AI integration not available")]
    NotAvailable,
}

/// AI operation mode
#[derive(Debug, Clone, Default)]
pub enum AiMode {
    /// Gemini `generateContent` over HTTPS
    Gemini {
        api_key: String,
        model: String,
        api_base: String,
    },
    /// Use Claude CLI with --print flag
    ClaudeCli { path: PathBuf },
    /// AI features disabled
    #[default]
    Disabled,
}

/// AI Client for the enrichment service
#[derive(Debug, Clone)]
pub struct AiClient {
    mode: AiMode,
    http: Option<reqwest::blocking::Client>,
}

impl Default for AiClient {
    fn default() -> Self {
        Self::disabled()
    }
}

impl AiClient {
    /// Create a client with a specific mode and the default timeout
    pub fn with_mode(mode: AiMode) -> Self {
        Self::with_timeout(mode, DEFAULT_TIMEOUT)
    }

    /// Create a client with a specific mode and request timeout
    pub fn with_timeout(mode: AiMode, timeout: Duration) -> Self {
        let http = match &mode {
            AiMode::Gemini { .. } => match reqwest::blocking::Client::builder()
                .user_agent(format!("storyflow/{}", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
            {
                Ok(client) => Some(client),
                Err(e) => {
                    log::error!("Failed to create HTTP client: {}", e);
                    None
                }
            },
            _ => None,
        };

        Self { mode, http }
    }

    /// A client that always takes the fallback path
    pub fn disabled() -> Self {
        Self {
            mode: AiMode::Disabled,
            http: None,
        }
    }

    /// Check if AI features are available
    pub fn is_available(&self) -> bool {
        match &self.mode {
            AiMode::Gemini { api_key, .. } => !api_key.is_empty() && self.http.is_some(),
            AiMode::ClaudeCli { path } => path.exists(),
            AiMode::Disabled => false,
        }
    }

    /// Get the current mode
    pub fn mode(&self) -> &AiMode {
        &self.mode
    }

    /// Get a description of the current mode
    pub fn mode_description(&self) -> String {
        match &self.mode {
            AiMode::Gemini { model, .. } => format!("Gemini ({})", model),
            AiMode::ClaudeCli { path } => format!("Claude CLI ({})", path.display()),
            AiMode::Disabled => "Disabled".to_string(),
        }
    }

    /// Translate and complete a draft row
    pub fn enrich_row(&self, row: &DraftRow) -> Result<EnrichedFields, AiError> {
        let prompt = prompts::build_enrichment_prompt(row);
        let response = self.send_request(&prompt)?;
        responses::parse_enrichment_response(&response)
    }

    /// Send a request to the AI
    fn send_request(&self, prompt: &str) -> Result<String, AiError> {
        match &self.mode {
            AiMode::Gemini {
                api_key,
                model,
                api_base,
            } => self.send_gemini_request(api_key, model, api_base, prompt),
            AiMode::ClaudeCli { path } => self.send_cli_request(path, prompt),
            AiMode::Disabled => Err(AiError::NotAvailable),
        }
    }

    /// Send request to the Gemini REST API
    fn send_gemini_request(
        &self,
        api_key: &str,
        model: &str,
        api_base: &str,
        prompt: &str,
    ) -> Result<String, AiError> {
        if api_key.is_empty() {
            return Err(AiError::ApiKeyMissing);
        }
        let http = self.http.as_ref().ok_or(AiError::NotAvailable)?;

        let url = format!(
            "{}/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            model
        );

        let response = http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&prompts::gemini_request_body(prompt))
            .send()
            .map_err(|e| AiError::ApiRequestFailed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AiError::RateLimited);
        }

        let body = response
            .text()
            .map_err(|e| AiError::ApiRequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(AiError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        responses::extract_gemini_text(&body)
    }

    /// Send request via Claude CLI
    fn send_cli_request(&self, cli_path: &Path, prompt: &str) -> Result<String, AiError> {
        if !cli_path.exists() {
            return Err(AiError::CliNotFound(cli_path.to_path_buf()));
        }

        // Use --print flag for non-interactive output
        let output = Command::new(cli_path)
            .arg("--print")
            .arg("-p")
            .arg(prompt)
            .output()
            .map_err(|e| AiError::CliExecFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AiError::CliExecFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                stderr
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();

        if response.is_empty() {
            return Err(AiError::InvalidResponse("Empty response from CLI".to_string()));
        }

        Ok(response)
    }
}

impl EnrichmentService for AiClient {
    fn is_available(&self) -> bool {
        AiClient::is_available(self)
    }

    fn describe(&self) -> String {
        self.mode_description()
    }

    fn enrich(&self, row: &DraftRow) -> Result<EnrichedFields, AiError> {
        self.enrich_row(row)
    }
}
