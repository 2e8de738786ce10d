//! Configuration validation.

use url::Url;

use crate::core::realtime::OpenAIRealtimeVoice;

/// The AI credential is mandatory; without it no call can succeed.
pub(super) fn validate_api_key(api_key: &str) -> Result<(), String> {
    if api_key.trim().is_empty() {
        return Err(
            "Missing the OpenAI API key. Set OPENAI_API_KEY or realtime.api_key in the config file"
                .to_string(),
        );
    }
    Ok(())
}

/// The AI endpoint must be a websocket URL.
pub(super) fn validate_realtime_url(realtime_url: &str) -> Result<(), String> {
    let url = Url::parse(realtime_url)
        .map_err(|e| format!("Invalid realtime URL '{realtime_url}': {e}"))?;

    match url.scheme() {
        "ws" | "wss" => Ok(()),
        scheme => Err(format!(
            "Invalid realtime URL '{realtime_url}': scheme must be ws or wss, got {scheme}"
        )),
    }
}

/// The voice must be one the AI endpoint supports.
pub(super) fn validate_voice(voice: &str) -> Result<(), String> {
    if OpenAIRealtimeVoice::parse(voice).is_none() {
        let supported: Vec<&str> = OpenAIRealtimeVoice::all()
            .iter()
            .map(|v| v.as_str())
            .collect();
        return Err(format!(
            "Unsupported voice '{voice}'. Supported voices: {}",
            supported.join(", ")
        ));
    }
    Ok(())
}

/// The model name goes into the endpoint query string verbatim. Which models
/// exist is for the endpoint to decide.
pub(super) fn validate_model(model: &str) -> Result<(), String> {
    let usable = !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !usable {
        return Err(format!(
            "Invalid realtime model '{model}': use letters, digits, '-', '_' or '.'"
        ));
    }
    Ok(())
}

/// Admission limits of zero would reject every call.
pub(super) fn validate_limits(
    max_concurrent_calls: Option<usize>,
    max_calls_per_ip: u32,
) -> Result<(), String> {
    if max_concurrent_calls == Some(0) {
        return Err("max_concurrent_calls must be greater than 0".to_string());
    }
    if max_calls_per_ip == 0 {
        return Err("max_calls_per_ip must be greater than 0".to_string());
    }
    Ok(())
}
