//! Merge environment variables, YAML overrides, and defaults into a
//! [`ServerConfig`].

use std::path::PathBuf;

use super::yaml::YamlConfig;
use super::{
    DEFAULT_GREETING, DEFAULT_HOST, DEFAULT_KNOWLEDGE_DIR, DEFAULT_MAX_CALLS_PER_IP,
    DEFAULT_PORT, DEFAULT_SYSTEM_PROMPT, DEFAULT_VOICE, ServerConfig, TlsConfig, env,
};
use crate::core::realtime::{DEFAULT_REALTIME_MODEL, OPENAI_REALTIME_URL};

/// Build the final configuration.
///
/// Each field takes the YAML value when present, else the environment
/// variable, else the default.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let realtime = yaml.realtime.unwrap_or_default();
    let instructions = yaml.instructions.unwrap_or_default();
    let telephony = yaml.telephony.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    let host = server
        .host
        .or_else(|| env::var("HOST"))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = match server.port {
        Some(port) => port,
        None => env::parse::<u16>("PORT")?.unwrap_or(DEFAULT_PORT),
    };

    let tls_yaml = server.tls.unwrap_or_default();
    let cert_path = tls_yaml.cert_path.or_else(|| env::var("TLS_CERT_PATH"));
    let key_path = tls_yaml.key_path.or_else(|| env::var("TLS_KEY_PATH"));
    let tls = match (cert_path, key_path) {
        (Some(cert_path), Some(key_path)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        }),
        (None, None) => None,
        _ => {
            return Err(
                "TLS requires both a certificate path and a key path (TLS_CERT_PATH and TLS_KEY_PATH)"
                    .into(),
            );
        }
    };

    let public_host = server.public_host.or_else(|| env::var("PUBLIC_HOST"));

    let openai_api_key = realtime
        .api_key
        .or_else(|| env::var("OPENAI_API_KEY"))
        .unwrap_or_default();
    let realtime_url = realtime
        .url
        .or_else(|| env::var("OPENAI_REALTIME_URL"))
        .unwrap_or_else(|| OPENAI_REALTIME_URL.to_string());
    let realtime_model = realtime
        .model
        .or_else(|| env::var("OPENAI_REALTIME_MODEL"))
        .unwrap_or_else(|| DEFAULT_REALTIME_MODEL.to_string());
    let voice = realtime
        .voice
        .or_else(|| env::var("REALTIME_VOICE"))
        .unwrap_or_else(|| DEFAULT_VOICE.to_string());

    let knowledge_dir = instructions
        .knowledge_dir
        .or_else(|| env::var("KNOWLEDGE_DIR"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_DIR));
    let system_prompt = instructions
        .system_prompt
        .or_else(|| env::var("SYSTEM_PROMPT"))
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

    let greeting = telephony
        .greeting
        .or_else(|| env::var("CALL_GREETING"))
        .unwrap_or_else(|| DEFAULT_GREETING.to_string());

    let max_concurrent_calls = match security.max_concurrent_calls {
        Some(limit) => Some(limit),
        None => env::parse::<usize>("MAX_CONCURRENT_CALLS")?,
    };
    let max_calls_per_ip = match security.max_calls_per_ip {
        Some(limit) => limit,
        None => env::parse::<u32>("MAX_CALLS_PER_IP")?.unwrap_or(DEFAULT_MAX_CALLS_PER_IP),
    };

    Ok(ServerConfig {
        host,
        port,
        tls,
        public_host,
        openai_api_key,
        realtime_url,
        realtime_model,
        voice,
        knowledge_dir,
        system_prompt,
        greeting,
        max_concurrent_calls,
        max_calls_per_ip,
    })
}
