use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use thiserror::Error;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::realtime::{OpenAIRealtime, RealtimeConnector, RealtimeResult};
use crate::core::session::SessionSettings;
use crate::knowledge::load_instructions;

/// Reasons a new call is refused admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectionLimitError {
    #[error("global connection limit reached")]
    GlobalLimitReached,
    #[error("per-IP connection limit reached")]
    PerIpLimitReached,
}

/// Application state shared by all handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Opens one AI connection per call
    pub connector: Arc<dyn RealtimeConnector>,
    /// Voice and instructions applied to every call
    pub session_settings: SessionSettings,
    active_calls: AtomicUsize,
    calls_per_ip: DashMap<IpAddr, u32>,
}

impl AppState {
    /// Build the production state: loads the instructions text and creates
    /// the OpenAI connector.
    pub fn from_config(config: ServerConfig) -> RealtimeResult<Arc<Self>> {
        let connector = OpenAIRealtime::new(config.realtime_config())?;
        let instructions = load_instructions(&config.system_prompt, &config.knowledge_dir);
        Ok(Self::new(config, Arc::new(connector), instructions))
    }

    pub fn new(
        config: ServerConfig,
        connector: Arc<dyn RealtimeConnector>,
        instructions: String,
    ) -> Arc<Self> {
        let session_settings = SessionSettings {
            voice: config.realtime_voice(),
            instructions: Arc::from(instructions),
        };

        info!(
            endpoint = %connector.endpoint(),
            voice = %session_settings.voice,
            max_concurrent_calls = ?config.max_concurrent_calls,
            max_calls_per_ip = config.max_calls_per_ip,
            "Application state initialized"
        );

        Arc::new(Self {
            config,
            connector,
            session_settings,
            active_calls: AtomicUsize::new(0),
            calls_per_ip: DashMap::new(),
        })
    }

    /// Reserve a call slot for `ip`.
    ///
    /// Every successful call must be paired with [`AppState::release_connection`].
    pub fn try_acquire_connection(&self, ip: IpAddr) -> Result<(), ConnectionLimitError> {
        let max_calls = self.config.max_concurrent_calls.unwrap_or(usize::MAX);
        self.active_calls
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < max_calls).then_some(count + 1)
            })
            .map_err(|_| ConnectionLimitError::GlobalLimitReached)?;

        let mut per_ip = self.calls_per_ip.entry(ip).or_insert(0);
        if *per_ip >= self.config.max_calls_per_ip {
            drop(per_ip);
            self.active_calls.fetch_sub(1, Ordering::AcqRel);
            return Err(ConnectionLimitError::PerIpLimitReached);
        }
        *per_ip += 1;

        Ok(())
    }

    /// Release a slot previously reserved for `ip`.
    pub fn release_connection(&self, ip: IpAddr) {
        let _ = self
            .active_calls
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            });

        self.calls_per_ip.remove_if_mut(&ip, |_, count| {
            *count = count.saturating_sub(1);
            *count == 0
        });
    }

    /// Number of calls currently admitted.
    pub fn ws_connection_count(&self) -> usize {
        self.active_calls.load(Ordering::Acquire)
    }

    /// Number of calls currently admitted from `ip`.
    pub fn ip_connection_count(&self, ip: &IpAddr) -> u32 {
        self.calls_per_ip.get(ip).map(|count| *count).unwrap_or(0)
    }
}
