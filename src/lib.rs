pub mod config;
pub mod core;
pub mod handlers;
pub mod knowledge;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use crate::core::{
    CallSession, OpenAIRealtime, RealtimeConfig, RealtimeConnection, RealtimeConnector,
    RealtimeError, RealtimeResult, SessionError, SessionResult, SessionSettings,
};
pub use state::AppState;
