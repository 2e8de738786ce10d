pub mod audio;
pub mod realtime;
pub mod session;
pub mod telephony;

// Re-export commonly used types for convenience
pub use realtime::{
    OpenAIRealtime, RealtimeConfig, RealtimeConnection, RealtimeConnector, RealtimeError,
    RealtimeResult,
};

pub use session::{CallSession, SessionError, SessionResult, SessionSettings};
