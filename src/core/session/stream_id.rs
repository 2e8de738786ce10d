use once_cell::sync::OnceCell;
use tracing::warn;

/// Write-once cell holding the telephony stream identifier.
///
/// The inbound relay is the only writer; the outbound relay reads it without
/// blocking. Once set the value never changes, so readers see either nothing
/// or the final identifier.
#[derive(Debug, Default)]
pub struct StreamId(OnceCell<String>);

impl StreamId {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `id` if no identifier has been stored yet.
    ///
    /// Returns `true` when this call stored the value. A later `start` event
    /// carrying a different identifier is ignored with a warning.
    pub fn latch(&self, id: &str) -> bool {
        match self.0.set(id.to_string()) {
            Ok(()) => true,
            Err(_) => {
                if let Some(current) = self.get()
                    && current != id
                {
                    warn!(
                        current = current,
                        ignored = id,
                        "Ignoring stream id from repeated start event"
                    );
                }
                false
            }
        }
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}
