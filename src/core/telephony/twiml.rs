//! Call-control markup returned when the platform reports an incoming call.
//!
//! The document greets the caller and then tells the platform to open a
//! bidirectional media stream to this relay:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Response>
//!   <Say>Please wait...</Say>
//!   <Connect><Stream url="wss://relay.example.com/media-stream" /></Connect>
//! </Response>
//! ```

use quick_xml::escape::escape;

/// Path of the media-stream websocket route.
pub const MEDIA_STREAM_PATH: &str = "/media-stream";

/// Build the markup connecting a call to the media stream on `host`.
pub fn connect_stream_response(greeting: &str, host: &str) -> String {
    let stream_url = media_stream_url(host);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response><Say>{}</Say><Connect><Stream url="{}" /></Connect></Response>"#,
        escape(greeting),
        escape(stream_url.as_str()),
    )
}

/// Secure websocket URL of the media-stream route on `host`.
pub fn media_stream_url(host: &str) -> String {
    format!("wss://{host}{MEDIA_STREAM_PATH}")
}

/// Strip an optional port from a `Host` header value.
///
/// Bracketed IPv6 literals keep their brackets.
pub fn hostname_from_authority(authority: &str) -> Option<&str> {
    let authority = authority.trim();
    if authority.is_empty() {
        return None;
    }

    let host = if let Some(rest) = authority.strip_prefix('[') {
        let end = rest.find(']')?;
        &authority[..end + 2]
    } else {
        authority.split(':').next().unwrap_or(authority)
    };

    (!host.is_empty()).then_some(host)
}
