//! Connection establishment: target construction, dial and handshake.

use speechlink_core::{ContextId, OutboundFrame};
use tracing::{debug, info};
use url::Url;

use crate::config::StreamConfig;
use crate::error::{StreamError, StreamResult, TransportError};
use crate::query;
use crate::request::StreamRequest;
use crate::transport::{ConnectTarget, Connector, FrameWriter};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "xi-api-key";

/// Build the connection target for `request`.
///
/// `{base}/text-to-speech/{voice_id}/multi-stream-input` with `model_id`,
/// `inactivity_timeout` and `sync_alignment` followed by the request's
/// query modifiers.
pub fn build_target(config: &StreamConfig, request: &StreamRequest) -> StreamResult<ConnectTarget> {
    let invalid = |e: url::ParseError| StreamError::Connection(TransportError::InvalidUrl(e));

    let mut url = Url::parse(&config.base_url).map_err(invalid)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
        path.pop_if_empty()
            .extend(["text-to-speech", request.voice_id.as_str(), "multi-stream-input"]);
    }

    let mut pairs = vec![
        ("model_id".to_string(), request.model_id.clone()),
        (
            "inactivity_timeout".to_string(),
            config.inactivity_timeout.to_string(),
        ),
        (
            "sync_alignment".to_string(),
            config.sync_alignment.to_string(),
        ),
    ];
    query::merge(&mut pairs, &request.query);
    url.query_pairs_mut().clear().extend_pairs(&pairs);

    let mut headers = Vec::with_capacity(3);
    if let Some(key) = &config.api_key {
        headers.push((API_KEY_HEADER.to_string(), key.clone()));
    }
    headers.push(("Content-Type".to_string(), "application/json".to_string()));
    headers.push(("Accept".to_string(), "*/*".to_string()));

    Ok(ConnectTarget { url, headers })
}

/// Open the connection.
pub async fn dial<C: Connector>(
    connector: &C,
    target: &ConnectTarget,
) -> StreamResult<(C::Writer, C::Reader)> {
    debug!(host = target.url.host_str(), path = target.url.path(), "Dialing");
    let halves = connector
        .connect(target)
        .await
        .map_err(StreamError::Connection)?;
    info!(path = target.url.path(), "Connection opened");
    Ok(halves)
}

/// Write the handshake frame opening `context`.
pub async fn handshake<W: FrameWriter>(
    writer: &mut W,
    context: &ContextId,
    request: &StreamRequest,
) -> StreamResult<()> {
    let frame = OutboundFrame::init(context.clone())
        .with_voice_settings(request.voice_settings)
        .with_generation_config(request.generation_config.clone())
        .encode()?;

    writer.send(frame).await.map_err(|e| StreamError::Protocol {
        message: format!("handshake write failed: {e}"),
    })?;
    debug!(context_id = %context, "Handshake sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryOption;
    use crate::testing::{MemoryConnector, memory_pair};
    use speechlink_core::VoiceSettings;

    fn request() -> StreamRequest {
        StreamRequest::new("voice-1", "eleven_flash_v2_5")
    }

    #[test]
    fn target_has_path_query_and_headers() {
        let config = StreamConfig::new().with_api_key("secret");
        let target = build_target(&config, &request()).unwrap();

        assert_eq!(
            target.url.as_str(),
            "wss://api.elevenlabs.io/v1/text-to-speech/voice-1/multi-stream-input\
             ?model_id=eleven_flash_v2_5&inactivity_timeout=180&sync_alignment=true"
        );
        assert_eq!(
            target.headers,
            vec![
                ("xi-api-key".to_string(), "secret".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "*/*".to_string()),
            ]
        );
    }

    #[test]
    fn api_key_header_is_omitted_without_key() {
        let target = build_target(&StreamConfig::new(), &request()).unwrap();
        assert!(target.headers.iter().all(|(k, _)| k != API_KEY_HEADER));
    }

    #[test]
    fn modifiers_override_defaults_without_duplicates() {
        let request = request()
            .with_query(QueryOption::SyncAlignment(false))
            .with_query(QueryOption::OutputFormat("pcm_16000".into()));
        let target = build_target(&StreamConfig::new(), &request).unwrap();

        let pairs: Vec<(String, String)> = target.url.query_pairs().into_owned().collect();
        assert_eq!(pairs.iter().filter(|(k, _)| k == "sync_alignment").count(), 1);
        assert!(pairs.contains(&("sync_alignment".into(), "false".into())));
        assert!(pairs.contains(&("output_format".into(), "pcm_16000".into())));
    }

    #[test]
    fn invalid_base_url_is_a_connection_error() {
        let config = StreamConfig::new().with_base_url("not a url");
        assert!(matches!(
            build_target(&config, &request()),
            Err(StreamError::Connection(TransportError::InvalidUrl(_)))
        ));
    }

    #[tokio::test]
    async fn handshake_sends_single_space_init() {
        let (mut writer, _reader, mut remote) = memory_pair();
        let ctx = ContextId::from("ctx-1");
        let request = request().with_voice_settings(VoiceSettings::new(0.5, 0.5));

        handshake(&mut writer, &ctx, &request).await.unwrap();

        let frame: serde_json::Value =
            serde_json::from_str(&remote.sent.recv().await.unwrap()).unwrap();
        assert_eq!(frame["text"], " ");
        assert_eq!(frame["context_id"], "ctx-1");
        assert_eq!(frame["voice_settings"]["stability"], 0.5);
    }

    #[tokio::test]
    async fn handshake_write_failure_is_protocol_error() {
        let (mut writer, _reader, _remote) = memory_pair();
        writer.fail_writes();
        let err = handshake(&mut writer, &ContextId::from("c"), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::Protocol { .. }));
    }

    #[tokio::test]
    async fn dial_failure_is_connection_error() {
        let target = build_target(&StreamConfig::new(), &request()).unwrap();
        let err = dial(&MemoryConnector::refusing(), &target).await.unwrap_err();
        assert!(matches!(err, StreamError::Connection(_)));
    }
}
