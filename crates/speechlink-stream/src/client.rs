//! Stream client: opens sessions.

use std::fmt;
use std::sync::Arc;

use speechlink_core::{AdmissionController, ContextId, VoiceCatalogPort};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::StreamConfig;
use crate::error::{StreamError, StreamResult};
use crate::establish::{build_target, dial, handshake};
use crate::request::StreamRequest;
use crate::session::{ContextLedger, SessionState, StreamSession, set_state};
use crate::transport::{Connector, FrameWriter, WsConnector};

/// Session type produced by a client over connector `C`.
pub type SessionFor<C> = StreamSession<<C as Connector>::Writer, <C as Connector>::Reader>;

/// Opens streaming sessions.
///
/// Every session opened by one client is admitted against the same
/// [`AdmissionController`]; pass a shared controller with
/// [`StreamClient::with_admission`] to bound contexts across clients.
pub struct StreamClient<C: Connector = WsConnector> {
    connector: C,
    config: StreamConfig,
    admission: Arc<AdmissionController>,
    validator: Option<Arc<dyn VoiceCatalogPort>>,
}

impl<C: Connector> fmt::Debug for StreamClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamClient")
            .field("config", &self.config)
            .field("open_contexts", &self.admission.count())
            .field("validates", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl StreamClient<WsConnector> {
    /// Client over the WebSocket transport.
    pub fn new(config: StreamConfig) -> Self {
        Self::with_connector(WsConnector, config)
    }
}

impl<C: Connector> StreamClient<C> {
    pub fn with_connector(connector: C, config: StreamConfig) -> Self {
        let admission = Arc::new(AdmissionController::for_mode(config.mode));
        Self {
            connector,
            config,
            admission,
            validator: None,
        }
    }

    /// Use a shared admission controller.
    #[must_use]
    pub fn with_admission(mut self, admission: Arc<AdmissionController>) -> Self {
        self.admission = admission;
        self
    }

    /// Validate voice/model compatibility through `catalog` before dialing.
    #[must_use]
    pub fn with_validator(mut self, catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        self.validator = Some(catalog);
        self
    }

    pub const fn admission(&self) -> &Arc<AdmissionController> {
        &self.admission
    }

    pub const fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Open a session: validate, admit the handshake context, dial and
    /// write the handshake.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Validation`] when the voice/model check fails
    /// - [`StreamError::Capacity`] when no context slot is free
    /// - [`StreamError::Connection`] when the connection cannot be opened
    /// - [`StreamError::Protocol`] when the handshake cannot be written
    /// - [`StreamError::Cancelled`] when `cancel` fires first
    ///
    /// Any admitted context is released again on failure.
    pub async fn connect(
        &self,
        request: &StreamRequest,
        cancel: &CancellationToken,
    ) -> StreamResult<SessionFor<C>> {
        let (state, _) = watch::channel(SessionState::Connecting);

        if let Some(catalog) = &self.validator {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(StreamError::Cancelled),
                checked = catalog.validate_voice_model(&request.voice_id, &request.model_id) => checked?,
            }
            debug!(voice_id = %request.voice_id, model_id = %request.model_id, "Voice validated");
        }

        let context = ContextId::generate();
        let contexts = Arc::new(ContextLedger::open(
            Arc::clone(&self.admission),
            self.config.mode,
            context.clone(),
        )?);

        let target = build_target(&self.config, request)?;
        let (mut writer, reader) = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(StreamError::Cancelled),
            dialed = dial(&self.connector, &target) => dialed?,
        };
        set_state(&state, SessionState::Handshaking);

        if let Err(err) = handshake(&mut writer, &context, request).await {
            if let Err(close_err) = writer.close().await {
                warn!(error = %close_err, "Close after failed handshake failed");
            }
            return Err(err);
        }
        set_state(&state, SessionState::Streaming);
        info!(
            context_id = %context,
            voice_id = %request.voice_id,
            model_id = %request.model_id,
            mode = ?self.config.mode,
            "Session established"
        );

        Ok(StreamSession::new(
            writer,
            reader,
            contexts,
            state,
            self.config.fail_on_sink_error,
        ))
    }
}
