use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use crate::channel::{ChannelEvent, ChannelFactory, LogChannel};
use crate::entry::parse_frame;

/// WebSocket-backed channel factory.
///
/// Connects to `<ws-base>/jobs/{id}/logs` with the credential carried as a
/// query parameter, per the channel wire contract.
pub struct WsChannelFactory {
    ws_base: String,
}

impl WsChannelFactory {
    #[must_use]
    pub fn new(ws_base: impl Into<String>) -> Self {
        Self {
            ws_base: ws_base.into(),
        }
    }

    fn endpoint(&self, job_id: &str, token: &str) -> Result<Url, String> {
        let raw = format!("{}/jobs/{job_id}/logs", self.ws_base.trim_end_matches('/'));
        let mut url =
            Url::parse(&raw).map_err(|error| format!("invalid log channel URL {raw}: {error}"))?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }
}

impl ChannelFactory for WsChannelFactory {
    fn connect(
        &self,
        job_id: &str,
        token: &str,
    ) -> BoxFuture<'static, Result<Box<dyn LogChannel>, String>> {
        let endpoint = self.endpoint(job_id, token);
        let job_id = job_id.to_owned();

        async move {
            let endpoint = endpoint?;
            let (stream, _response) = connect_async(endpoint.as_str())
                .await
                .map_err(|error| format!("log channel connect failed: {error}"))?;
            debug!(job = %job_id, "log channel established");
            Ok(Box::new(WsChannel { stream }) as Box<dyn LogChannel>)
        }
        .boxed()
    }
}

struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl LogChannel for WsChannel {
    fn next_event(&mut self) -> BoxFuture<'_, Option<ChannelEvent>> {
        async move {
            loop {
                let message = match self.stream.next().await {
                    Some(Ok(message)) => message,
                    Some(Err(error)) => return Some(ChannelEvent::Failed(error.to_string())),
                    None => return None,
                };

                match message {
                    Message::Text(text) => {
                        // malformed frames are already logged by the parser
                        if let Some(entry) = parse_frame(&text) {
                            return Some(ChannelEvent::Frame(entry));
                        }
                    }
                    Message::Close(frame) => {
                        let normal = frame
                            .as_ref()
                            .is_some_and(|frame| frame.code == CloseCode::Normal);
                        return Some(ChannelEvent::Closed { normal });
                    }
                    // the protocol layer answers pings on our behalf
                    Message::Ping(_) | Message::Pong(_) => {}
                    Message::Binary(_) => {
                        warn!("ignoring unexpected binary log frame");
                    }
                    Message::Frame(_) => {}
                }
            }
        }
        .boxed()
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        async move {
            let _ = self.stream.close(None).await;
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::WsChannelFactory;

    #[test]
    fn endpoint_carries_job_id_and_token_query() {
        let factory = WsChannelFactory::new("ws://console.local/api/");
        let url = factory.endpoint("job-7", "tok en").expect("endpoint");
        assert_eq!(url.path(), "/api/jobs/job-7/logs");
        assert_eq!(url.query(), Some("token=tok+en"));
    }
}
