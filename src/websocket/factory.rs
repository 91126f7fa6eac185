use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::types::constants::TOKEN_QUERY_PARAM;
use crate::types::error::{Result, TransportError};
use crate::types::ChannelId;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build the per-channel connection URL: the channel id becomes the final
/// path segment and the bearer credential rides as a query parameter.
///
/// `ws://host/api/chat/ws` + channel 42 -> `ws://host/api/chat/ws/42?token=...`
pub(crate) fn channel_url(endpoint: &str, channel: ChannelId, token: &str) -> Result<String> {
    let mut url = Url::parse(endpoint)?;

    url.path_segments_mut()
        .map_err(|_| TransportError::Connection(format!("endpoint cannot address channels: {}", endpoint)))?
        .pop_if_empty()
        .push(&channel.to_string());

    url.query_pairs_mut().append_pair(TOKEN_QUERY_PARAM, token);

    Ok(url.to_string())
}

/// Open the physical connection, bounded by the configured timeout.
pub(crate) async fn connect(url: &str, timeout: Duration) -> Result<WsStream> {
    match tokio::time::timeout(timeout, connect_async(url)).await {
        Ok(Ok((stream, _response))) => Ok(stream),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(TransportError::Timeout),
    }
}
