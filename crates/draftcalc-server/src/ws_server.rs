// WebSocket server: accepts clients and answers each request frame with one
// response frame.

use futures_util::sink::{Sink, SinkExt};
use futures_util::stream::{Stream, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{info, warn};

use crate::handler::{self, SharedEngine};

/// Bind the listener on `127.0.0.1:{port}`. Port 0 picks a free port.
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    info!("WebSocket server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept connections forever, serving each on its own task. Requests from
/// every client go through the same engine.
pub async fn run(listener: TcpListener, engine: SharedEngine) -> anyhow::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let addr_str = addr.to_string();
        info!("Accepted TCP connection from {addr_str}");

        let engine = engine.clone();
        tokio::spawn(async move {
            let ws_stream = match tokio_tungstenite::accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    warn!("WebSocket handshake failed for {addr_str}: {e}");
                    return;
                }
            };

            let (write, read) = ws_stream.split();
            if let Err(e) = process_message_stream(read, write, &engine, &addr_str).await {
                warn!("Failed to reply to {addr_str}: {e}");
            }
            info!("Client {addr_str} disconnected");
        });
    }
}

/// Read frames from `stream` and answer every text frame on `sink`.
///
/// Generic over both halves so it runs against in-memory streams in tests.
/// Stops at a close frame, a read error or the end of the stream; returns an
/// error only when a reply cannot be sent.
pub async fn process_message_stream<St, Si>(
    mut stream: St,
    mut sink: Si,
    engine: &SharedEngine,
    addr: &str,
) -> Result<(), Si::Error>
where
    St: Stream<Item = Result<Message, WsError>> + Unpin,
    Si: Sink<Message> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let response = handler::handle_text(engine, text.as_str());
                sink.send(Message::Text(response.to_json().into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {addr} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {addr}: {e}");
                break;
            }
            _ => {
                // Binary, Ping, Pong and raw frames carry no requests.
            }
        }
    }
    Ok(())
}
