/**
 * WebSocket Connection Actor
 *
 * One task pair per authenticated socket:
 *
 * - the writer owns the sink and drains the connection's outbound queue,
 *   serializing each `ServerEvent` as a JSON text frame
 * - the reader loop parses incoming text frames and hands them to the
 *   `Session`
 *
 * When the writer sees `Superseded` it forwards the frame, closes the socket
 * with `CLOSE_SUPERSEDED` and exits, which in turn ends the reader loop.
 * Any exit path runs `Session::close`.
 */

use crate::backend::chat::ChatService;
use crate::backend::presence::ConnectionHandle;
use crate::backend::realtime::session::Session;
use crate::shared::{ServerEvent, UserId};
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

/// Close code sent to a connection replaced by a newer one
pub const CLOSE_SUPERSEDED: u16 = 4000;

/// Drive one authenticated socket until either side goes away
pub async fn run_connection(
    socket: WebSocket,
    service: ChatService,
    user: UserId,
    outbound_buffer: usize,
) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (handle, rx) = ConnectionHandle::channel(outbound_buffer);

    let mut writer = tokio::spawn(writer_task(ws_sender, rx, user.clone()));
    let session = Session::open(service, user, handle).await;

    tracing::info!(
        user_id = %session.user(),
        connection = %session.connection_id(),
        "[Realtime] WebSocket actor started"
    );

    loop {
        tokio::select! {
            _ = &mut writer => {
                tracing::debug!(user_id = %session.user(), "[Realtime] Writer finished");
                break;
            }
            frame = ws_receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => session.handle_frame(text.as_str()).await,
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!(user_id = %session.user(), "[Realtime] Ignoring binary frame");
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(user_id = %session.user(), reason = ?frame, "[Realtime] Client initiated close");
                    break;
                }
                // Ping/pong are answered by the protocol layer
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(user_id = %session.user(), error = %e, "[Realtime] WebSocket receive error");
                    break;
                }
                None => {
                    tracing::info!(user_id = %session.user(), "[Realtime] WebSocket stream ended");
                    break;
                }
            }
        }
    }

    writer.abort();
    session.close();
}

async fn writer_task(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<ServerEvent>,
    user: UserId,
) {
    while let Some(event) = rx.recv().await {
        let superseded = event == ServerEvent::Superseded;

        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(user_id = %user, "[Realtime] Failed to serialize event: {}", e);
                continue;
            }
        };

        if sink.send(Message::Text(text.into())).await.is_err() {
            break;
        }

        if superseded {
            tracing::info!(user_id = %user, "[Realtime] Closing superseded connection");
            let close = CloseFrame {
                code: CLOSE_SUPERSEDED,
                reason: "Superseded by a newer connection".into(),
            };
            let _ = sink.send(Message::Close(Some(close))).await;
            break;
        }
    }
}
