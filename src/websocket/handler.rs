use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{AppState, ServerMessage};
use crate::session::{ClientSink, SessionError};

/// Text pushed to one client socket.
#[derive(Message)]
#[rtype(result = "()")]
pub struct OutboundText(pub String);

/// `ClientSink` backed by a socket actor's mailbox. A send to a stopped
/// actor is dropped and logged, never retried or queued.
pub struct WsSink {
    recipient: Recipient<OutboundText>,
}

impl ClientSink for WsSink {
    fn send(&self, text: String) {
        if let Err(err) = self.recipient.try_send(OutboundText(text)) {
            warn!("dropping message for closed socket: {}", err);
        }
    }
}

/// One WebSocket connection. Frames are handed to the coordinator; the
/// actor only tracks which auth token this socket bound so the
/// connection entry can be removed when the socket closes.
pub struct ChessSocket {
    pub connection_id: String,
    pub bound_token: Option<String>,
    pub state: web::Data<AppState>,
}

impl Actor for ChessSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("WebSocket connection started: {}", self.connection_id);
    }

    fn stopping(&mut self, _ctx: &mut Self::Context) -> Running {
        if let Some(token) = self.bound_token.take() {
            self.state.sessions.disconnect(&token);
        }
        info!("WebSocket connection closed: {}", self.connection_id);
        Running::Stop
    }
}

impl Handler<OutboundText> for ChessSocket {
    type Result = ();

    fn handle(&mut self, msg: OutboundText, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("received frame on {}: {}", self.connection_id, text);
                let sink: Arc<dyn ClientSink> = Arc::new(WsSink {
                    recipient: ctx.address().recipient(),
                });
                if let Some(token) = self.state.sessions.handle_raw(text.as_ref(), &sink) {
                    self.bound_token = Some(token);
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("binary frame on {} ignored", self.connection_id);
                let message = ServerMessage::Error {
                    message: SessionError::Malformed(
                        "binary frames are not supported".to_string(),
                    )
                    .to_string(),
                };
                if let Ok(text) = serde_json::to_string(&message) {
                    ctx.text(text);
                }
            }
            Ok(ws::Message::Close(reason)) => {
                info!("connection {} closed: {:?}", self.connection_id, reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct Collector {
        received: Arc<Mutex<Vec<String>>>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<OutboundText> for Collector {
        type Result = ();

        fn handle(&mut self, msg: OutboundText, _ctx: &mut Context<Self>) {
            self.received.lock().unwrap().push(msg.0);
        }
    }

    #[derive(Message)]
    #[rtype(result = "()")]
    struct Shutdown;

    impl Handler<Shutdown> for Collector {
        type Result = ();

        fn handle(&mut self, _msg: Shutdown, ctx: &mut Context<Self>) {
            ctx.stop();
        }
    }

    #[actix_rt::test]
    async fn sink_delivers_to_a_live_mailbox() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let addr = Collector {
            received: received.clone(),
        }
        .start();
        let sink = WsSink {
            recipient: addr.recipient(),
        };

        sink.send("hello".to_string());
        actix_rt::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(received.lock().unwrap().clone(), vec!["hello".to_string()]);
    }

    #[actix_rt::test]
    async fn sink_drops_sends_after_the_mailbox_closes() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let addr = Collector {
            received: received.clone(),
        }
        .start();
        let sink = WsSink {
            recipient: addr.clone().recipient(),
        };

        addr.send(Shutdown).await.unwrap();
        actix_rt::time::sleep(Duration::from_millis(20)).await;

        // Dropped, never delivered or retried.
        sink.send("late".to_string());
        actix_rt::time::sleep(Duration::from_millis(20)).await;
        assert!(received.lock().unwrap().is_empty());
    }
}

/// WebSocket upgrade endpoint.
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let connection_id = Uuid::new_v4().to_string();
    info!("new WebSocket connection: {}", connection_id);

    let socket = ChessSocket {
        connection_id,
        bound_token: None,
        state: state.clone(),
    };
    ws::start(socket, &req, stream)
}
