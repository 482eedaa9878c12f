use log::{info, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::chess::Color;
use crate::models::game_record::GameRecord;
use crate::models::messages::{ClientCommand, CommandType, ServerMessage};
use crate::session::error::SessionError;
use crate::session::registry::{ClientSink, Connection, ConnectionRegistry};
use crate::store::{AuthStore, GameStore};

/// Dispatches client commands against the stores and fans results out
/// through the registry. Owns nothing mutable itself; all shared state
/// lives in the stores and the registry, which are handed in at
/// construction. Processing is synchronous; handlers for different
/// connections run concurrently and serialize only on the per-game lock.
#[derive(Clone)]
pub struct SessionCoordinator {
    auth: Arc<AuthStore>,
    games: Arc<GameStore>,
    registry: Arc<ConnectionRegistry>,
}

impl SessionCoordinator {
    pub fn new(
        auth: Arc<AuthStore>,
        games: Arc<GameStore>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        SessionCoordinator {
            auth,
            games,
            registry,
        }
    }

    /// Entry point for one inbound frame. Returns the auth token when
    /// the frame was a successful CONNECT, so the socket handler can
    /// unregister that token when the socket closes.
    pub fn handle_raw(&self, raw: &str, sink: &Arc<dyn ClientSink>) -> Option<String> {
        match serde_json::from_str::<ClientCommand>(raw) {
            Ok(command) => self.handle_command(command, sink),
            Err(err) => {
                warn!("unparseable command: {}", err);
                send_to_sink(
                    sink,
                    &error_message(&SessionError::Malformed(err.to_string())),
                );
                None
            }
        }
    }

    /// Every failure is converted to an ERROR message for the origin
    /// only; nothing propagates to other connections.
    pub fn handle_command(
        &self,
        command: ClientCommand,
        sink: &Arc<dyn ClientSink>,
    ) -> Option<String> {
        // A panic while processing one command must not take down the
        // coordinator or touch other connections; it surfaces to the
        // origin as an internal error like any other failure.
        let result = catch_unwind(AssertUnwindSafe(|| match command.command {
            CommandType::Connect => self.connect(&command, sink),
            CommandType::MakeMove => self.make_move(&command),
            CommandType::Resign => self.resign(&command),
            CommandType::Leave => self.leave(&command),
        }))
        .unwrap_or_else(|_| {
            Err(SessionError::Internal(
                "command processing panicked".to_string(),
            ))
        });
        match result {
            Ok(()) => (command.command == CommandType::Connect).then(|| command.auth_token),
            Err(err) => {
                info!("command {:?} failed: {}", command.command, err);
                send_to_sink(sink, &error_message(&err));
                None
            }
        }
    }

    /// Socket closed without LEAVE: drop the registry entry, keep seats.
    pub fn disconnect(&self, token: &str) {
        if let Some(connection) = self.registry.remove(token) {
            info!(
                "removed connection of {} (game {}) on socket close",
                connection.username, connection.game_id
            );
        }
    }

    fn connect(
        &self,
        command: &ClientCommand,
        sink: &Arc<dyn ClientSink>,
    ) -> Result<(), SessionError> {
        let username = self
            .auth
            .resolve(&command.auth_token)
            .ok_or(SessionError::Unauthorized)?;
        let record = self
            .games
            .get(command.game_id)
            .ok_or(SessionError::NotFound)?;

        self.registry.insert(Connection {
            token: command.auth_token.clone(),
            username: username.clone(),
            game_id: command.game_id,
            sink: sink.clone(),
        });
        info!(
            "{} connected to game {} ({} connection(s) total)",
            username,
            command.game_id,
            self.registry.len()
        );

        let role = match record.seat_of(&username) {
            Some(Color::White) => "White",
            Some(Color::Black) => "Black",
            None => "an Observer",
        };
        send_to_sink(sink, &ServerMessage::LoadGame { game: record });
        self.registry.broadcast(
            command.game_id,
            Some(&command.auth_token),
            &ServerMessage::Notification {
                message: format!("{} has joined the game as {}", username, role),
            },
        );
        Ok(())
    }

    fn make_move(&self, command: &ClientCommand) -> Result<(), SessionError> {
        let username = self
            .auth
            .resolve(&command.auth_token)
            .ok_or(SessionError::Unauthorized)?;
        let mv = command
            .chess_move
            .ok_or_else(|| SessionError::Malformed("MAKE_MOVE requires a move".to_string()))?;
        if !self.registry.is_bound(&command.auth_token, command.game_id) {
            return Err(SessionError::RuleViolation(
                "You are not connected to that game".to_string(),
            ));
        }

        // Validation, mutation and persistence all happen inside the
        // store's exclusive section for this game id.
        let (snapshot, update) = self
            .games
            .with_record(command.game_id, |record| {
                if record.game_over {
                    return Err(SessionError::RuleViolation(format!(
                        "Game is over. {}",
                        winner_text(record)
                    )));
                }
                let seat = record.seat_of(&username).ok_or_else(|| {
                    SessionError::RuleViolation("Observers cannot make any moves".to_string())
                })?;
                if seat != record.game.turn() {
                    return Err(SessionError::RuleViolation("Not your turn".to_string()));
                }
                if mv.start.on_board() {
                    if let Some(piece) = record.game.board().piece_at(mv.start) {
                        if piece.color != seat {
                            return Err(SessionError::RuleViolation(
                                "Can only move your own pieces".to_string(),
                            ));
                        }
                    }
                }
                record.game.make_move(mv)?;

                let mut update = format!("{} made the move: {}", username, mv);
                if record.game.is_in_checkmate(Color::White) {
                    update.push_str("\nWhite is in checkmate");
                    record.game_over = true;
                    record.white_won = false;
                } else if record.game.is_in_checkmate(Color::Black) {
                    update.push_str("\nBlack is in checkmate");
                    record.game_over = true;
                    record.white_won = true;
                } else if record.game.is_in_stalemate(Color::White)
                    || record.game.is_in_stalemate(Color::Black)
                {
                    update.push_str("\nStalemate occurred. Game is a draw");
                    record.game_over = true;
                } else if record.game.is_in_check(Color::White) {
                    update.push_str("\nWhite is in check");
                } else if record.game.is_in_check(Color::Black) {
                    update.push_str("\nBlack is in check");
                }
                Ok((record.clone(), update))
            })
            .ok_or(SessionError::NotFound)??;

        self.registry.broadcast(
            command.game_id,
            None,
            &ServerMessage::LoadGame { game: snapshot },
        );
        self.registry.broadcast(
            command.game_id,
            Some(&command.auth_token),
            &ServerMessage::Notification { message: update },
        );
        Ok(())
    }

    fn resign(&self, command: &ClientCommand) -> Result<(), SessionError> {
        let username = self
            .auth
            .resolve(&command.auth_token)
            .ok_or(SessionError::Unauthorized)?;

        let update = self
            .games
            .with_record(command.game_id, |record| {
                let seat = record.seat_of(&username).ok_or_else(|| {
                    SessionError::RuleViolation("Observers cannot resign".to_string())
                })?;
                if record.game_over {
                    return Err(SessionError::RuleViolation(format!(
                        "Game is already over. {}",
                        winner_text(record)
                    )));
                }
                record.game_over = true;
                record.white_won = seat == Color::Black;
                let winner = match seat {
                    Color::White => "Black",
                    Color::Black => "White",
                };
                Ok(format!("{} has resigned and {} has won", username, winner))
            })
            .ok_or(SessionError::NotFound)??;

        // The resigner hears the notification too.
        self.registry.broadcast(
            command.game_id,
            None,
            &ServerMessage::Notification { message: update },
        );
        Ok(())
    }

    fn leave(&self, command: &ClientCommand) -> Result<(), SessionError> {
        let username = self
            .auth
            .resolve(&command.auth_token)
            .ok_or(SessionError::Unauthorized)?;
        let seat = self
            .games
            .with_record(command.game_id, |record| record.seat_of(&username))
            .ok_or(SessionError::NotFound)?;

        if let Some(color) = seat {
            self.games.clear_seat(command.game_id, color);
        }
        self.registry.remove(&command.auth_token);
        info!("{} left game {}", username, command.game_id);

        self.registry.broadcast(
            command.game_id,
            Some(&command.auth_token),
            &ServerMessage::Notification {
                message: format!("{} has left the game", username),
            },
        );
        Ok(())
    }
}

fn winner_text(record: &GameRecord) -> &'static str {
    if record.white_won {
        "White won"
    } else {
        "Black won"
    }
}

fn error_message(err: &SessionError) -> ServerMessage {
    ServerMessage::Error {
        message: err.to_string(),
    }
}

fn send_to_sink(sink: &Arc<dyn ClientSink>, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(text) => sink.send(text),
        Err(err) => warn!("failed to serialize server message: {}", err),
    }
}
