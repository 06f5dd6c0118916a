use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::common::{ClientCommand, ServerEvent};
use crate::config::AppConfig;
use crate::network::api::ApiClient;
use crate::network::protocol::{ClientFrame, ServerFrame};

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

const RECONNECT_DELAY: Duration = Duration::from_secs(3);
const ROSTER_REFRESH: Duration = Duration::from_secs(10);
const RECENT_CHATS_REFRESH: Duration = Duration::from_secs(30);

/// Background task owning the push channel and all REST traffic. Talks to
/// the UI exclusively through the command/event channels.
pub struct ChatClient {
    config: AppConfig,
    api: ApiClient,
    event_sender: mpsc::Sender<ServerEvent>,
    command_receiver: mpsc::Receiver<ClientCommand>,
}

impl ChatClient {
    pub fn new(
        config: AppConfig,
        event_sender: mpsc::Sender<ServerEvent>,
        command_receiver: mpsc::Receiver<ClientCommand>,
    ) -> Self {
        let api = ApiClient::new(&config.server_url);
        Self {
            config,
            api,
            event_sender,
            command_receiver,
        }
    }

    /// Connect, drive the channel until it drops, reconnect. Runs for the
    /// lifetime of the process; only a closed command channel (UI gone)
    /// ends it.
    pub async fn run(mut self) -> Result<(), BoxError> {
        loop {
            match connect_async(self.config.ws_url()).await {
                Ok((stream, _)) => {
                    log::info!("Push channel connected to {}", self.config.ws_url());
                    let _ = self.event_sender.send(ServerEvent::Connected).await;
                    match self.drive(stream).await {
                        Ok(ui_gone) if ui_gone => return Ok(()),
                        Ok(_) => log::info!("Push channel closed by server"),
                        Err(err) => log::warn!("Push channel error: {err}"),
                    }
                    let _ = self.event_sender.send(ServerEvent::Disconnected).await;
                }
                Err(err) => {
                    log::warn!("Failed to connect push channel: {err}");
                }
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// Multiplex the socket, the command channel and the periodic REST
    /// refreshes. Returns Ok(true) when the UI side hung up.
    async fn drive(&mut self, stream: WsStream) -> Result<bool, BoxError> {
        let (mut sink, mut source) = stream.split();

        // personal room, so DMs and mentions reach us in any chat
        let join = ClientFrame::JoinChat {
            chat_id: self.config.username.clone(),
        };
        send_frame(&mut sink, &join).await?;

        let mut roster_timer = tokio::time::interval(ROSTER_REFRESH);
        let mut recent_timer = tokio::time::interval(RECENT_CHATS_REFRESH);

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command, &mut sink).await?,
                        None => return Ok(true),
                    }
                }
                frame = next_frame(&mut source) => {
                    match frame? {
                        Some(Message::Text(text)) => self.handle_frame(&text).await,
                        Some(Message::Ping(payload)) => sink.send(Message::Pong(payload)).await?,
                        Some(Message::Close(_)) | None => return Ok(false),
                        Some(_) => {}
                    }
                }
                _ = roster_timer.tick() => self.spawn_roster_fetch(),
                _ = recent_timer.tick() => self.spawn_recent_chats_fetch(),
            }
        }
    }

    async fn handle_command(
        &mut self,
        command: ClientCommand,
        sink: &mut WsSink,
    ) -> Result<(), BoxError> {
        match command {
            ClientCommand::JoinChat { chat_id } => {
                send_frame(sink, &ClientFrame::JoinChat { chat_id }).await?;
            }
            ClientCommand::LeaveChat { chat_id } => {
                send_frame(sink, &ClientFrame::LeaveChat { chat_id }).await?;
            }
            ClientCommand::Typing { chat_id } => {
                send_frame(sink, &ClientFrame::Typing { chat_id }).await?;
            }
            ClientCommand::StopTyping { chat_id } => {
                send_frame(sink, &ClientFrame::StopTyping { chat_id }).await?;
            }
            ClientCommand::FetchHistory {
                chat_id,
                generation,
            } => {
                let api = self.api.clone();
                let events = self.event_sender.clone();
                tokio::spawn(async move {
                    match api.fetch_history(&chat_id).await {
                        Ok(messages) => {
                            let _ = events
                                .send(ServerEvent::HistoryLoaded {
                                    chat_id,
                                    generation,
                                    messages,
                                })
                                .await;
                        }
                        // the previous view stays; nothing to tell the UI
                        Err(err) => log::warn!("History fetch for {chat_id} failed: {err}"),
                    }
                });
            }
            ClientCommand::SendMessage { chat_id, content } => {
                let api = self.api.clone();
                let events = self.event_sender.clone();
                tokio::spawn(async move {
                    match api.send_message(&chat_id, &content).await {
                        Ok(_) => {
                            // rendering waits for the push echo
                            let _ = events.send(ServerEvent::MessageAccepted { chat_id }).await;
                        }
                        Err(err) => {
                            log::warn!("Send to {chat_id} failed: {err}");
                            let _ = events
                                .send(ServerEvent::SendFailed { chat_id, content })
                                .await;
                        }
                    }
                });
            }
            ClientCommand::SendFile { chat_id, path } => {
                let api = self.api.clone();
                tokio::spawn(async move {
                    let filename = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "attachment".to_string());
                    let bytes = match tokio::fs::read(&path).await {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            log::warn!("Cannot read {}: {err}", path.display());
                            return;
                        }
                    };
                    if let Err(err) = api.send_file(&chat_id, &filename, bytes).await {
                        log::warn!("File upload to {chat_id} failed: {err}");
                    }
                });
            }
            ClientCommand::OpenDirectChat { participant } => {
                let api = self.api.clone();
                let events = self.event_sender.clone();
                tokio::spawn(async move {
                    match api.create_dm(&participant).await {
                        Ok(chat_id) => {
                            let _ = events
                                .send(ServerEvent::DirectChatReady {
                                    chat_id,
                                    participant,
                                })
                                .await;
                        }
                        Err(err) => log::warn!("Cannot open DM with {participant}: {err}"),
                    }
                });
            }
            ClientCommand::RefreshRoster => self.spawn_roster_fetch(),
            ClientCommand::RefreshRecentChats => self.spawn_recent_chats_fetch(),
        }
        Ok(())
    }

    async fn handle_frame(&mut self, text: &str) {
        let frame: ServerFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("Dropping unhandled push frame: {err}");
                return;
            }
        };
        let event = match frame {
            ServerFrame::NewMessage { chat_id, message } => {
                ServerEvent::MessagePushed { chat_id, message }
            }
            ServerFrame::UserStatus { username, online } => {
                ServerEvent::UserStatus { username, online }
            }
            ServerFrame::UserTyping { chat_id, username } => {
                ServerEvent::UserTyping { chat_id, username }
            }
            ServerFrame::UserStopTyping { chat_id, username } => {
                ServerEvent::UserStopTyping { chat_id, username }
            }
            ServerFrame::MentionNotification {
                from_user,
                chat_id,
                message,
                ..
            } => ServerEvent::MentionPushed {
                from_user,
                chat_id,
                message,
            },
            ServerFrame::JoinedChat { .. } | ServerFrame::LeftChat { .. } => return,
        };
        let _ = self.event_sender.send(event).await;
    }

    fn spawn_roster_fetch(&self) {
        let api = self.api.clone();
        let events = self.event_sender.clone();
        tokio::spawn(async move {
            match api.fetch_users().await {
                Ok(users) => {
                    let _ = events.send(ServerEvent::RosterLoaded(users)).await;
                }
                Err(err) => log::warn!("Roster fetch failed: {err}"),
            }
        });
    }

    fn spawn_recent_chats_fetch(&self) {
        let api = self.api.clone();
        let events = self.event_sender.clone();
        tokio::spawn(async move {
            match api.user_chats().await {
                Ok(chats) => {
                    let _ = events.send(ServerEvent::RecentChatsLoaded(chats)).await;
                }
                Err(err) => log::warn!("Recent chats fetch failed: {err}"),
            }
        });
    }
}

async fn send_frame(sink: &mut WsSink, frame: &ClientFrame) -> Result<(), BoxError> {
    let json = serde_json::to_string(frame)?;
    sink.send(Message::Text(json)).await?;
    Ok(())
}

async fn next_frame(
    source: &mut SplitStream<WsStream>,
) -> Result<Option<Message>, BoxError> {
    match source.next().await {
        Some(Ok(message)) => Ok(Some(message)),
        Some(Err(err)) => Err(err.into()),
        None => Ok(None),
    }
}
