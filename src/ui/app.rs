use std::time::Instant;

use chrono::Local;
use eframe::egui;
use tokio::sync::mpsc;

use crate::common::types::{GLOBAL_CHAT, chat_label};
use crate::common::{ChatMessage, ClientCommand, ServerEvent, mentions};
use crate::config::AppConfig;
use crate::notify::{Notification, NotificationKind, NotificationRouter, Notifier};
use crate::session::{ChatSync, Incoming};

use super::components::{
    chat_area, input_bar,
    sidebar::{self, SidebarActions},
};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<ClientCommand>,
    event_receiver: mpsc::Receiver<ServerEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        command_sender: mpsc::Sender<ClientCommand>,
        event_receiver: mpsc::Receiver<ServerEvent>,
    ) -> Self {
        let mut app = Self {
            state: AppState::new(&config),
            command_sender,
            event_receiver,
        };
        app.open_chat(GLOBAL_CHAT);
        app
    }

    /// Active-chat transition: leave the old room, join and fetch the new
    /// one, and start the typing set from empty.
    fn open_chat(&mut self, chat_id: &str) {
        let plan = self.state.sync.open_chat(chat_id);
        if let Some(leave) = plan.leave {
            self.send(ClientCommand::LeaveChat { chat_id: leave });
        }
        self.send(ClientCommand::JoinChat {
            chat_id: plan.join.clone(),
        });
        self.send(ClientCommand::FetchHistory {
            chat_id: plan.join.clone(),
            generation: plan.generation,
        });
        self.state.presence.set_active_chat(&plan.join);
    }

    fn send(&mut self, command: ClientCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
        }
    }

    fn handle_server_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connected => self.state.connected = true,
            ServerEvent::Disconnected => self.state.connected = false,
            ServerEvent::MessagePushed { chat_id, message } => {
                self.on_message_pushed(chat_id, message);
            }
            ServerEvent::UserStatus { username, online } => {
                self.state.presence.on_user_status(&username, online);
            }
            ServerEvent::UserTyping { chat_id, username } => {
                self.state.presence.on_remote_typing(&username, &chat_id);
            }
            ServerEvent::UserStopTyping { chat_id, username } => {
                self.state
                    .presence
                    .on_remote_stop_typing(&username, &chat_id);
            }
            ServerEvent::MentionPushed {
                from_user,
                chat_id,
                message,
            } => {
                let viewing = self.state.sync.is_active(&chat_id);
                if self.state.router.should_deliver(
                    NotificationKind::Mention,
                    self.state.window_focused,
                    viewing,
                ) {
                    let notification = Notification::mention(&from_user, &message, &chat_id);
                    self.state.notify(notification);
                }
            }
            ServerEvent::RosterLoaded(users) => self.state.presence.set_roster(users),
            ServerEvent::HistoryLoaded {
                chat_id,
                generation,
                messages,
            } => {
                self.state.sync.apply_history(&chat_id, generation, messages);
            }
            ServerEvent::RecentChatsLoaded(chats) => self.state.recent_chats = chats,
            ServerEvent::DirectChatReady { chat_id, .. } => self.open_chat(&chat_id),
            ServerEvent::MessageAccepted { chat_id } => {
                // the send ends the local typing burst
                self.state.presence.cancel_local_typing();
                self.send(ClientCommand::StopTyping { chat_id });
            }
            ServerEvent::SendFailed { content, .. } => {
                // hand the text back so the user can retry
                self.state.input_text = content;
            }
        }
    }

    fn on_message_pushed(&mut self, chat_id: String, message: ChatMessage) {
        match self.state.sync.on_incoming(&chat_id, message) {
            Incoming::Rendered | Incoming::Duplicate => {}
            Incoming::OtherChat(message) => {
                let local = self.state.presence.local_user().to_string();
                if let Some(kind) = NotificationRouter::classify(&message, &chat_id, &local) {
                    if self
                        .state
                        .router
                        .should_deliver(kind, self.state.window_focused, false)
                    {
                        let body = message.display_text();
                        let notification = match kind {
                            NotificationKind::Mention => {
                                Notification::mention(&message.username, body, &chat_id)
                            }
                            NotificationKind::DirectMessage => {
                                Notification::direct_message(&message.username, body, &chat_id)
                            }
                            NotificationKind::GroupMessage => Notification::group_message(
                                &message.username,
                                body,
                                &chat_label(&chat_id, &local),
                                &chat_id,
                            ),
                        };
                        self.state.notify(notification);
                    }
                }
            }
        }
        // keep the recent-chats summary in step with the stream
        self.send(ClientCommand::RefreshRecentChats);
    }

    fn submit_message(&mut self) {
        let Some(chat_id) = self.state.sync.active_chat().map(str::to_string) else {
            return;
        };
        if let Some(content) = ChatSync::take_outgoing(&mut self.state.input_text) {
            self.send(ClientCommand::SendMessage { chat_id, content });
        }
    }

    fn mention_suggestions(&self) -> Vec<String> {
        let Some((_, query)) = mentions::mention_query(&self.state.input_text) else {
            return Vec::new();
        };
        let query = query.to_lowercase();
        self.state
            .presence
            .users()
            .iter()
            .filter(|user| user.username != self.state.presence.local_user())
            .filter(|user| user.username.to_lowercase().contains(&query))
            .take(5)
            .map(|user| user.username.clone())
            .collect()
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.state.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("notification_toasts"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .show(ctx, |ui| {
                for toast in &self.state.toasts {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(280.0);
                        ui.label(egui::RichText::new(&toast.title).strong());
                        if !toast.body.is_empty() {
                            ui.label(&toast.body);
                        }
                    });
                    ui.add_space(4.0);
                }
            });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_server_events();
        self.state.window_focused = ctx.input(|i| i.viewport().focused.unwrap_or(true));

        let now = Instant::now();
        if self.state.presence.poll_local_typing(now).is_some() {
            if let Some(chat_id) = self.state.sync.active_chat().map(str::to_string) {
                self.send(ClientCommand::StopTyping { chat_id });
            }
        }
        self.state.expire_toasts(now);

        // files dropped onto the window go out as attachments
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let Some(path) = file.path else { continue };
            let Some(chat_id) = self.state.sync.active_chat().map(str::to_string) else {
                continue;
            };
            self.send(ClientCommand::SendFile { chat_id, path });
        }

        egui::SidePanel::left("roster_sidebar")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let actions: SidebarActions = sidebar::render(ui, &self.state);
                if let Some(chat_id) = actions.open_chat {
                    self.open_chat(&chat_id);
                }
                if let Some(participant) = actions.open_dm {
                    self.send(ClientCommand::OpenDirectChat { participant });
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.state.chat_title());
                if !self.state.connected {
                    ui.label(egui::RichText::new("offline, reconnecting...").weak());
                }
            });
            ui.separator();
            chat_area::render(ui, &self.state, Local::now().naive_local());

            ui.separator();
            let suggestions = self.mention_suggestions();
            let events = input_bar::render(ui, &mut self.state.input_text, &suggestions);
            if let Some(username) = events.mention_pick {
                mentions::apply_mention(&mut self.state.input_text, &username);
            }
            if events.changed {
                if let Some(chat_id) = self.state.sync.active_chat().map(str::to_string) {
                    if self.state.presence.on_local_input(Instant::now()).is_some() {
                        self.send(ClientCommand::Typing { chat_id });
                    }
                }
            }
            if events.submitted {
                self.submit_message();
            }
        });

        self.render_toasts(ctx);
        ctx.request_repaint();
    }
}
