use eframe::egui;

use crate::common::types::GLOBAL_CHAT;
use crate::notify::preview;
use crate::ui::state::AppState;

#[derive(Default)]
pub struct SidebarActions {
    pub open_chat: Option<String>,
    pub open_dm: Option<String>,
}

pub fn render(ui: &mut egui::Ui, state: &AppState) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("Chats");
    ui.separator();
    if ui
        .selectable_label(state.sync.is_active(GLOBAL_CHAT), "# Global Chat")
        .clicked()
    {
        actions.open_chat = Some(GLOBAL_CHAT.to_string());
    }

    ui.add_space(8.0);
    ui.heading("People");
    ui.separator();
    let mut shown = 0;
    for user in state.presence.users() {
        if user.username == state.presence.local_user() {
            continue;
        }
        shown += 1;
        ui.horizontal(|ui| {
            let color = if user.online {
                egui::Color32::GREEN
            } else {
                egui::Color32::GRAY
            };
            ui.colored_label(color, "●");
            if ui
                .link(format!("{} @{}", user.label(), user.username))
                .clicked()
            {
                actions.open_dm = Some(user.username.clone());
            }
        });
    }
    if shown == 0 {
        ui.label("Nobody else here yet");
    }

    ui.add_space(8.0);
    ui.heading("Recent");
    ui.separator();
    for chat in &state.recent_chats {
        // only direct chats carry a partner to resume with
        let Some(other) = &chat.other_user else {
            continue;
        };
        ui.horizontal(|ui| {
            if ui.link(other.label()).clicked() {
                actions.open_dm = Some(other.username.clone());
            }
            if chat.unread_count > 0 {
                ui.label(
                    egui::RichText::new(format!("({})", chat.unread_count))
                        .small()
                        .strong(),
                );
            }
        });
        if let Some(last) = &chat.last_message {
            ui.label(egui::RichText::new(preview(last.display_text(), 30)).weak());
        }
    }

    actions
}
