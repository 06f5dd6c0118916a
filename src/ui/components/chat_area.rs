use chrono::NaiveDateTime;
use eframe::egui;

use crate::common::types::AttachmentKind;
use crate::ui::format::format_relative;
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState, now: NaiveDateTime) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .max_height(ui.available_height() - 48.0)
        .show(ui, |ui| {
            for message in state.sync.messages() {
                let name = state
                    .presence
                    .find_user(&message.username)
                    .map(|user| user.label().to_string())
                    .unwrap_or_else(|| message.username.clone());
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(name).strong());
                    ui.label(egui::RichText::new(format!("@{}", message.username)).weak());
                    ui.label(
                        egui::RichText::new(format_relative(&message.timestamp, now)).weak(),
                    );
                });
                ui.label(message.display_text());
                for attachment in &message.attachments {
                    let tag = match attachment.kind {
                        AttachmentKind::Image => "image",
                        AttachmentKind::Video => "video",
                        AttachmentKind::File => "file",
                    };
                    ui.label(
                        egui::RichText::new(format!("[{tag}] {}", attachment.filename)).weak(),
                    );
                }
                ui.add_space(6.0);
            }

            // kept below the messages, so a pushed message always lands
            // above the indicator
            if state.presence.is_anyone_typing() {
                let users = state.presence.typing_users();
                let text = match users.as_slice() {
                    [one] => format!("{one} is typing..."),
                    many => format!("{} are typing...", many.join(", ")),
                };
                ui.label(egui::RichText::new(text).weak().italics());
            }
        });
}
