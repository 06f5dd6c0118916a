use eframe::egui;

#[derive(Default)]
pub struct InputEvents {
    pub submitted: bool,
    pub changed: bool,
    pub mention_pick: Option<String>,
}

pub fn render(
    ui: &mut egui::Ui,
    input_text: &mut String,
    suggestions: &[String],
) -> InputEvents {
    let mut events = InputEvents::default();

    if !suggestions.is_empty() {
        ui.horizontal(|ui| {
            for username in suggestions {
                if ui.small_button(format!("@{username}")).clicked() {
                    events.mention_pick = Some(username.clone());
                }
            }
        });
    }

    ui.horizontal(|ui| {
        let response = ui.text_edit_singleline(input_text);
        if response.changed() {
            events.changed = true;
        }
        if ui.button("Send").clicked() {
            events.submitted = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            events.submitted = true;
        }
    });

    events
}
