use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Save PNG…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Reset view").clicked() {
                state.reset_view = true;
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.summary_line());

        ui.separator();
        ui.label(format!("written to {}", state.output.display()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.status_is_error {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut ViewerState) {
    let file_name = state
        .output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("clddet.png")
        .to_string();

    let file = rfd::FileDialog::new()
        .set_title("Save figure")
        .set_file_name(file_name)
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        state.save_png(&path);
    }
}
