// Main UI App - toolbar, keyboard column and editor canvas

use crate::config::EditorConfig;
use crate::editor::{EditorOutcome, Gesture, GridLayout, HoverFeedback, ScrollStep, TimelineEditor};
use crate::error::{EditorError, EditorResult};
use crate::messaging::{Notification, NotificationCategory, NotificationLevel, NotificationQueue};
use crate::midi::export_notes;
use crate::playback::{PlaybackStatus, Player};
use crate::project::{load_session, save_session, with_session_extension};
use crate::render::RetainedCanvas;
use crate::sequencer::Tempo;
use crate::synth::SynthEngine;
use crate::ui::{canvas, keyboard};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How long a notification stays in the status bar
const NOTIFICATION_MAX_AGE_MS: u64 = 5000;

pub struct PianoRollApp {
    editor: TimelineEditor<RetainedCanvas>,
    player: Player,
    config: EditorConfig,
    /// Value of the tempo field
    tempo_bpm: f64,
    notifications: NotificationQueue,
    /// Horizontal scroll not yet turned into whole cells
    scroll_remainder: f32,
    /// Directory of the last opened or saved file
    last_dir: Option<PathBuf>,
}

impl PianoRollApp {
    pub fn new(config: EditorConfig, synth: Arc<dyn SynthEngine>) -> EditorResult<Self> {
        let mut editor = TimelineEditor::new(
            RetainedCanvas::new(),
            GridLayout::from(&config),
            config.default_note_width,
        );
        editor.redraw()?;

        Ok(Self {
            editor,
            player: Player::new(synth, config.converter()),
            tempo_bpm: config.tempo_bpm,
            config,
            notifications: NotificationQueue::default(),
            scroll_remainder: 0.0,
            last_dir: std::env::current_dir().ok(),
        })
    }

    fn tempo(&self) -> Tempo {
        Tempo::clamped(self.tempo_bpm)
    }

    /// Queue notifications raised before the window opened
    pub fn with_notifications(
        mut self,
        notifications: impl IntoIterator<Item = Notification>,
    ) -> Self {
        for notification in notifications {
            self.notifications.push(notification);
        }
        self
    }

    fn report<T>(&mut self, category: NotificationCategory, result: EditorResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notifications.push(Notification::error(category, e.to_string()));
                None
            }
        }
    }

    /// Audition the note an edit asked for
    fn handle_outcome(&mut self, result: EditorResult<EditorOutcome>) {
        let Some(outcome) = self.report(NotificationCategory::Editor, result) else {
            return;
        };

        if let Some(note) = outcome.audition {
            let tempo = self.tempo();
            let result = self.player.audition(&note, tempo);
            self.report(NotificationCategory::Playback, result.map_err(EditorError::from));
        }
    }

    fn error_dialog(title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new();
        match &self.last_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn remember_dir(&mut self, path: &std::path::Path) {
        self.last_dir = path.parent().map(|p| p.to_path_buf());
    }

    fn export_midi(&mut self) {
        let Some(path) = self
            .file_dialog()
            .add_filter("MIDI files", &["mid", "midi"])
            .set_file_name("notes.mid")
            .save_file()
        else {
            return;
        };
        self.remember_dir(&path);

        let result = export_notes(
            &path,
            self.editor.notes().notes(),
            self.tempo(),
            &self.config.converter(),
        );
        match result {
            Ok(()) => self.notifications.push(Notification::info(
                NotificationCategory::Export,
                format!("Exported {}", path.display()),
            )),
            Err(e) => {
                Self::error_dialog("Export failed", &e.to_string());
                self.notifications
                    .push(Notification::error(NotificationCategory::Export, e.to_string()));
            }
        }
    }

    fn save(&mut self) {
        let Some(path) = self
            .file_dialog()
            .add_filter("note files", &["notes"])
            .add_filter("All files", &["*"])
            .save_file()
        else {
            return;
        };
        let path = with_session_extension(path);
        self.remember_dir(&path);

        match save_session(&path, self.editor.notes().notes(), self.tempo()) {
            Ok(()) => self.notifications.push(Notification::info(
                NotificationCategory::Session,
                format!("Saved {}", path.display()),
            )),
            Err(e) => {
                Self::error_dialog("Save failed", &e.to_string());
                self.notifications
                    .push(Notification::error(NotificationCategory::Session, e.to_string()));
            }
        }
    }

    fn open(&mut self) {
        let Some(path) = self
            .file_dialog()
            .add_filter("note files", &["notes"])
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            return;
        };
        self.remember_dir(&path);

        let session = match load_session(&path) {
            Ok(session) => session,
            Err(e) => {
                Self::error_dialog("Open failed", &e.to_string());
                self.notifications
                    .push(Notification::error(NotificationCategory::Session, e.to_string()));
                return;
            }
        };

        self.player.stop();
        self.tempo_bpm = session.tempo().bpm();
        let result = self.editor.replace_notes(session.notes);
        if self.report(NotificationCategory::Session, result).is_some() {
            self.notifications.push(Notification::info(
                NotificationCategory::Session,
                format!("Opened {}", path.display()),
            ));
        }
    }

    fn play(&mut self) {
        let tempo = self.tempo();
        let result = self.player.play(self.editor.notes().snapshot(), tempo);
        self.report(NotificationCategory::Playback, result.map_err(EditorError::from));
    }

    fn collect_playback_errors(&mut self) {
        for e in self.player.reap() {
            self.notifications
                .push(Notification::error(NotificationCategory::Playback, e.to_string()));
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Export MIDI").clicked() {
                self.export_midi();
            }
            if ui.button("Reset").clicked() {
                let result = self.editor.reset();
                self.report(NotificationCategory::Editor, result);
            }
            if ui.button("Save").clicked() {
                self.save();
            }
            if ui.button("Open").clicked() {
                self.open();
            }

            ui.separator();
            ui.label("Tempo");
            ui.add(
                egui::DragValue::new(&mut self.tempo_bpm)
                    .range(Tempo::MIN_BPM..=Tempo::MAX_BPM)
                    .speed(1.0)
                    .fixed_decimals(0),
            );
            self.tempo_bpm = self.tempo().bpm();

            ui.separator();
            if ui.button("▶ Play").clicked() {
                self.play();
            }
            if ui.button("■ Stop").clicked() {
                self.player.stop();
            }

            let status = self.player.status();
            let colour = match status {
                PlaybackStatus::Playing => egui::Color32::GREEN,
                PlaybackStatus::Stopped => egui::Color32::GRAY,
            };
            ui.colored_label(colour, status.to_string());
        });
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let recent = self.notifications.recent(NOTIFICATION_MAX_AGE_MS);

            if recent.is_empty() {
                ui.label(format!("{} notes", self.editor.notes().len()));
                return;
            }

            for notification in recent.iter().rev().take(3) {
                let (icon, colour) = match notification.level {
                    NotificationLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 150, 255)),
                    NotificationLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 165, 0)),
                    NotificationLevel::Error => ("✖", egui::Color32::RED),
                };
                ui.colored_label(colour, icon);
                ui.colored_label(colour, &notification.message);
                ui.add_space(10.0);
            }
        });
    }

    fn draw_editor(&mut self, ui: &mut egui::Ui) {
        let layout = *self.editor.layout();
        let row_height = layout.row_height as f32;
        let height = layout.row_top(self.editor.table().len()) as f32 + 1.0;

        let (key_rect, _) =
            ui.allocate_exact_size(egui::vec2(keyboard::KEYBOARD_WIDTH, height), egui::Sense::hover());
        keyboard::draw_keyboard(ui.painter(), key_rect.min, self.editor.table(), row_height);

        let width = ui.available_width().floor().max(1.0);
        let (response, painter) =
            ui.allocate_painter(egui::vec2(width, height), egui::Sense::click_and_drag());

        if layout.visible_width != width as i64 {
            let result = self.editor.set_viewport(width as i64, height as i64);
            self.report(NotificationCategory::Editor, result);
        }

        self.handle_pointer(ui, &response);
        self.handle_scroll(ui, &response);

        canvas::paint(
            &painter.with_clip_rect(response.rect),
            response.rect.min,
            self.editor.backend(),
        );
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let rect = response.rect;
        let Some(pos) = ui.input(|i| i.pointer.interact_pos()) else {
            return;
        };
        let local = pos - rect.min;

        let (pressed, down, released, secondary_down, moving) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.secondary_down(),
                i.pointer.is_moving(),
            )
        });

        if pressed && response.hovered() {
            let result = self.editor.press(local.x, local.y);
            self.handle_outcome(result);
        } else if down && moving && !self.editor.gesture().is_idle() {
            let result = self.editor.drag(local.x, local.y);
            self.handle_outcome(result);
        }

        if released {
            self.editor.release();
        }

        if secondary_down && rect.contains(pos) {
            let result = self.editor.delete_at(local.x, local.y);
            self.report(NotificationCategory::Editor, result);
        }

        let cursor = match self.editor.gesture() {
            Gesture::Moving { .. } => Some(egui::CursorIcon::Move),
            Gesture::Resizing { .. } => Some(egui::CursorIcon::ResizeHorizontal),
            Gesture::Idle if response.hovered() => match self.editor.hover(local.x, local.y) {
                HoverFeedback::ResizeEdge => Some(egui::CursorIcon::ResizeHorizontal),
                HoverFeedback::NoteBody => Some(egui::CursorIcon::Move),
                HoverFeedback::Empty => None,
            },
            Gesture::Idle => None,
        };
        if let Some(cursor) = cursor {
            ui.ctx().set_cursor_icon(cursor);
        }
    }

    fn handle_scroll(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let mut step = None;

        if response.hovered() {
            self.scroll_remainder -= ui.input(|i| i.smooth_scroll_delta.x);
            let cell = self.editor.layout().scroll_unit() as f32;
            let units = (self.scroll_remainder / cell).trunc();
            if units != 0.0 {
                self.scroll_remainder -= units * cell;
                step = Some(ScrollStep::Units(units as i64));
            }
        }

        ui.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) {
                step = Some(ScrollStep::Units(1));
            } else if i.key_pressed(egui::Key::ArrowLeft) {
                step = Some(ScrollStep::Units(-1));
            } else if i.key_pressed(egui::Key::PageDown) {
                step = Some(ScrollStep::Pages(1));
            } else if i.key_pressed(egui::Key::PageUp) {
                step = Some(ScrollStep::Pages(-1));
            }
        });

        if let Some(step) = step {
            let result = self.editor.scroll(step);
            self.report(NotificationCategory::Editor, result);
        }
    }
}

impl eframe::App for PianoRollApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_playback_errors();

        if self.player.live_tasks() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .drag_to_scroll(false)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.horizontal_top(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        self.draw_editor(ui);
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::NullSynth;

    #[test]
    fn test_startup_warnings_reach_status_bar() {
        let app = PianoRollApp::new(EditorConfig::default(), Arc::new(NullSynth))
            .unwrap()
            .with_notifications([Notification::warning(
                NotificationCategory::Config,
                "Using default settings",
            )]);

        let latest = app.notifications.latest().unwrap();
        assert_eq!(latest.level, NotificationLevel::Warning);
        assert_eq!(latest.category, NotificationCategory::Config);
        assert_eq!(app.notifications.recent(NOTIFICATION_MAX_AGE_MS).len(), 1);
    }
}
