use pianoroll::config::EditorConfig;
use pianoroll::messaging::{Notification, NotificationCategory};
use pianoroll::synth::{MidiOutSynth, NullSynth, SynthEngine};
use pianoroll::ui::PianoRollApp;
use std::sync::Arc;

/// Open the configured MIDI output, or fall back to a silent engine
fn open_synth(config: &EditorConfig, warnings: &mut Vec<Notification>) -> Arc<dyn SynthEngine> {
    let ports = MidiOutSynth::port_names();
    tracing::debug!(?ports, "MIDI output ports");

    match MidiOutSynth::connect(config.midi_output_port.as_deref()) {
        Ok(synth) => Arc::new(synth),
        Err(e) => {
            tracing::warn!(error = %e, "no MIDI output, notes will not sound");
            warnings.push(Notification::warning(
                NotificationCategory::Playback,
                format!("{}: notes will not sound", e),
            ));
            Arc::new(NullSynth)
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (config, config_error) = EditorConfig::load_or_default();
    let mut warnings = Vec::new();
    if let Some(e) = config_error {
        warnings.push(Notification::warning(
            NotificationCategory::Config,
            format!("Using default settings: {}", e),
        ));
    }
    let synth = open_synth(&config, &mut warnings);

    let window_width = config.visible_width as f32 + 80.0;
    let window_height = config.visible_height as f32 + 100.0;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window_width, window_height])
            .with_title("Piano Roll"),
        ..Default::default()
    };

    eframe::run_native(
        "Piano Roll",
        native_options,
        Box::new(move |_cc| {
            let app = PianoRollApp::new(config, synth)?.with_notifications(warnings);
            Ok(Box::new(app))
        }),
    )
}
