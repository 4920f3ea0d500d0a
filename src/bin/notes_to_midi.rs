// Headless exporter: converts a saved session to a Standard MIDI File
//
// Usage: notes_to_midi <session.notes> <out.mid>

use pianoroll::config::EditorConfig;
use pianoroll::midi::export_notes;
use pianoroll::project::load_session;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("Usage: notes_to_midi <session.notes> <out.mid>");
        std::process::exit(2);
    };

    let (config, _) = EditorConfig::load_or_default();
    let session = load_session(&PathBuf::from(input))?;
    let output = PathBuf::from(output);

    export_notes(&output, &session.notes, session.tempo(), &config.converter())?;
    println!(
        "Exported {} notes at {} to {}",
        session.notes.len(),
        session.tempo(),
        output.display()
    );
    Ok(())
}
