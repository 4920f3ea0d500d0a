// Desktop host - eframe application around the timeline editor

pub mod app;
pub mod canvas;
pub mod keyboard;

pub use app::PianoRollApp;
