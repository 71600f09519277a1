use std::path::PathBuf;

use fltk::{app, enums::Event, prelude::*};

use rich_notes::app::domain::messages::Message;
use rich_notes::app::domain::settings::AppSettings;
use rich_notes::app::infrastructure::logging;
use rich_notes::app::state::AppState;
use rich_notes::ui::main_window::build_main_window;

fn main() {
    logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Rich Notes");

    let app = app::App::default();
    let settings = AppSettings::load();
    let (sender, receiver) = app::channel::<Message>();

    let presets = settings.size_presets();
    let mut widgets = build_main_window(&sender, &presets, settings.word_wrap_enabled);

    // Closing the window goes through the unsaved-changes gate; Escape is ignored.
    widgets.wind.set_callback(move |_| {
        if app::event() == Event::Close {
            sender.send(Message::WindowClose);
        }
    });
    widgets.wind.show();

    let mut state = AppState::new(widgets, sender, settings);
    if let Some(path) = std::env::args_os().nth(1) {
        state.open_file(&PathBuf::from(path));
    }

    while app.wait() {
        while let Some(msg) = receiver.recv() {
            state.dispatch(msg);
        }
    }
}
