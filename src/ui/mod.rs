pub mod file_dialogs;
pub mod main_window;
pub mod menu;
pub mod prompter;
pub mod style_map;
pub mod toolbar;
