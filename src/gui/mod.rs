mod app;
mod message;
mod screens;
mod state;
mod widgets;

pub use app::CellspotApp;
pub use message::Message;
pub use state::{AppState, CameraSession};

/// Launch the graphical interface.
pub fn run() -> iced::Result {
    app::run()
}
