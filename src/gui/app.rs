use iced::{Element, Task, Theme};

use crate::gui::screens::{Screen, ScreenData, ScreenMessage, home::HomeScreen};
use crate::gui::{Message, state::AppState};

pub struct CellspotApp {
    state: AppState,
    screen: ScreenData,
}

impl CellspotApp {
    fn new() -> (Self, Task<Message>) {
        (
            Self {
                state: AppState::default(),
                screen: ScreenData::Home(HomeScreen::default()),
            },
            Task::none(),
        )
    }

    fn title(&self) -> String {
        "Cellspot - Infected Cell Detection".to_string()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        self.screen.update(message, &mut self.state).map(unwrap_screen)
    }

    fn view(&self) -> Element<'_, Message> {
        self.screen.view().map(unwrap_screen)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn unwrap_screen(message: ScreenMessage<ScreenData>) -> Message {
    match message {
        ScreenMessage::ScreenMessage(message) => message,
        ScreenMessage::ParentMessage(never) => match never {},
    }
}

pub fn run() -> iced::Result {
    iced::application(CellspotApp::new, CellspotApp::update, CellspotApp::view)
        .title(CellspotApp::title)
        .theme(CellspotApp::theme)
        .run()
}
