use std::path::PathBuf;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, row, text},
};
use rfd::AsyncFileDialog;

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
};

#[derive(Debug, Clone, Default)]
pub struct HomeScreen {
    error: Option<String>,
}

impl HomeScreen {
    pub fn with_error(message: String) -> Self {
        Self {
            error: Some(message),
        }
    }
}

#[derive(Debug, Clone)]
pub enum HomeMessage {
    UploadImage,
    #[cfg(feature = "camera")]
    UseCamera,
    None,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    ImagePicked(PathBuf),
    #[cfg(feature = "camera")]
    UseCamera,
}

impl Screen for HomeScreen {
    type Message = HomeMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let actions = row![
            button("Upload Image...")
                .on_press(ScreenMessage::ScreenMessage(HomeMessage::UploadImage)),
        ]
        .spacing(20);

        #[cfg(feature = "camera")]
        let actions = actions.push(
            button("Use Camera").on_press(ScreenMessage::ScreenMessage(HomeMessage::UseCamera)),
        );

        let mut content = column![
            text("Cellspot").size(32),
            text("Infected cell detection for microscope images"),
            actions,
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        if let Some(error) = &self.error {
            content = content.push(text(format!("Error: {}", error)));
        }

        container(content)
            .center_x(iced::Length::Fill)
            .center_y(iced::Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            HomeMessage::UploadImage => Task::perform(
                AsyncFileDialog::new()
                    .add_filter("Microscope Image", &["jpg", "jpeg", "png"])
                    .pick_file(),
                |handle| match handle {
                    Some(file) => ScreenMessage::ParentMessage(ParentMessage::ImagePicked(
                        file.path().to_path_buf(),
                    )),
                    None => ScreenMessage::ScreenMessage(HomeMessage::None),
                },
            ),
            #[cfg(feature = "camera")]
            HomeMessage::UseCamera => Task::done(ScreenMessage::ParentMessage(
                ParentMessage::UseCamera,
            )),
            HomeMessage::None => Task::none(),
        }
    }
}
