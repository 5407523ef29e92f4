#[cfg(feature = "camera")]
pub mod camera;
pub mod detect;
pub mod home;

use iced::{Element, Task};
use image::{ImageReader, RgbImage};

use crate::gui::{AppState, Message};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug + Clone;
    type ParentMessage: std::fmt::Debug + Clone;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    Home(home::HomeScreen),
    Detect(detect::DetectScreen),
    #[cfg(feature = "camera")]
    Camera(camera::CameraScreen),
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match self {
            ScreenData::Home(screen) => screen.view().map(Message::Home),
            ScreenData::Detect(screen) => screen.view().map(Message::Detect),
            #[cfg(feature = "camera")]
            ScreenData::Camera(screen) => screen.view().map(Message::Camera),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::ChangeScreen(screen)) => {
                *x = screen;
                Task::none()
            }
            (x, Message::ImageLoaded(result)) => {
                match result {
                    Ok(img) => *x = ScreenData::Detect(detect::DetectScreen::new(img)),
                    Err(error) => *x = ScreenData::Home(home::HomeScreen::with_error(error)),
                }
                Task::none()
            }
            (ScreenData::Home(page), Message::Home(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Home)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(parent_msg) => match parent_msg {
                    home::ParentMessage::ImagePicked(path) => Task::perform(
                        async move {
                            let img = ImageReader::open(&path)
                                .map_err(|e| e.to_string())?
                                .decode()
                                .map_err(|e| format!("Failed to decode image: {}", e))?;
                            Ok(img.to_rgb8())
                        },
                        |result: Result<RgbImage, String>| {
                            ScreenMessage::ScreenMessage(Message::ImageLoaded(result))
                        },
                    ),
                    #[cfg(feature = "camera")]
                    home::ParentMessage::UseCamera => {
                        Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                            ScreenData::Camera(camera::CameraScreen::default()),
                        )))
                    }
                },
            },
            (ScreenData::Detect(page), Message::Detect(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Detect)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(parent_msg) => match parent_msg {
                    detect::ParentMessage::Back => {
                        Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                            ScreenData::Home(home::HomeScreen::default()),
                        )))
                    }
                },
            },
            #[cfg(feature = "camera")]
            (ScreenData::Camera(page), Message::Camera(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Camera)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(parent_msg) => match parent_msg {
                    camera::ParentMessage::FrameReady(frame) => Task::done(
                        ScreenMessage::ScreenMessage(Message::ImageLoaded(Ok(frame))),
                    ),
                    camera::ParentMessage::Back => {
                        Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                            ScreenData::Home(home::HomeScreen::default()),
                        )))
                    }
                },
            },
            _ => Task::none(),
        }
    }
}
