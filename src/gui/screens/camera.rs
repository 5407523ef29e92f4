use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, image as image_widget, row, text},
};
use image::RgbImage;

use crate::camera::{CameraSource, capture_still};
use crate::gui::{
    AppState, CameraSession, widgets,
    screens::{Screen, ScreenMessage},
};

/// Frames to discard after opening the device, while exposure settles.
const WARMUP_FRAMES: usize = 5;

#[derive(Debug, Clone)]
pub struct CameraScreen {
    device: String,
    session: CameraSession,
    preview: Option<image_widget::Handle>,
    error: Option<String>,
}

impl Default for CameraScreen {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            session: CameraSession::Idle,
            preview: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CameraMessage {
    Start,
    Capture,
    Detect,
    Back,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    FrameReady(RgbImage),
    Back,
}

impl Screen for CameraScreen {
    type Message = CameraMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let mut actions = row![].spacing(20);
        match &self.session {
            CameraSession::Idle => {
                actions = actions.push(
                    button("Start Camera")
                        .on_press(ScreenMessage::ScreenMessage(CameraMessage::Start)),
                );
            }
            CameraSession::CameraActive => {
                actions = actions.push(
                    button("Capture Frame")
                        .on_press(ScreenMessage::ScreenMessage(CameraMessage::Capture)),
                );
            }
            CameraSession::FrameCaptured(_) => {
                actions = actions.push(
                    button("Detect Infected Cells")
                        .on_press(ScreenMessage::ScreenMessage(CameraMessage::Detect)),
                );
                actions = actions.push(
                    button("Capture Again")
                        .on_press(ScreenMessage::ScreenMessage(CameraMessage::Capture)),
                );
            }
        }
        actions = actions
            .push(button("Back").on_press(ScreenMessage::ScreenMessage(CameraMessage::Back)));

        let status = match &self.session {
            CameraSession::Idle => format!("Camera idle ({})", self.device),
            CameraSession::CameraActive => format!("Camera active ({})", self.device),
            CameraSession::FrameCaptured(_) => "Frame captured".to_string(),
        };

        let mut content = column![text("Cellspot").size(32), text(status), actions]
            .spacing(20)
            .padding(20)
            .align_x(Center);

        if let Some(preview) = &self.preview {
            content = content.push(widgets::image_card("Captured Frame", preview));
        }
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
            CameraMessage::Start => {
                // probe the device before declaring the session active
                match CameraSource::open(&self.device) {
                    Ok(_) => {
                        self.session = CameraSession::CameraActive;
                        self.error = None;
                    }
                    Err(e) => self.error = Some(format!("Camera failed to open: {}", e)),
                }
                Task::none()
            }
            CameraMessage::Capture => {
                match capture_still(&self.device, WARMUP_FRAMES) {
                    Ok(frame) => {
                        self.preview = Some(widgets::image_handle(&frame));
                        self.session = CameraSession::FrameCaptured(frame);
                        self.error = None;
                    }
                    Err(e) => self.error = Some(format!("Capture failed: {}", e)),
                }
                Task::none()
            }
            CameraMessage::Detect => {
                let session = std::mem::replace(&mut self.session, CameraSession::Idle);
                match session {
                    CameraSession::FrameCaptured(frame) => {
                        Task::done(ScreenMessage::ParentMessage(ParentMessage::FrameReady(frame)))
                    }
                    other => {
                        self.session = other;
                        Task::none()
                    }
                }
            }
            CameraMessage::Back => Task::done(ScreenMessage::ParentMessage(ParentMessage::Back)),
        }
    }
}
