use std::path::PathBuf;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, image as image_widget, row, text},
};
use image::{DynamicImage, RgbImage};
use rfd::AsyncFileDialog;

use crate::gui::{
    AppState, widgets,
    screens::{Screen, ScreenMessage},
};
use crate::models::Verdict;

#[derive(Debug, Clone)]
pub struct DetectScreen {
    source: RgbImage,
    source_handle: image_widget::Handle,
    result: Option<ResultView>,
    status: Option<String>,
}

#[derive(Debug, Clone)]
struct ResultView {
    handle: image_widget::Handle,
    verdict: Verdict,
    count: usize,
}

impl DetectScreen {
    pub fn new(source: RgbImage) -> Self {
        let source_handle = widgets::image_handle(&source);
        Self {
            source,
            source_handle,
            result: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DetectMessage {
    Detect,
    SaveResult,
    SaveTo(Option<PathBuf>),
    Back,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Back,
}

impl Screen for DetectScreen {
    type Message = DetectMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let mut panels = row![widgets::image_card("Source Image", &self.source_handle)].spacing(20);
        if let Some(result) = &self.result {
            panels = panels.push(widgets::image_card(
                "Detection Result",
                &result.handle,
            ));
        }

        let mut actions = row![
            button("Detect Infected Cells")
                .on_press(ScreenMessage::ScreenMessage(DetectMessage::Detect)),
        ]
        .spacing(20);
        if self.result.is_some() {
            actions = actions.push(
                button("Save Result...")
                    .on_press(ScreenMessage::ScreenMessage(DetectMessage::SaveResult)),
            );
        }
        actions = actions
            .push(button("Back").on_press(ScreenMessage::ScreenMessage(DetectMessage::Back)));

        let mut content = column![text("Cellspot").size(32), panels, actions]
            .spacing(20)
            .padding(20)
            .align_x(Center);

        if let Some(result) = &self.result {
            content = content.push(text(format!(
                "{} - Infected Cells: {}",
                result.verdict, result.count
            )));
        }
        if let Some(status) = &self.status {
            content = content.push(text(status.clone()));
        }

        container(content)
            .center_x(iced::Length::Fill)
            .center_y(iced::Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            DetectMessage::Detect => {
                // the detector expects its output directory to exist
                if let Some(parent) = state.output_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        if let Err(e) = std::fs::create_dir_all(parent) {
                            self.status = Some(format!("Failed to create output directory: {}", e));
                            return Task::none();
                        }
                    }
                }

                let input = DynamicImage::ImageRgb8(self.source.clone());
                match state.detector.detect(&input, &state.output_path) {
                    Ok(report) => {
                        self.result = Some(ResultView {
                            handle: widgets::image_handle(&report.annotated),
                            verdict: report.verdict,
                            count: report.count,
                        });
                        self.status = Some(format!(
                            "Detection Complete: {} - {} infected cell(s).",
                            report.verdict, report.count
                        ));
                    }
                    Err(e) => self.status = Some(format!("Detection failed: {}", e)),
                }
                Task::none()
            }
            DetectMessage::SaveResult => Task::perform(
                AsyncFileDialog::new()
                    .set_file_name("test_result.png")
                    .add_filter("PNG Image", &["png"])
                    .save_file(),
                |handle| {
                    ScreenMessage::ScreenMessage(DetectMessage::SaveTo(
                        handle.map(|file| file.path().to_path_buf()),
                    ))
                },
            ),
            DetectMessage::SaveTo(Some(dest)) => {
                self.status = match std::fs::copy(&state.output_path, &dest) {
                    Ok(_) => Some(format!("Saved to {}", dest.display())),
                    Err(e) => Some(format!("Failed to save result: {}", e)),
                };
                Task::none()
            }
            DetectMessage::SaveTo(None) => Task::none(),
            DetectMessage::Back => Task::done(ScreenMessage::ParentMessage(ParentMessage::Back)),
        }
    }
}
