use iced::widget::{column, container, image as image_widget, text};
use iced::{Alignment, Element, Length};
use iced_widget::container::bordered_box;
use image::RgbImage;

/// Handle for displaying an in-memory frame in an iced image widget.
pub fn image_handle(img: &RgbImage) -> image_widget::Handle {
    let rgba = image::DynamicImage::ImageRgb8(img.clone()).to_rgba8();
    image_widget::Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

/// Captioned, bordered image panel.
pub fn image_card<'a, Message: 'a>(
    caption: &'a str,
    handle: &image_widget::Handle,
) -> Element<'a, Message> {
    container(
        column![
            image_widget(handle.clone()).width(Length::Fixed(224.0)),
            text(caption),
        ]
        .spacing(10)
        .align_x(Alignment::Center),
    )
    .style(bordered_box)
    .padding(10)
    .into()
}
