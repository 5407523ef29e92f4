use image::RgbImage;

use crate::gui::screens::{ScreenData, ScreenMessage, detect::DetectScreen, home::HomeScreen};

#[cfg(feature = "camera")]
use crate::gui::screens::camera::CameraScreen;

#[derive(Debug, Clone)]
pub enum Message {
    Home(ScreenMessage<HomeScreen>),
    Detect(ScreenMessage<DetectScreen>),
    #[cfg(feature = "camera")]
    Camera(ScreenMessage<CameraScreen>),
    ChangeScreen(ScreenData),
    /// A source image is ready for the detect screen, either decoded from
    /// a picked file or captured from the camera.
    ImageLoaded(Result<RgbImage, String>),
}
