use std::pin::Pin;

use anyhow::{Context, Result};
use image::RgbImage;
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// V4L2 camera source producing RGB frames.
///
/// The v4l `Stream` borrows the `Device`, so the device is pinned on the
/// heap and the stream's lifetime is erased. The stream is taken in `Drop`
/// so it is always released before the device.
pub struct CameraSource {
    device: Pin<Box<Device>>,
    stream: Option<Stream<'static>>,
    width: u32,
    height: u32,
}

impl CameraSource {
    /// Open a camera device and start a capture stream at 640x480 YUYV.
    pub fn open(device_path: &str) -> Result<Self> {
        let device = Box::pin(
            Device::with_path(device_path)
                .with_context(|| format!("Failed to open camera device {}", device_path))?,
        );

        let mut format = device.format()?;
        format.width = 640;
        format.height = 480;
        format.fourcc = FourCC::new(b"YUYV");
        let format = device.set_format(&format)?;

        let mut source = Self {
            device,
            stream: None,
            width: format.width,
            height: format.height,
        };

        let device_ref: &Device = &source.device;
        let stream = unsafe {
            // SAFETY: the device is pinned on the heap and never moves, and
            // the stream is dropped before the device (see Drop).
            let device_static: &'static Device = std::mem::transmute(device_ref);
            Stream::with_buffers(device_static, Type::VideoCapture, 4)
                .context("Failed to start capture stream")?
        };
        source.stream = Some(stream);

        Ok(source)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Grab the next frame from the stream.
    pub fn grab(&mut self) -> Result<RgbImage> {
        let stream = self.stream.as_mut().context("Capture stream is closed")?;
        let (buffer, _meta) = stream.next().context("Failed to capture frame")?;
        let rgb = yuyv_to_rgb(buffer, self.width, self.height);
        RgbImage::from_raw(self.width, self.height, rgb)
            .context("Camera returned a truncated frame")
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.stream.take();
    }
}

impl Iterator for CameraSource {
    type Item = Result<RgbImage>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.grab())
    }
}

/// Open a device, discard `warmup` frames while the exposure settles, and
/// return the next one.
pub fn capture_still(device_path: &str, warmup: usize) -> Result<RgbImage> {
    let mut source = CameraSource::open(device_path)?;
    for _ in 0..warmup {
        source.grab()?;
    }
    source.grab()
}

fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);

    for chunk in yuyv.chunks(4) {
        if chunk.len() < 4 {
            break;
        }

        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    rgb
}
