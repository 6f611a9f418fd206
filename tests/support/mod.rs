#![allow(dead_code)]

pub mod fake_server;
pub mod lanescope_env;

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

/// Encode a small solid PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 200, 40, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}
