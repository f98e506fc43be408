//! Color values accepted and produced by the picker.

use std::fmt;

use image::Rgb;
use palette::Srgb;

/// An output color: red, green, blue in 0..=255.
pub type Color = [u8; 3];

/// One of the three components of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => f.write_str("red"),
            Channel::Green => f.write_str("green"),
            Channel::Blue => f.write_str("blue"),
        }
    }
}

/// Anything that can be read as an RGB triple.
///
/// Channels are exposed as `f64` so that fractional inputs survive until
/// validation, where they are rounded to the nearest integer.
pub trait SubPixels {
    fn sub_pixels(&self) -> [f64; 3];
}

macro_rules! impl_sub_pixels_for_array {
    ($($t:ty),*) => {
        $(
            impl SubPixels for [$t; 3] {
                #[inline]
                fn sub_pixels(&self) -> [f64; 3] {
                    self.map(|v| v as f64)
                }
            }
        )*
    };
}

impl_sub_pixels_for_array!(u8, u16, i32, i64, f32, f64);

impl<T: SubPixels + ?Sized> SubPixels for &T {
    #[inline]
    fn sub_pixels(&self) -> [f64; 3] {
        (**self).sub_pixels()
    }
}

impl SubPixels for Rgb<u8> {
    #[inline]
    fn sub_pixels(&self) -> [f64; 3] {
        self.0.map(f64::from)
    }
}

impl SubPixels for Srgb<u8> {
    #[inline]
    fn sub_pixels(&self) -> [f64; 3] {
        [self.red.into(), self.green.into(), self.blue.into()]
    }
}

/// Round half up, matching JavaScript's `Math.round`.
///
/// `-0.5` becomes `-0.0` rather than `-1.0`, so it is still a valid channel.
#[inline]
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Rounds a channel and returns it if it lands in 0..=255.
#[inline]
pub(crate) fn checked_sub_pixel(value: f64) -> Option<u8> {
    let rounded = round_half_up(value);
    (0.0..=255.0).contains(&rounded).then_some(rounded as u8)
}

/// `RRGGBB` in upper-case hex.
pub fn to_hex(color: Color) -> String {
    format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

pub fn to_srgb(color: Color) -> Srgb<u8> {
    Srgb::new(color[0], color[1], color[2])
}
