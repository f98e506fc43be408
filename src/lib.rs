//! Pick the main colors out of a list of RGB colors.
//!
//! Colors are grouped into buckets along each channel, buckets are ranked by
//! how many colors they hold, and every bucket is reduced to one color by
//! averaging it or by taking its most frequent member. The result runs from
//! the most to the least populated bucket.
//!
//! The same code backs three entry points:
//! - [`pick_main_colors`] for Rust callers,
//! - `getMainColors` / `getMainColorsHex` through wasm-bindgen,
//! - the `main-colors` binary (feature `native-bin`).

use image::{Rgb, RgbaImage};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod options;
pub mod picker;

pub use color::{Channel, Color, SubPixels, to_hex, to_srgb};
pub use error::{PickerError, Result, VarietyLevelIssue};
pub use options::{PickerOptions, SelectionMode, VarietyLevel};
pub use picker::{BucketKey, ColorBucket, GroupIndex, color_buckets, group_limits, pick_main_colors};

/// Main colors of an already-decoded RGBA buffer.
///
/// Fully transparent pixels are skipped. An image with no opaque pixel is
/// reported as [`PickerError::EmptyInput`].
pub fn pick_from_rgba_image(img: &RgbaImage, options: &PickerOptions) -> Result<Vec<Color>> {
    let opaque: Vec<Rgb<u8>> = img
        .pixels()
        .filter(|p| p[3] > 0)
        .map(|p| Rgb([p[0], p[1], p[2]]))
        .collect();
    pick_main_colors(&opaque, options)
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

/// Get the main colors from an array of `[r, g, b]` arrays.
///
/// `parameters` may carry `colorsVarietyLevel` (1..=256, default 8) and
/// `mode` (`0`/`"average"` or `1`/`"frequency"`). Returns an array of
/// `[r, g, b]` arrays, most populated group first.
#[wasm_bindgen(js_name = getMainColors)]
pub fn get_main_colors(colors: Array, parameters: Option<Object>) -> std::result::Result<Array, JsValue> {
    let main_colors = pick_for_js(&colors, parameters.as_ref())?;

    let result = Array::new();
    for color in main_colors {
        let rgb: Array = color.iter().map(|&c| JsValue::from(c)).collect();
        result.push(&rgb);
    }
    Ok(result)
}

/// Same as `getMainColors`, with each color as an `RRGGBB` string.
#[wasm_bindgen(js_name = getMainColorsHex)]
pub fn get_main_colors_hex(colors: Array, parameters: Option<Object>) -> std::result::Result<Array, JsValue> {
    let main_colors = pick_for_js(&colors, parameters.as_ref())?;

    let palette_js = Array::new();
    for color in main_colors {
        palette_js.push(&JsValue::from_str(&to_hex(color)));
    }
    Ok(palette_js)
}

fn pick_for_js(colors: &Array, parameters: Option<&Object>) -> std::result::Result<Vec<Color>, JsValue> {
    let colors = read_js_colors(colors)?;
    let options = read_js_parameters(parameters)?;
    pick_main_colors(&colors, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn read_js_colors(colors: &Array) -> std::result::Result<Vec<[f64; 3]>, JsValue> {
    colors
        .iter()
        .enumerate()
        .map(|(index, value)| -> std::result::Result<[f64; 3], JsValue> {
            let color: Array = value
                .dyn_into()
                .map_err(|_| JsValue::from_str(&format!("color #{index} is not an array")))?;
            if color.length() != 3 {
                return Err(JsValue::from_str(&format!(
                    "color #{index} must have 3 sub-pixels, got {}",
                    color.length()
                )));
            }

            let mut sub_pixels = [0.0; 3];
            for (slot, sub_pixel) in sub_pixels.iter_mut().zip(color.iter()) {
                *slot = sub_pixel
                    .as_f64()
                    .ok_or_else(|| JsValue::from_str(&format!("color #{index} has a non-numeric sub-pixel")))?;
            }
            Ok(sub_pixels)
        })
        .collect()
}

fn read_js_parameters(parameters: Option<&Object>) -> std::result::Result<PickerOptions, JsValue> {
    let mut options = PickerOptions::new();
    let Some(parameters) = parameters else {
        return Ok(options);
    };

    // Only `undefined` means "not given"; `null` or a string is a bad level.
    let level = Reflect::get(parameters, &JsValue::from_str("colorsVarietyLevel"))?;
    if !level.is_undefined() {
        options.colors_variety_level = Some(level.as_f64().unwrap_or(f64::NAN));
    }

    let mode = Reflect::get(parameters, &JsValue::from_str("mode"))?;
    let frequency = mode.as_f64() == Some(1.0) || mode.as_string().as_deref() == Some("frequency");
    if frequency {
        options.mode = SelectionMode::Frequency;
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_pick_from_rgba_image_skips_transparent_pixels() {
        let mut img = RgbaImage::new(4, 4);
        for (x, _, p) in img.enumerate_pixels_mut() {
            *p = if x == 0 {
                Rgba([200, 10, 10, 255])
            } else {
                Rgba([0, 0, 255, 0])
            };
        }

        let main = pick_from_rgba_image(&img, &PickerOptions::new()).unwrap();
        assert_eq!(main, vec![[200, 10, 10]]);
    }

    #[test]
    fn test_pick_from_fully_transparent_image_is_empty_input() {
        let img = RgbaImage::new(3, 3);
        assert_eq!(
            pick_from_rgba_image(&img, &PickerOptions::new()),
            Err(PickerError::EmptyInput)
        );
    }
}
