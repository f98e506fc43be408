//! Bucket-based main color extraction.
//!
//! Steps performed by [`pick_main_colors`]:
//! 1. Validate the color list and the variety level.
//! 2. Build a [`GroupIndex`] that maps every channel value to its group.
//! 3. Put each color in the bucket named by its three group indices, then
//!    order buckets from most to least populated.
//! 4. Reduce every bucket to one color, by average or by frequency.

use std::collections::HashMap;

use log::{debug, trace};

use crate::color::{Channel, Color, SubPixels, checked_sub_pixel, round_half_up};
use crate::error::{PickerError, Result};
use crate::options::{PickerOptions, SelectionMode, VarietyLevel};

const CHANNEL_VALUES: usize = 256;

// ------------------------------------------------------------
// Validation
// ------------------------------------------------------------

/// A color whose channels all round into 0..=255.
struct Sample {
    original: [f64; 3],
    rounded: [u8; 3],
}

fn validate_parameters<C>(colors: &[C], options: &PickerOptions) -> Result<VarietyLevel> {
    if colors.is_empty() {
        return Err(PickerError::EmptyInput);
    }
    options.variety_level()
}

/// Checks every channel of every color before any bucket is built.
fn validate_sub_pixels<C: SubPixels>(colors: &[C]) -> Result<Vec<Sample>> {
    colors
        .iter()
        .enumerate()
        .map(|(index, color)| -> Result<Sample> {
            let original = color.sub_pixels();
            let mut rounded = [0u8; 3];
            for ((slot, channel), &value) in rounded.iter_mut().zip(Channel::ALL).zip(&original) {
                *slot = checked_sub_pixel(value).ok_or(PickerError::InvalidSubPixel {
                    index,
                    channel,
                    value,
                })?;
            }
            Ok(Sample { original, rounded })
        })
        .collect()
}

// ------------------------------------------------------------
// Group index
// ------------------------------------------------------------

/// Exclusive upper limit of every group: `round(256 * i / level)` for
/// `i` in `1..=level`.
///
/// `256 * i / level` is never exactly halfway between two integers for
/// `level <= 256`, so integer rounding gives the same limits as any
/// floating-point rounding mode. The last limit is always 256.
pub fn group_limits(level: VarietyLevel) -> impl Iterator<Item = usize> {
    let level = usize::from(level.get());
    (1..=level).map(move |i| (2 * CHANNEL_VALUES * i + level) / (2 * level))
}

/// Lookup table from a channel value to its group.
///
/// Groups are not all the same width: each limit is rounded on its own, so
/// a level of 7 gives widths of 37 and 36 alternately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIndex {
    level: VarietyLevel,
    groups: [u8; CHANNEL_VALUES],
}

impl GroupIndex {
    pub fn new(level: VarietyLevel) -> Self {
        let mut groups = [0u8; CHANNEL_VALUES];
        let mut value = 0;
        for (group, limit) in group_limits(level).enumerate() {
            trace!("group {group} ends before {limit}");
            while value < limit.min(CHANNEL_VALUES) {
                // level <= 256, so group <= 255
                groups[value] = group as u8;
                value += 1;
            }
        }
        Self { level, groups }
    }

    #[inline]
    pub fn group_of(&self, sub_pixel: u8) -> u8 {
        self.groups[usize::from(sub_pixel)]
    }

    pub fn level(&self) -> VarietyLevel {
        self.level
    }
}

// ------------------------------------------------------------
// Grouping
// ------------------------------------------------------------

/// Group indices of a color's red, green and blue channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey(pub [u8; 3]);

/// The colors that share a [`BucketKey`], in input order.
///
/// Colors keep their original, unrounded channel values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBucket {
    key: BucketKey,
    colors: Vec<[f64; 3]>,
}

impl ColorBucket {
    pub fn key(&self) -> BucketKey {
        self.key
    }

    pub fn colors(&self) -> &[[f64; 3]] {
        &self.colors
    }

    /// Never zero.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Per-channel mean, each channel rounded on its own.
    pub fn average_color(&self) -> Color {
        let mut sums = [0.0f64; 3];
        for color in &self.colors {
            for (sum, value) in sums.iter_mut().zip(color) {
                *sum += value;
            }
        }
        let count = self.colors.len() as f64;
        sums.map(|sum| to_channel(sum / count))
    }

    /// The color seen most often, compared on exact channel values.
    /// Ties go to the color that appeared first.
    pub fn most_frequent_color(&self) -> Color {
        // value bits -> (first position, count)
        let mut tally: HashMap<[u64; 3], (usize, usize)> = HashMap::new();
        for (position, color) in self.colors.iter().enumerate() {
            tally.entry(color_bits(color)).or_insert((position, 0)).1 += 1;
        }

        let (first, _) = tally
            .into_values()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .unwrap_or((0, 0));

        self.colors.get(first).map_or([0; 3], |color| color.map(to_channel))
    }
}

/// Validates and groups `colors`, most populated bucket first.
///
/// Buckets of equal size keep the order in which they were first seen.
pub fn color_buckets<C: SubPixels>(colors: &[C], options: &PickerOptions) -> Result<Vec<ColorBucket>> {
    let level = validate_parameters(colors, options)?;
    let samples = validate_sub_pixels(colors)?;
    let index = GroupIndex::new(level);

    let mut positions: HashMap<BucketKey, usize> = HashMap::new();
    let mut buckets: Vec<ColorBucket> = Vec::new();

    for sample in &samples {
        let key = BucketKey(sample.rounded.map(|sub_pixel| index.group_of(sub_pixel)));
        let slot = *positions.entry(key).or_insert_with(|| {
            buckets.push(ColorBucket {
                key,
                colors: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].colors.push(sample.original);
    }

    // stable: equal sizes stay in first-seen order
    buckets.sort_by(|a, b| b.len().cmp(&a.len()));

    debug!(
        "grouped {} colors into {} buckets at variety level {}",
        samples.len(),
        buckets.len(),
        level.get()
    );

    Ok(buckets)
}

// ------------------------------------------------------------
// Main colors
// ------------------------------------------------------------

/// Extract the main colors from a list of colors.
///
/// One color is returned per populated bucket, most populated first. The
/// call fails without partial output if the list is empty, the variety
/// level is not an integer in 1..=256, or any channel rounds outside
/// 0..=255.
///
/// ```
/// use main_colors_picker::{PickerOptions, pick_main_colors};
///
/// let colors = [[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0], [5, 0, 0]];
/// let main = pick_main_colors(&colors, &PickerOptions::new().with_variety_level(1))?;
/// assert_eq!(main, vec![[3, 0, 0]]);
/// # Ok::<(), main_colors_picker::PickerError>(())
/// ```
pub fn pick_main_colors<C: SubPixels>(colors: &[C], options: &PickerOptions) -> Result<Vec<Color>> {
    let buckets = color_buckets(colors, options)?;

    let reduce: fn(&ColorBucket) -> Color = match options.mode {
        SelectionMode::Average => ColorBucket::average_color,
        SelectionMode::Frequency => ColorBucket::most_frequent_color,
    };

    let main_colors: Vec<Color> = buckets.iter().map(reduce).collect();
    debug!("picked {} main colors ({:?} mode)", main_colors.len(), options.mode);
    Ok(main_colors)
}

#[inline]
fn to_channel(value: f64) -> u8 {
    round_half_up(value).clamp(0.0, 255.0) as u8
}

/// Bit pattern of a color for exact comparison; `-0.0` and `0.0` compare equal.
#[inline]
fn color_bits(color: &[f64; 3]) -> [u64; 3] {
    color.map(|value| (value + 0.0).to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(level: u16) -> VarietyLevel {
        VarietyLevel::new(level).unwrap()
    }

    fn options(level: u16, mode: SelectionMode) -> PickerOptions {
        PickerOptions::new().with_variety_level(level).with_mode(mode)
    }

    fn boundaries(index: &GroupIndex) -> Vec<usize> {
        (1..CHANNEL_VALUES)
            .filter(|&v| index.group_of(v as u8) != index.group_of(v as u8 - 1))
            .collect()
    }

    #[test]
    fn test_group_limits_end_at_256() {
        for l in [1, 2, 3, 7, 8, 100, 255, 256] {
            let limits: Vec<usize> = group_limits(level(l)).collect();
            assert_eq!(limits.len(), usize::from(l));
            assert_eq!(*limits.last().unwrap(), 256);
            assert!(limits.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_group_index_level_one_is_single_group() {
        let index = GroupIndex::new(level(1));
        assert!((0..=255u8).all(|v| index.group_of(v) == 0));
    }

    #[test]
    fn test_group_index_splits_on_rounded_limits() {
        assert_eq!(boundaries(&GroupIndex::new(level(2))), vec![128]);
        assert_eq!(boundaries(&GroupIndex::new(level(3))), vec![85, 171]);
        assert_eq!(
            boundaries(&GroupIndex::new(level(7))),
            vec![37, 73, 110, 146, 183, 219]
        );
        assert_eq!(boundaries(&GroupIndex::new(level(8))), vec![32, 64, 96, 128, 160, 192, 224]);
    }

    #[test]
    fn test_group_index_level_256_is_identity() {
        let index = GroupIndex::new(level(256));
        assert!((0..=255u8).all(|v| index.group_of(v) == v));
        assert_eq!(index.level().get(), 256);
    }

    #[test]
    fn test_group_index_uses_every_group() {
        for l in [5u16, 8, 13, 64, 200] {
            let index = GroupIndex::new(level(l));
            let last = (0..=255u8).map(|v| index.group_of(v)).max().unwrap();
            assert_eq!(u16::from(last), l - 1);
        }
    }

    #[test]
    fn test_buckets_sorted_with_first_seen_ties() {
        let colors = [[9, 0, 0], [5, 0, 0], [7, 0, 0], [5, 0, 0], [7, 0, 0], [7, 0, 0]];
        let buckets = color_buckets(&colors, &options(256, SelectionMode::Average)).unwrap();
        let keys: Vec<[u8; 3]> = buckets.iter().map(|b| b.key().0).collect();
        assert_eq!(keys, vec![[7, 0, 0], [5, 0, 0], [9, 0, 0]]);
        assert_eq!(buckets.iter().map(ColorBucket::len).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_bucket_keeps_unrounded_colors() {
        let colors = [[254.6, 0.0, 0.0], [255.4, 0.0, 0.0]];
        let buckets = color_buckets(&colors, &options(1, SelectionMode::Average)).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].colors(), &colors[..]);
        assert_eq!(buckets[0].average_color(), [255, 0, 0]);
    }

    #[test]
    fn test_average_rounds_each_channel() {
        let colors = [[0, 1, 10], [1, 2, 10], [1, 2, 11], [1, 2, 10]];
        let main = pick_main_colors(&colors, &options(1, SelectionMode::Average)).unwrap();
        // 0.75, 1.75, 10.25
        assert_eq!(main, vec![[1, 2, 10]]);

        let halves = [[0, 0, 0], [1, 1, 1]];
        let main = pick_main_colors(&halves, &options(1, SelectionMode::Average)).unwrap();
        assert_eq!(main, vec![[1, 1, 1]]);
    }

    #[test]
    fn test_frequency_ties_go_to_first_seen() {
        let colors = [[3, 3, 3], [1, 1, 1], [1, 1, 1], [3, 3, 3], [2, 2, 2]];
        let main = pick_main_colors(&colors, &options(1, SelectionMode::Frequency)).unwrap();
        assert_eq!(main, vec![[3, 3, 3]]);
    }

    #[test]
    fn test_frequency_compares_exact_values() {
        // 0.4 and 0.3 both round to 0 but are different colors
        let colors = [[0.4, 0.0, 0.0], [0.3, 0.0, 0.0], [0.6, 0.0, 0.0], [0.6, 0.0, 0.0]];
        let main = pick_main_colors(&colors, &options(1, SelectionMode::Frequency)).unwrap();
        assert_eq!(main, vec![[1, 0, 0]]);

        let signed_zero = [[5.0, 5.0, 5.0], [-0.0, 9.0, 9.0], [0.0, 9.0, 9.0]];
        let buckets = color_buckets(&signed_zero, &options(1, SelectionMode::Frequency)).unwrap();
        assert_eq!(buckets[0].most_frequent_color(), [0, 9, 9]);
    }

    #[test]
    fn test_bad_sub_pixel_after_good_colors_fails_whole_call() {
        let colors = [[0, 0, 0], [10, 10, 10], [0, 300, 0]];
        let err = pick_main_colors(&colors, &PickerOptions::new()).unwrap_err();
        assert_eq!(
            err,
            PickerError::InvalidSubPixel {
                index: 2,
                channel: Channel::Green,
                value: 300.0
            }
        );
    }

    #[test]
    fn test_variety_level_reported_before_sub_pixels() {
        let options = PickerOptions {
            colors_variety_level: Some(0.0),
            ..PickerOptions::default()
        };
        let err = pick_main_colors(&[[-5, 0, 0]], &options).unwrap_err();
        assert!(matches!(err, PickerError::InvalidVarietyLevel { .. }));
    }

    #[test]
    fn test_empty_input_reported_before_variety_level() {
        let options = PickerOptions {
            colors_variety_level: Some(1.5),
            ..PickerOptions::default()
        };
        let colors: [[u8; 3]; 0] = [];
        assert_eq!(pick_main_colors(&colors, &options), Err(PickerError::EmptyInput));
    }
}
