//! Tests for the HSL conversion and saturation/vibrance adjustment

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::image_pipeline::common::error::PipelineError;
use crate::image_pipeline::common::numeric::{u8_to_unit, unit_to_u8};
use crate::image_pipeline::debayer::PixelBuffer;

fn roundtrip(rgb: [u8; 3]) -> [u8; 3] {
    let hsl = rgb_to_hsl(u8_to_unit(rgb[0]), u8_to_unit(rgb[1]), u8_to_unit(rgb[2]));
    let (r, g, b) = hsl_to_rgb(hsl);
    [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)]
}

fn assert_close(expected: [u8; 3], actual: [u8; 3], tolerance: i16) {
    for c in 0..3 {
        let diff = (expected[c] as i16 - actual[c] as i16).abs();
        assert!(
            diff <= tolerance,
            "channel {} differs: {:?} vs {:?}",
            c,
            expected,
            actual
        );
    }
}

fn checkerboard(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8]);
        }
    }
    PixelBuffer::rgb8(width, height, data).unwrap()
}

#[test]
fn test_hsl_values() {
    let red = rgb_to_hsl(1.0, 0.0, 0.0);
    assert!((red.h - 0.0).abs() < 1e-6);
    assert!((red.s - 1.0).abs() < 1e-6);
    assert!((red.l - 0.5).abs() < 1e-6);

    let green = rgb_to_hsl(0.0, 1.0, 0.0);
    assert!((green.h - 1.0 / 3.0).abs() < 1e-6);

    let blue = rgb_to_hsl(0.0, 0.0, 1.0);
    assert!((blue.h - 2.0 / 3.0).abs() < 1e-6);

    let magenta = rgb_to_hsl(1.0, 0.0, 1.0);
    assert!((magenta.h - 5.0 / 6.0).abs() < 1e-6);
    assert!(magenta.h < 1.0);
}

#[test]
fn test_achromatic_hsl() {
    let grey = rgb_to_hsl(0.25, 0.25, 0.25);
    assert_eq!(grey.h, 0.0);
    assert_eq!(grey.s, 0.0);
    assert!((grey.l - 0.25).abs() < 1e-6);
}

#[test]
fn test_rgb_hsl_roundtrip_within_one_step() {
    let fixed = [
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [128, 128, 128],
        [0, 0, 0],
        [255, 255, 255],
    ];
    for rgb in fixed {
        assert_close(rgb, roundtrip(rgb), 1);
    }

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..1000 {
        let rgb: [u8; 3] = [rng.random(), rng.random(), rng.random()];
        assert_close(rgb, roundtrip(rgb), 1);
    }
}

#[test]
fn test_zero_params_is_byte_exact_identity() {
    let buffer = checkerboard(17, 9);
    let adjusted = ColorAdjuster::new(ColorAdjustmentParams::default())
        .adjust(&buffer)
        .unwrap();
    assert_eq!(adjusted, buffer);
}

#[test]
fn test_achromatic_pixels_are_invariant() {
    let greys: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();
    let buffer = PixelBuffer::rgb8(256, 1, greys).unwrap();

    for (saturation, vibrance) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.7, -0.4), (3.0, 3.0)] {
        let adjusted = ColorAdjuster::new(ColorAdjustmentParams::new(saturation, vibrance))
            .adjust(&buffer)
            .unwrap();
        for (original, pixel) in buffer.data().chunks(3).zip(adjusted.data().chunks(3)) {
            assert_close([original[0], original[1], original[2]], [pixel[0], pixel[1], pixel[2]], 1);
        }
    }
}

#[test]
fn test_full_desaturation_greys_pure_red() {
    let params = ColorAdjustmentParams::new(-1.0, 0.0);
    let [r, g, b] = params.apply_rgb([255, 0, 0]);
    assert_eq!(r, g);
    assert_eq!(g, b);
    assert_eq!(r, 128);
}

#[test]
fn test_desaturation_is_clamped_below_zero() {
    let params = ColorAdjustmentParams::new(-2.5, 0.0);
    let hsl = params.apply(rgb_to_hsl(0.8, 0.2, 0.4));
    assert_eq!(hsl.s, 0.0);
}

#[test]
fn test_saturation_boost_is_clamped_at_one() {
    let params = ColorAdjustmentParams::new(5.0, 0.0);
    let hsl = params.apply(rgb_to_hsl(0.8, 0.2, 0.4));
    assert_eq!(hsl.s, 1.0);
    assert_eq!(params.apply_rgb([255, 0, 0]), [255, 0, 0]);
}

#[test]
fn test_vibrance_favours_dull_colors() {
    let params = ColorAdjustmentParams::new(0.0, 0.5);
    let dull = Hsl { h: 0.3, s: 0.1, l: 0.5 };
    let vivid = Hsl { h: 0.3, s: 0.9, l: 0.5 };

    // relative boost shrinks with saturation
    let dull_gain = params.apply(dull).s / dull.s;
    let vivid_gain = params.apply(vivid).s / vivid.s;
    assert!(dull_gain > vivid_gain);

    // and so does the absolute one for colors below the midpoint
    let mid = Hsl { h: 0.3, s: 0.3, l: 0.5 };
    let mid_increase = params.apply(mid).s - mid.s;
    let vivid_increase = params.apply(vivid).s - vivid.s;
    assert!(mid_increase > vivid_increase);
}

#[test]
fn test_vibrance_leaves_full_saturation_alone() {
    let params = ColorAdjustmentParams::new(0.0, 1.0);
    let hsl = Hsl { h: 0.1, s: 1.0, l: 0.4 };
    assert_eq!(params.apply(hsl).s, 1.0);
}

#[test]
fn test_vibrance_runs_on_adjusted_saturation() {
    let params = ColorAdjustmentParams::new(-1.0, 1.0);
    let hsl = Hsl { h: 0.6, s: 0.5, l: 0.5 };
    assert_eq!(params.apply(hsl).s, 0.0);
}

#[test]
fn test_user_scale_normalization() {
    let params = ColorAdjustmentParams::from_user_scale(50.0, -100.0);
    assert_eq!(params.saturation, 0.5);
    assert_eq!(params.vibrance, -1.0);
}

#[test]
fn test_extra_channel_untouched() {
    let data = vec![200, 40, 40, 77, 10, 200, 90, 255];
    let buffer = PixelBuffer::new(2, 1, 4, 8, data).unwrap();
    let adjusted = ColorAdjuster::new(ColorAdjustmentParams::new(-1.0, 0.0))
        .adjust(&buffer)
        .unwrap();

    assert_eq!(adjusted.channels(), 4);
    assert_eq!(adjusted.data()[3], 77);
    assert_eq!(adjusted.data()[7], 255);
    assert_eq!(adjusted.data()[0], adjusted.data()[1]);
    // input buffer is not modified
    assert_eq!(buffer.data()[0], 200);
}

#[test]
fn test_unsupported_formats_rejected() {
    let adjuster = ColorAdjuster::new(ColorAdjustmentParams::new(0.2, 0.2));

    let two_channel = PixelBuffer::new(2, 2, 2, 8, vec![0u8; 8]).unwrap();
    assert!(matches!(
        adjuster.adjust(&two_channel),
        Err(PipelineError::UnsupportedFormat(_))
    ));

    let sixteen_bit = PixelBuffer::new(2, 2, 3, 16, vec![0u8; 24]).unwrap();
    assert!(matches!(
        adjuster.adjust(&sixteen_bit),
        Err(PipelineError::UnsupportedFormat(_))
    ));

    // checked even when the parameters would make it a no-op
    let identity = ColorAdjuster::default();
    assert!(identity.adjust(&sixteen_bit).is_err());
}

#[test]
fn test_parallel_path_matches_per_pixel_function() {
    let buffer = checkerboard(400, 300);
    let params = ColorAdjustmentParams::new(0.4, 0.3);
    let adjusted = ColorAdjuster::new(params).adjust(&buffer).unwrap();

    for (original, pixel) in buffer.data().chunks(3).zip(adjusted.data().chunks(3)) {
        let expected = params.apply_rgb([original[0], original[1], original[2]]);
        assert_eq!(expected, [pixel[0], pixel[1], pixel[2]]);
    }
}

#[test]
fn test_empty_buffer() {
    let buffer = PixelBuffer::rgb8(0, 0, Vec::new()).unwrap();
    let adjusted = ColorAdjuster::new(ColorAdjustmentParams::new(0.5, 0.5))
        .adjust(&buffer)
        .unwrap();
    assert!(adjusted.data().is_empty());
}

#[test]
fn test_non_finite_knobs_keep_grey_pixels() {
    let buffer = PixelBuffer::rgb8(2, 1, vec![128, 128, 128, 0, 0, 0]).unwrap();
    for (saturation, vibrance) in [
        (f32::INFINITY, 0.0),
        (0.0, f32::INFINITY),
        (f32::NEG_INFINITY, f32::NEG_INFINITY),
        (f32::NAN, 0.0),
        (0.0, f32::NAN),
    ] {
        let adjusted = ColorAdjuster::new(ColorAdjustmentParams::new(saturation, vibrance))
            .adjust(&buffer)
            .unwrap();
        assert_eq!(adjusted.data(), buffer.data(), "({saturation}, {vibrance})");
    }
}

#[test]
fn test_non_finite_knobs_clamp_pure_red() {
    let red = [255, 0, 0];
    assert_eq!(ColorAdjustmentParams::new(f32::INFINITY, 0.0).apply_rgb(red), red);
    assert_eq!(ColorAdjustmentParams::new(0.0, f32::INFINITY).apply_rgb(red), red);
    assert_eq!(
        ColorAdjustmentParams::new(f32::NEG_INFINITY, 0.0).apply_rgb(red),
        [128, 128, 128]
    );

    let buffer = PixelBuffer::rgb8(1, 1, red.to_vec()).unwrap();
    let adjusted = ColorAdjuster::new(ColorAdjustmentParams::new(f32::NAN, f32::NAN))
        .adjust(&buffer)
        .unwrap();
    assert_eq!(adjusted.data(), &red);
}

#[test]
fn test_literal_params_are_sanitized_on_apply() {
    let params = ColorAdjustmentParams {
        saturation: f32::INFINITY,
        vibrance: f32::NAN,
    };
    assert_eq!(params.apply_rgb([128, 128, 128]), [128, 128, 128]);
    assert_eq!(params.apply_rgb([255, 0, 0]), [255, 0, 0]);
    let dull = params.apply_rgb([140, 120, 120]);
    assert_ne!(dull, [0, 0, 0]);
    assert!(dull[0] > dull[1]);
}

#[test]
fn test_user_scale_sanitizes_non_finite_knobs() {
    let params = ColorAdjustmentParams::from_user_scale(f32::INFINITY, f32::NAN);
    assert!(params.saturation.is_finite());
    assert!(params.saturation > 0.0);
    assert_eq!(params.vibrance, 0.0);

    assert!(ColorAdjustmentParams::from_user_scale(f32::NAN, f32::NAN).is_identity());
}
