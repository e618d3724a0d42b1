//! Small numeric helpers shared by the color and mosaic paths.

/// Full-scale value of an 8-bit sample.
pub const U8_SCALE: f32 = 255.0;

/// Normalization denominator used when the decoder reports no sensor maximum.
pub const DEFAULT_SENSOR_MAXIMUM: f32 = 65535.0;

#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[inline]
pub fn u8_to_unit(value: u8) -> f32 {
    value as f32 / U8_SCALE
}

/// Rounds a `[0, 1]` value back onto the 8-bit grid, saturating at both ends.
#[inline]
pub fn unit_to_u8(value: f32) -> u8 {
    (value * U8_SCALE).round().clamp(0.0, U8_SCALE) as u8
}

/// Divides a raw sample by the sensor maximum and clamps the result, so a
/// calibration maximum below the actual data still yields `[0, 1]`.
#[inline]
pub fn normalize_sample(sample: u16, max_value: f32) -> f32 {
    clamp_unit(sample as f32 / max_value)
}

/// Resolves the normalization denominator, treating 0 as "not calibrated".
#[inline]
pub fn resolve_maximum(sensor_maximum: u32) -> f32 {
    if sensor_maximum == 0 {
        DEFAULT_SENSOR_MAXIMUM
    } else {
        sensor_maximum as f32
    }
}
