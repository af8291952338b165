/// Linear interpolation `a + (b - a) * t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Fractional part for non-negative clocks (`x mod 1`).
pub(crate) fn fract(x: f64) -> f64 {
    x.rem_euclid(1.0)
}

/// Euclidean remainder into `[0, 360)` for hue arithmetic.
pub(crate) fn wrap_hue(h: f64) -> f64 {
    h.rem_euclid(360.0)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
