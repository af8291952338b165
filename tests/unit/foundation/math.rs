use super::*;

#[test]
fn lerp_endpoints_and_midpoint() {
    assert_eq!(lerp(280.0, 200.0, 0.0), 280.0);
    assert_eq!(lerp(280.0, 200.0, 1.0), 200.0);
    assert_eq!(lerp(280.0, 200.0, 0.5), 240.0);
}

#[test]
fn fract_and_hue_wrap() {
    assert!((fract(3.25) - 0.25).abs() < 1e-12);
    assert_eq!(wrap_hue(370.0), 10.0);
    assert_eq!(wrap_hue(-7.5), 352.5);
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}
