use super::*;

const EPS: f64 = 1e-12;

#[test]
fn outputs_stay_in_band_for_every_pattern() {
    for pattern in WavePattern::ALL {
        for row in 0..36 {
            for col in 0..64 {
                for time in [0.0, 0.015, 1.7, 42.0, 1234.5] {
                    let s = wave_at(pattern, col, row, 64, 36, time);
                    assert!(
                        (0.2 - EPS..=0.8 + EPS).contains(&s.wave),
                        "{pattern} wave {} at ({col},{row},{time})",
                        s.wave
                    );
                    assert!(
                        (0.3 - EPS..=0.7 + EPS).contains(&s.wave2),
                        "{pattern} wave2 {} at ({col},{row},{time})",
                        s.wave2
                    );
                }
            }
        }
    }
}

#[test]
fn random_pattern_is_a_pure_function() {
    let a = wave_at(WavePattern::Random, 17, 9, 64, 36, 3.25);
    let b = wave_at(WavePattern::Random, 17, 9, 64, 36, 3.25);
    assert_eq!(a, b);

    let seed: f64 = 17.0 * 12.9898 + 9.0 * 78.233;
    let expected = ((seed + 6.5).sin() * 0.5 + 0.5) * 0.6 + 0.2;
    assert!((a.wave - expected).abs() < EPS);
}

#[test]
fn radial_is_symmetric_about_grid_center() {
    let left = wave_at(WavePattern::Radial, 30, 18, 64, 36, 0.7);
    let right = wave_at(WavePattern::Radial, 34, 18, 64, 36, 0.7);
    assert!((left.wave - right.wave).abs() < EPS);
    assert!((left.wave2 - right.wave2).abs() < EPS);

    let center = wave_at(WavePattern::Radial, 32, 18, 64, 36, 0.0);
    assert!((center.wave - 0.5).abs() < EPS);
    assert!((center.wave2 - 0.7).abs() < EPS);
}

#[test]
fn horizontal_ignores_row_and_vertical_ignores_column() {
    let a = wave_at(WavePattern::Horizontal, 5, 0, 10, 10, 1.0);
    let b = wave_at(WavePattern::Horizontal, 5, 9, 10, 10, 1.0);
    assert_eq!(a, b);

    let a = wave_at(WavePattern::Vertical, 0, 5, 10, 10, 1.0);
    let b = wave_at(WavePattern::Vertical, 9, 5, 10, 10, 1.0);
    assert_eq!(a, b);
}

#[test]
fn unknown_selector_falls_back_to_radial() {
    assert_eq!(WavePattern::from_name("spiral"), WavePattern::Radial);
    assert_eq!(WavePattern::from_name(""), WavePattern::Radial);
    assert_eq!(WavePattern::from_name(" Random "), WavePattern::Random);
    for p in WavePattern::ALL {
        assert_eq!(WavePattern::from_name(p.name()), p);
    }
}
