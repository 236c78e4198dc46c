//! Seeded fabric grain

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sashiko_core::Grain;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Jitter the brightness of every pixel by up to `grain.intensity`.
///
/// The same seed always produces the same noise.
pub fn apply_grain(pixmap: &mut Pixmap, grain: &Grain) {
    let amplitude = (grain.intensity.clamp(0.0, 1.0) * 255.0).round() as i16;
    if amplitude == 0 {
        return;
    }

    let mut rng = StdRng::seed_from_u64(grain.seed);
    for pixel in pixmap.pixels_mut() {
        let delta = rng.gen_range(-amplitude..=amplitude);
        let alpha = pixel.alpha();
        let shift = |c: u8| (i16::from(c) + delta).clamp(0, i16::from(alpha)) as u8;
        if let Some(jittered) = PremultipliedColorU8::from_rgba(
            shift(pixel.red()),
            shift(pixel.green()),
            shift(pixel.blue()),
            alpha,
        ) {
            *pixel = jittered;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Pixmap {
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(128, 128, 128, 255));
        pixmap
    }

    #[test]
    fn test_same_seed_same_noise() {
        let mut a = grey();
        let mut b = grey();
        apply_grain(&mut a, &Grain::new(42));
        apply_grain(&mut b, &Grain::new(42));
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_different_seed_different_noise() {
        let mut a = grey();
        let mut b = grey();
        apply_grain(&mut a, &Grain::new(1));
        apply_grain(&mut b, &Grain::new(2));
        assert_ne!(a.data(), b.data());
    }

    #[test]
    fn test_zero_intensity_is_noop() {
        let mut a = grey();
        apply_grain(
            &mut a,
            &Grain {
                seed: 9,
                intensity: 0.0,
            },
        );
        assert_eq!(a.data(), grey().data());
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let mut a = grey();
        let grain = Grain::new(5);
        apply_grain(&mut a, &grain);
        let amplitude = (grain.intensity * 255.0).round() as i16;
        for pixel in a.pixels() {
            assert!((i16::from(pixel.red()) - 128).abs() <= amplitude);
            assert_eq!(pixel.alpha(), 255);
        }
    }
}
