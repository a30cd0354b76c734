use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tintmatch::lowlevel::correlate_channels;
use tintmatch::{correlate, Image, ALPHA_GATE};

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> Image {
    let pixels = (0..width * height)
        .map(|_| {
            [
                rng.random_range(0..=255),
                rng.random_range(0..=255),
                rng.random_range(0..=255),
                255,
            ]
        })
        .collect();
    Image::from_pixels(pixels, width, height).unwrap()
}

fn with_alpha(img: &Image, alpha: &[u8]) -> Image {
    let pixels = img
        .pixels()
        .iter()
        .zip(alpha)
        .map(|(px, &a)| [px[0], px[1], px[2], a])
        .collect();
    Image::from_pixels(pixels, img.width(), img.height()).unwrap()
}

#[test]
fn self_correlation_is_one() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let img = random_image(&mut rng, 9, 7);
        let score = correlate(img.sample(), img.sample());
        assert!((score - 1.0).abs() < 1e-5, "score {score}");
    }
}

#[test]
fn dimension_mismatch_is_not_comparable() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = random_image(&mut rng, 4, 6);
    let b = random_image(&mut rng, 6, 4);
    assert_eq!(correlate(a.sample(), b.sample()), 0.0);
    assert!(correlate_channels(a.sample(), b.sample()).is_none());
}

#[test]
fn value_correlation_ignores_hue_and_brightness_scale() {
    // Same value pattern, different hue and a global brightness scale.
    let values = [40u8, 90, 160, 220, 10, 130];
    let red: Vec<[u8; 4]> = values.iter().map(|&v| [v, 0, 0, 255]).collect();
    let blue: Vec<[u8; 4]> = values.iter().map(|&v| [0, 0, v / 2, 255]).collect();
    let red = Image::from_pixels(red, 3, 2).unwrap();
    let blue = Image::from_pixels(blue, 3, 2).unwrap();
    let score = correlate(red.sample(), blue.sample());
    assert!(score > 0.999, "score {score}");
}

#[test]
fn alpha_mismatch_forces_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    let img = random_image(&mut rng, 3, 2);
    let masked = with_alpha(&img, &[255, 0, 255, 0, 255, 0]);
    let other_mask = with_alpha(&img, &[0, 255, 0, 255, 0, 255]);

    let channels = correlate_channels(masked.sample(), other_mask.sample()).unwrap();
    assert!((channels.value - 1.0).abs() < 1e-5);
    assert!(channels.alpha < ALPHA_GATE);
    assert_eq!(correlate(masked.sample(), other_mask.sample()), 0.0);

    // Opaque against masked: one alpha channel is constant.
    assert_eq!(correlate(img.sample(), masked.sample()), 0.0);
    // Identical masks pass the gate.
    assert!((correlate(masked.sample(), masked.sample()) - 1.0).abs() < 1e-5);
}

#[test]
fn anti_correlated_values_score_negative() {
    let values = [10u8, 60, 120, 200];
    let a: Vec<[u8; 4]> = values.iter().map(|&v| [v, v, v, 255]).collect();
    let b: Vec<[u8; 4]> = values.iter().map(|&v| [255 - v, 255 - v, 255 - v, 255]).collect();
    let a = Image::from_pixels(a, 2, 2).unwrap();
    let b = Image::from_pixels(b, 2, 2).unwrap();
    let score = correlate(a.sample(), b.sample());
    assert!((score + 1.0).abs() < 1e-5);
}

#[test]
fn solid_images_compare_by_value() {
    let red = Image::filled(2, 2, [204, 0, 0, 255]).unwrap();
    let blue = Image::filled(2, 2, [0, 0, 204, 255]).unwrap();
    let darker = Image::filled(2, 2, [100, 0, 0, 255]).unwrap();
    assert_eq!(correlate(red.sample(), blue.sample()), 1.0);
    assert_eq!(correlate(red.sample(), darker.sample()), 0.0);
}
