use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tintmatch::{extract, recolor, Classifier, ClassifyConfig, Image, TemplateBank};

fn make_image(width: usize, height: usize, seed: usize) -> Image {
    let pixels = (0..width * height)
        .map(|i| {
            let x = i % width;
            let y = i / width;
            let v = ((x * 13 + seed) ^ (y * 7) ^ (x * y)) & 0xFF;
            [v as u8, (v / 2) as u8, 30, 255]
        })
        .collect();
    Image::from_pixels(pixels, width, height).unwrap()
}

fn bench_classify(c: &mut Criterion) {
    let bank = TemplateBank::new(
        (0..16).map(|seed| (format!("tpl{seed}.png"), make_image(64, 64, seed * 9))),
    )
    .unwrap();
    let candidates: Vec<(String, Image)> = (0..32)
        .map(|i| (format!("img{i}.png"), make_image(64, 64, (i % 16) * 9)))
        .collect();

    let classifier = Classifier::new(&bank);
    c.bench_function("classify_32x16_64px", |b| {
        b.iter(|| {
            let result =
                classifier.classify(candidates.iter().map(|(id, img)| (id.as_str(), img)));
            black_box(result);
        })
    });

    let parallel = Classifier::new(&bank).with_config(ClassifyConfig {
        parallel: true,
        ..ClassifyConfig::default()
    });
    c.bench_function("classify_32x16_64px_parallel", |b| {
        b.iter(|| {
            let result = parallel.classify(candidates.iter().map(|(id, img)| (id.as_str(), img)));
            black_box(result);
        })
    });
}

fn bench_recolor(c: &mut Criterion) {
    let source = make_image(128, 128, 5);
    let base = make_image(128, 128, 11);
    let meta = extract("tpl.png", &source, 6).unwrap();

    c.bench_function("extract_128px_6_layers", |b| {
        b.iter(|| black_box(extract("tpl.png", black_box(&source), 6)))
    });
    c.bench_function("recolor_128px_6_layers", |b| {
        b.iter(|| black_box(recolor(black_box(&base), &meta).unwrap()))
    });
}

criterion_group!(benches, bench_classify, bench_recolor);
criterion_main!(benches);
