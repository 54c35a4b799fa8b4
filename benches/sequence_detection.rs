use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opencv::core::Rect;
use wire_sequence::{
    detection::{EdgeSegment, WirePairing},
    config::PairingConfig,
    detect_sequence, Bgr, ExpectedSequence, InspectionMode, Inspector, RasterImage,
};

const WIRES: [Bgr; 4] = [
    Bgr::new(0, 0, 255),
    Bgr::new(0, 255, 0),
    Bgr::new(255, 0, 0),
    Bgr::new(0, 200, 200),
];

fn connector_scene() -> RasterImage {
    let mut image = RasterImage::filled(640, 480, [255, 255, 255])
        .unwrap()
        .with_filled_rect(Rect::new(150, 300, 340, 110), [30, 30, 30])
        .unwrap();
    for (i, c) in WIRES.iter().enumerate() {
        let rect = Rect::new(200 + 36 * i as i32, 0, 16, 300);
        image = image.with_filled_rect(rect, (*c).into()).unwrap();
    }
    image
}

fn benchmark_detection(c: &mut Criterion) {
    let image = connector_scene();
    c.bench_function("detect_sequence_640x480", |b| {
        b.iter(|| detect_sequence(black_box(&image)).unwrap())
    });

    let inspector = Inspector::new();
    let images = [connector_scene()];
    let expected = [ExpectedSequence::from_colors(WIRES.to_vec())];
    c.bench_function("inspect_single_sided", |b| {
        b.iter(|| {
            inspector
                .inspect(InspectionMode::SingleSided, black_box(&images), &expected)
                .unwrap()
        })
    });
}

fn benchmark_pairing(c: &mut Criterion) {
    let config = PairingConfig::default();
    let segments: Vec<EdgeSegment> = (0..500).map(|k| EdgeSegment::new(3 + k * 9, 4 + k * 9)).collect();
    c.bench_function("pair_500_segments", |b| {
        b.iter(|| WirePairing::new(&config).pair(black_box(&segments)))
    });
}

criterion_group!(benches, benchmark_detection, benchmark_pairing);
criterion_main!(benches);
