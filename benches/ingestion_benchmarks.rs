//! Ingestion and export benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use trackset::soccernet::TrackletRole;
use trackset::{ExportFormat, Prediction, ResultExporter, Source, TrackingSetBuilder};

const DESCRIPTORS: [&str; 5] = [
    "player team left;10",
    "goalkeepers team right;1",
    "referee;main",
    "ball;1",
    "other;staff",
];

/// Write `videos` synthetic video folders with `frames` frames and one
/// detection per tracklet per frame.
fn create_split(root: &Path, videos: usize, frames: u64) {
    for v in 0..videos {
        let folder = root.join(format!("SNMOT-{:03}", v));
        fs::create_dir_all(folder.join("gt")).expect("create video folder");
        fs::write(
            folder.join("seqinfo.ini"),
            format!("[Sequence]\nseqLength={}\nframeRate=25\n", frames),
        )
        .expect("write seqinfo");

        let mut game = format!(
            "[Sequence]\nname=SNMOT-{:03}\nnum_tracklets={}\n",
            v,
            DESCRIPTORS.len()
        );
        for (i, descriptor) in DESCRIPTORS.iter().enumerate() {
            game.push_str(&format!("trackletID_{}= {}\n", i + 1, descriptor));
        }
        fs::write(folder.join("gameinfo.ini"), game).expect("write gameinfo");

        let mut gt = String::new();
        for frame in 1..=frames {
            for track in 1..=DESCRIPTORS.len() {
                let x = (track * 100) as u64 + frame;
                gt.push_str(&format!("{},{},{},200,40,120,1,-1,-1,-1\n", frame, track, x));
            }
        }
        fs::write(folder.join("gt").join("gt.txt"), gt).expect("write gt");
    }
}

fn benchmark_role_resolution(c: &mut Criterion) {
    c.bench_function("resolve_5_roles", |b| {
        b.iter(|| {
            for (i, descriptor) in DESCRIPTORS.iter().enumerate() {
                black_box(TrackletRole::resolve(i as u32 + 1, black_box(descriptor)).ok());
            }
        })
    });
}

fn benchmark_build_split(c: &mut Criterion) {
    let dir = TempDir::new().expect("temp dir");
    create_split(dir.path(), 10, 250);
    let builder = TrackingSetBuilder::default();

    c.bench_function("build_10_videos_250_frames", |b| {
        b.iter(|| black_box(builder.build(dir.path()).expect("valid split")))
    });
}

fn benchmark_mot_export(c: &mut Criterion) {
    let dir = TempDir::new().expect("temp dir");
    create_split(&dir.path().join("train"), 10, 250);
    let set = TrackingSetBuilder::default()
        .build(dir.path().join("train"))
        .expect("valid split");
    let predictions = Prediction::from_tracking_set(&set, Source::Tracked).expect("predictions");
    let exporter = ResultExporter::new(dir.path().join("out"));

    c.bench_function("export_mot_10_videos", |b| {
        b.iter(|| black_box(exporter.export(&predictions, ExportFormat::MotBoxes).expect("export")))
    });
}

criterion_group!(
    benches,
    benchmark_role_resolution,
    benchmark_build_split,
    benchmark_mot_export
);
criterion_main!(benches);
