//! 截图流程性能基准测试
//!
//! 测试选择、裁剪和文字排版的性能（不含实际屏幕捕获，因为需要GUI环境）。
//! 运行: `cargo bench --bench capture_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use sc_snip::constants::PARAGRAPH_GAP_THRESHOLD;
use sc_snip::ocr::RecognizedRegion;
use sc_snip::ocr::layout;
use sc_snip::screenshot::{Action, RegionExtractor, SelectionSession, clamp_to_frame};
use sc_snip::translation::{Dictionary, Direction, tokenize};
use sc_snip::types::{Point, ScreenFrame, SelectionRect};

fn frame(width: u32, height: u32) -> ScreenFrame {
    ScreenFrame::now(RgbaImage::from_pixel(width, height, Rgba([40, 80, 120, 255])))
}

/// 测试选择状态机性能
fn bench_selection_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("SelectionSession");

    // 测试拖动过程中的连续移动
    group.bench_function("drag_100_moves", |b| {
        b.iter(|| {
            let (mut session, _rx) = SelectionSession::new(frame(64, 64));
            session.reduce(Action::PointerDown(Point::new(0, 0)));
            for i in 0..100 {
                black_box(session.reduce(Action::PointerMove(Point::new(i % 64, i % 48))));
            }
            session.reduce(Action::PointerUp(Point::new(60, 40)))
        });
    });

    group.bench_function("clamp_to_frame", |b| {
        let rect = SelectionRect::new(-50, 900, 4000, 400);
        b.iter(|| black_box(clamp_to_frame(black_box(rect), 1920, 1080)));
    });

    group.finish();
}

/// 测试区域裁剪性能
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("RegionExtractor");
    let source = frame(1920, 1080);
    let extractor = RegionExtractor::new();

    for size in [64, 256, 1024] {
        group.bench_with_input(BenchmarkId::new("extract", size), &size, |b, &size| {
            let rect = SelectionRect::new(100, 20, size, size);
            b.iter(|| black_box(extractor.extract(&source, rect)));
        });
    }

    group.finish();
}

/// 测试阅读顺序与段落拼接性能
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("Layout");

    for count in [10, 100, 1000] {
        let regions: Vec<RecognizedRegion> = (0..count)
            .rev()
            .map(|i| {
                let top = (i * 17 % 2000) as f32;
                let left = (i % 7) as f32 * 40.0;
                RecognizedRegion::from_box(format!("line {i}"), left, top, 120.0, 14.0, 0.9)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("compose", count), &regions, |b, regions| {
            b.iter(|| black_box(layout::compose(regions.clone(), PARAGRAPH_GAP_THRESHOLD)));
        });
    }

    group.finish();
}

/// 测试词典回退翻译性能
fn bench_dictionary(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dictionary");
    let dictionary = Dictionary::builtin();
    let text = "今天天气真好，谢谢你好电脑图片识别翻译".repeat(20);

    group.bench_function("substitute_forward", |b| {
        b.iter(|| black_box(dictionary.substitute(black_box(&text), Direction::Forward)));
    });

    group.bench_function("tokenize", |b| {
        b.iter(|| black_box(tokenize(black_box(&text))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_selection_session,
    bench_extraction,
    bench_layout,
    bench_dictionary,
);

criterion_main!(benches);
