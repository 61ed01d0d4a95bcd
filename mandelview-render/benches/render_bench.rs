use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use mandelview_core::{Complex, EscapeParams, Mandelbrot, PixelMapper};
use mandelview_render::{render, ColorMode, Palette, RenderCancel};

fn bench_full_frame_render(c: &mut Criterion) {
    let mandelbrot = Mandelbrot::default();
    let mapper = PixelMapper::with_size(640, 480);
    let cancel = Arc::new(RenderCancel::new());

    c.bench_function("full_frame_640x480", |b| {
        b.iter(|| render(&mandelbrot, &mapper, ColorMode::Palette, &cancel));
    });
}

fn bench_iteration_throughput(c: &mut Criterion) {
    let params = EscapeParams::new(1000, 2.0).unwrap();
    let mandelbrot = Mandelbrot::new(params);
    let mapper =
        PixelMapper::new(256, 256, Complex::new(-1.0, 0.5), Complex::new(0.0, -0.5)).unwrap();
    let cancel = Arc::new(RenderCancel::new());

    c.bench_function("render_256x256_1000iter", |b| {
        b.iter(|| render(&mandelbrot, &mapper, ColorMode::Palette, &cancel));
    });
}

fn bench_inside_outside(c: &mut Criterion) {
    let mandelbrot = Mandelbrot::default();
    let mapper = PixelMapper::with_size(640, 480);
    let cancel = Arc::new(RenderCancel::new());

    c.bench_function("inside_outside_640x480", |b| {
        b.iter(|| render(&mandelbrot, &mapper, ColorMode::InsideOutside, &cancel));
    });
}

fn bench_colorize(c: &mut Criterion) {
    let mandelbrot = Mandelbrot::default();
    let mapper = PixelMapper::with_size(640, 480);
    let cancel = Arc::new(RenderCancel::new());
    let result = render(&mandelbrot, &mapper, ColorMode::Palette, &cancel);
    let palette = Palette::default();

    c.bench_function("colorize_640x480", |b| {
        b.iter(|| palette.colorize(&result.iterations));
    });
}

criterion_group!(
    benches,
    bench_full_frame_render,
    bench_iteration_throughput,
    bench_inside_outside,
    bench_colorize
);
criterion_main!(benches);
