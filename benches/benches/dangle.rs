// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_dangle::{Dangle, DangleOptions, Easing, PollingHost, Sample, VelocitySampler};

fn carousel() -> Dangle<PollingHost> {
    let options = DangleOptions {
        stretch: 320.0,
        max_step: 64,
        dangling_duration: 300.0,
        dangling_easing: Easing::EaseOutCubic,
        ..DangleOptions::default()
    };
    let mut dangle = Dangle::new(PollingHost::new(), options).unwrap();
    dangle.subscribe_value_changed(|c| {
        black_box(c);
    });
    dangle.subscribe_step_changed(|c| {
        black_box(c);
    });
    dangle
}

/// Press, promote, then drag `moves` times in 4 px / 8 ms increments.
fn drag(dangle: &mut Dangle<PollingHost>, moves: u32) -> f64 {
    let mut x = 10_000.0;
    let mut now = 0.0;
    dangle.press(&Point::new(x, 0.0));
    x -= 12.0;
    dangle.pointer_move(&Point::new(x, 0.0), now);
    for _ in 0..moves {
        x -= 4.0;
        now += 8.0;
        dangle.pointer_move(&Point::new(x, 1.0), now);
    }
    now
}

fn bench_dangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_dangle");

    for &moves in &[16_u32, 256_u32] {
        group.bench_function(format!("hold_drag(moves={moves})"), |b| {
            b.iter_batched(
                carousel,
                |mut dangle| {
                    drag(&mut dangle, moves);
                    black_box(dangle.normalized_value());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("drag_release_settle(moves={moves})"), |b| {
            b.iter_batched(
                carousel,
                |mut dangle| {
                    let mut now = drag(&mut dangle, moves);
                    dangle.release(now);
                    while let Some(frame) = dangle.host_mut().take_frame() {
                        now += 16.0;
                        dangle.frame(frame, now);
                    }
                    black_box(dangle.step());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("velocity_proxy_full_buffer", |b| {
        let mut sampler = VelocitySampler::new();
        for i in 0..32 {
            sampler.push(Sample {
                timestamp: f64::from(i) * 8.0,
                displacement: f64::from(i),
            });
        }
        b.iter(|| black_box(sampler.velocity_proxy(black_box(250.0))));
    });

    group.finish();
}

criterion_group!(benches, bench_dangle);
criterion_main!(benches);
