use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use delvesweeper_core::*;
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for board_size in BoardSize::ALL {
        let settings = GameSettings {
            board_size,
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let Ok(config) = settings.board_config() else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{board_size:?}")),
            &config,
            |b, config| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed = seed.wrapping_add(1);
                    black_box(UrnGenerator::new(seed).generate(config))
                })
            },
        );
    }
    group.finish();
}

fn bench_opening(c: &mut Criterion) {
    let settings = GameSettings::default();
    let Ok(config) = settings.board_config() else {
        return;
    };
    let Ok(board) = UrnGenerator::new(1).generate(&config) else {
        return;
    };

    c.bench_function("safe_start_cascade", |b| {
        b.iter(|| {
            let mut engine = PlayEngine::new(
                board.clone(),
                Player::new(PlayerClass::Warrior),
                EngineOptions::default(),
                7,
            );
            engine.open_safe_start();
            black_box(engine.run_cascade())
        })
    });
}

criterion_group!(benches, bench_generate, bench_opening);
criterion_main!(benches);
