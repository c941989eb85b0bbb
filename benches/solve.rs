use criterion::{BenchmarkId, Criterion, SamplingMode, criterion_group, criterion_main};
use pushbox::{Algorithm, Board, solve};
use std::hint::black_box;

const PUZZLES: &[(&str, &str, usize, SamplingMode)] = &[
    ("corridor", "#######\n#@$  .#\n#######", 100, SamplingMode::Auto),
    (
        "two_boxes",
        "######\n\
         #@$  #\n\
         # $. #\n\
         # .  #\n\
         ######",
        100,
        SamplingMode::Auto,
    ),
    (
        "pair",
        "######\n\
         #    #\n\
         # $$ #\n\
         # .. #\n\
         #  @ #\n\
         ######",
        50,
        SamplingMode::Auto,
    ),
    (
        "room",
        "########\n\
         # @$  .#\n\
         # $  $ #\n\
         # .# $ #\n\
         #..#   #\n\
         ########",
        10,
        SamplingMode::Flat,
    ),
];

const ALGORITHMS: [(&str, Algorithm); 3] = [
    ("breadth_first", Algorithm::BreadthFirst),
    ("manhattan", Algorithm::Manhattan),
    ("deadlock", Algorithm::Deadlock),
];

pub fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for &(puzzle_name, puzzle, sample_size, sample_mode) in PUZZLES {
        let board = Board::from_text(puzzle).unwrap();
        group.sample_size(sample_size);
        group.sampling_mode(sample_mode);

        for (algorithm_name, algorithm) in ALGORITHMS {
            // Breadth-first blows up on the larger rooms
            if algorithm == Algorithm::BreadthFirst && sample_size < 50 {
                continue;
            }
            group.bench_with_input(
                BenchmarkId::new(algorithm_name, puzzle_name),
                &board,
                |b, board| b.iter(|| solve(black_box(board), algorithm)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
