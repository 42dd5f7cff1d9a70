use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xo_game::{best_move, Board, Mark};

fn bench_empty_board() {
    let board = Board::new();
    black_box(best_move(&board, Mark::X, true));
}

fn bench_mid_game() {
    let board: Board = "X...O...X".parse().expect("bench board");
    black_box(best_move(&board, Mark::O, false));
}

fn bench_self_play() {
    let mut board = Board::new();
    let mut mark = Mark::X;
    while !board.evaluate().is_decided() {
        let Some(index) = best_move(&board, mark, mark == Mark::X).index else {
            break;
        };
        board = board.with_mark(index, mark);
        mark = mark.opponent();
    }
    black_box(board);
}

fn minimax_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");
    group.sample_size(10);

    group.bench_function("empty_board", |b| b.iter(bench_empty_board));
    group.bench_function("mid_game", |b| b.iter(bench_mid_game));
    group.bench_function("self_play", |b| b.iter(bench_self_play));

    group.finish();
}

criterion_group!(benches, minimax_bench);
criterion_main!(benches);
