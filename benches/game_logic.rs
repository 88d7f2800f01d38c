use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_board::core::{Board, FrozenGrid, PieceGenerator, Randomizer};
use tetris_board::term::{FrameBuffer, GameView, Viewport};
use tetris_board::types::{Color, Command, MoveDirection, RotateDirection};
use tetris_board::Session;

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut grid = FrozenGrid::new();
            for y in 16..20 {
                for x in 0..10 {
                    grid.set(x, y, Some(Color::Cyan));
                }
            }
            black_box(grid.clear_full_rows());
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut board = Board::new(12345);

    c.bench_function("move_piece", |b| {
        b.iter(|| {
            board.move_piece(black_box(MoveDirection::Right));
            board.move_piece(black_box(MoveDirection::Left));
            board.drain_events().for_each(drop);
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut board = Board::new(12345);

    c.bench_function("rotate", |b| {
        b.iter(|| {
            board.rotate(black_box(RotateDirection::Clockwise));
            board.drain_events().for_each(drop);
        })
    });
}

fn bench_drop_until_game_over(c: &mut Criterion) {
    c.bench_function("drop_until_game_over", |b| {
        b.iter(|| {
            let mut board = Board::with_generator(PieceGenerator::new(7, Randomizer::Bag));
            while !board.is_game_over() {
                board.apply(Command::Drop);
                board.drain_events().for_each(drop);
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let board = Board::new(12345);
    let session: Session<Vec<u8>> = Session::new(board, None).unwrap();
    let snap = session.snapshot();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(80, 24);

    c.bench_function("render_frame", |b| {
        b.iter(|| {
            view.render_into(black_box(&snap), Viewport::new(80, 24), &mut fb);
        })
    });
}

criterion_group!(
    benches,
    bench_line_clear,
    bench_move,
    bench_rotate,
    bench_drop_until_game_over,
    bench_render
);
criterion_main!(benches);
