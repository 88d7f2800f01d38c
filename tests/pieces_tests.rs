//! Pieces module tests - shape tables and candidate transforms

use tetris_board::core::pieces::{get_shape, Piece, SPAWN_POSITION};
use tetris_board::types::{Color, MoveDirection, PieceKind, RotateDirection, Rotation};

const ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(
        get_shape(PieceKind::I, Rotation::North),
        [(0, 1), (1, 1), (2, 1), (3, 1)]
    );
    assert_eq!(
        get_shape(PieceKind::I, Rotation::East),
        [(2, 0), (2, 1), (2, 2), (2, 3)]
    );
    assert_eq!(
        get_shape(PieceKind::I, Rotation::South),
        [(0, 2), (1, 2), (2, 2), (3, 2)]
    );
    assert_eq!(
        get_shape(PieceKind::I, Rotation::West),
        [(1, 0), (1, 1), (1, 2), (1, 3)]
    );
}

#[test]
fn test_o_piece_same_in_every_rotation() {
    let north = get_shape(PieceKind::O, Rotation::North);
    assert_eq!(north, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    for rotation in ROTATIONS {
        assert_eq!(get_shape(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_s_and_z_are_mirrors() {
    let s = get_shape(PieceKind::S, Rotation::North);
    let z = get_shape(PieceKind::Z, Rotation::North);
    let mirrored: Vec<(i8, i8)> = z.iter().map(|&(x, y)| (2 - x, y)).collect();
    for cell in s {
        assert!(mirrored.contains(&cell));
    }
}

#[test]
fn test_every_shape_has_four_distinct_minos_in_box() {
    for kind in PieceKind::ALL {
        for rotation in ROTATIONS {
            let shape = get_shape(kind, rotation);
            for (i, a) in shape.iter().enumerate() {
                assert!((0..4).contains(&a.0) && (0..4).contains(&a.1));
                for b in &shape[i + 1..] {
                    assert_ne!(a, b, "{:?} {:?} repeats a mino", kind, rotation);
                }
            }
        }
    }
}

// ============== Piece Tests ==============

#[test]
fn test_spawn_position_and_color() {
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind);
        assert_eq!((piece.x, piece.y), SPAWN_POSITION);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.color(), kind.color());
    }
    assert_eq!(Piece::spawn(PieceKind::I).color(), Color::Cyan);
}

#[test]
fn test_four_rotations_return_to_start() {
    for kind in PieceKind::ALL {
        for direction in [RotateDirection::Clockwise, RotateDirection::CounterClockwise] {
            let start = Piece::spawn(kind);
            let mut piece = start;
            for _ in 0..4 {
                piece = piece.rotated(direction);
            }
            assert_eq!(piece, start);
            assert_eq!(piece.cells(), start.cells());
        }
    }
}

#[test]
fn test_cw_then_ccw_is_identity() {
    let piece = Piece::new(PieceKind::J, Rotation::South, 4, 7);
    let back = piece
        .rotated(RotateDirection::Clockwise)
        .rotated(RotateDirection::CounterClockwise);
    assert_eq!(back, piece);
}

#[test]
fn test_moves_shift_every_cell() {
    let piece = Piece::spawn(PieceKind::S);
    for direction in [MoveDirection::Left, MoveDirection::Right, MoveDirection::Down] {
        let (dx, dy) = direction.delta();
        let moved = piece.moved(direction);
        for (a, b) in piece.cells().iter().zip(moved.cells()) {
            assert_eq!((a.0 + dx, a.1 + dy), b);
        }
    }
}

#[test]
fn test_candidates_may_leave_the_field() {
    let piece = Piece::new(PieceKind::I, Rotation::West, -1, 0);
    assert!(piece.cells().iter().all(|&(x, _)| x == 0));

    let outside = piece.shifted(-1, 0);
    assert!(outside.cells().iter().all(|&(x, _)| x == -1));
}
