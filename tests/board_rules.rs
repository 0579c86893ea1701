use stonebot::board::{Board, Outcome, Player, WinRule, BOARD_SIZE};

fn board_with(stones: &[(usize, usize, Player)]) -> Board {
    let mut b = Board::new();
    for &(r, c, p) in stones {
        b.place(r, c, p).unwrap();
    }
    b
}

#[test]
fn five_in_a_row_through_last_move_wins() {
    let b = board_with(&[
        (7, 2, Player::Black),
        (7, 3, Player::Black),
        (7, 4, Player::Black),
        (7, 5, Player::Black),
        (7, 6, Player::Black),
    ]);
    assert_eq!(
        b.terminal_after(7, 6, WinRule::FiveOrMore),
        Outcome::Win(Player::Black)
    );
    // Any stone of the run sees the same win.
    assert_eq!(
        b.terminal_after(7, 4, WinRule::FiveOrMore),
        Outcome::Win(Player::Black)
    );
}

#[test]
fn four_in_a_row_is_ongoing() {
    let b = board_with(&[
        (7, 3, Player::Black),
        (7, 4, Player::Black),
        (7, 5, Player::Black),
        (7, 6, Player::Black),
    ]);
    assert_eq!(b.terminal_after(7, 6, WinRule::FiveOrMore), Outcome::Ongoing);
}

#[test]
fn diagonal_and_vertical_wins_detected() {
    let diag = board_with(&[
        (3, 3, Player::White),
        (4, 4, Player::White),
        (5, 5, Player::White),
        (6, 6, Player::White),
        (7, 7, Player::White),
    ]);
    assert_eq!(
        diag.terminal_after(5, 5, WinRule::FiveOrMore),
        Outcome::Win(Player::White)
    );

    let vert = board_with(&[
        (2, 9, Player::Black),
        (3, 9, Player::Black),
        (4, 9, Player::Black),
        (5, 9, Player::Black),
        (6, 9, Player::Black),
    ]);
    assert_eq!(
        vert.terminal_after(6, 9, WinRule::FiveOrMore),
        Outcome::Win(Player::Black)
    );

    let anti = board_with(&[
        (10, 2, Player::White),
        (9, 3, Player::White),
        (8, 4, Player::White),
        (7, 5, Player::White),
        (6, 6, Player::White),
    ]);
    assert_eq!(
        anti.terminal_after(8, 4, WinRule::FiveOrMore),
        Outcome::Win(Player::White)
    );
}

#[test]
fn overline_counts_inclusive_but_not_exact_five() {
    // Six contiguous Black stones.
    let b = board_with(&[
        (7, 2, Player::Black),
        (7, 3, Player::Black),
        (7, 4, Player::Black),
        (7, 5, Player::Black),
        (7, 6, Player::Black),
        (7, 7, Player::Black),
    ]);
    assert_eq!(
        b.terminal_after(7, 7, WinRule::FiveOrMore),
        Outcome::Win(Player::Black)
    );
    assert_eq!(b.terminal_after(7, 7, WinRule::ExactlyFive), Outcome::Ongoing);
    assert_eq!(b.scan_winner(WinRule::FiveOrMore), Some(Player::Black));
    assert_eq!(b.scan_winner(WinRule::ExactlyFive), None);
}

/// Full board with no five anywhere: color = (col/2 + row) parity keeps
/// every run at length <= 2 in all four directions.
fn full_drawn_grid() -> Vec<Vec<u8>> {
    (0..BOARD_SIZE)
        .map(|r| {
            (0..BOARD_SIZE)
                .map(|c| 1 + ((c / 2 + r) % 2) as u8)
                .collect()
        })
        .collect()
}

#[test]
fn full_board_without_five_is_a_draw_never_ongoing() {
    let board = Board::from_grid(&full_drawn_grid()).unwrap();
    assert!(board.is_full());
    assert_eq!(board.scan_winner(WinRule::FiveOrMore), None);
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            assert_eq!(
                board.terminal_after(row, col, WinRule::FiveOrMore),
                Outcome::Draw,
                "full board reported Ongoing at ({row}, {col})"
            );
        }
    }
}

#[test]
fn from_grid_rejects_wrong_dimensions() {
    let short = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE - 1];
    assert!(Board::from_grid(&short).is_err());

    let mut ragged = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    ragged[3].pop();
    assert!(Board::from_grid(&ragged).is_err());
}

#[test]
fn from_grid_round_trips_stone_count() {
    let mut grid = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    grid[7][7] = 1;
    grid[7][8] = 2;
    grid[0][14] = 1;
    let board = Board::from_grid(&grid).unwrap();
    assert_eq!(board.stone_count(), 3);
    assert_eq!(board.get(7, 7).player(), Some(Player::Black));
    assert_eq!(board.get(7, 8).player(), Some(Player::White));
}
