use crate::board::Board;
use crate::error::FenError;
use crate::pieces::Piece;
use crate::position::{BOARD_SIZE, Position};

pub const STATUS_TAIL: &str = " w KQkq - 0 1";

pub fn encode(board: &Board) -> String {
    let mut fen = encode_board_field(board);
    fen.push_str(STATUS_TAIL);
    fen
}

/// Ranks from row 0 (rank 8) down to row 7, joined by `/`. Runs of empty squares become a digit.
pub fn encode_board_field(board: &Board) -> String {
    let mut fen = String::new();

    for row in 0..BOARD_SIZE {
        let mut empty_count = 0;

        for col in 0..BOARD_SIZE {
            if let Some(piece) = board.get_piece(&Position::new(row, col)) {
                if empty_count > 0 {
                    fen.push_str(&empty_count.to_string());
                    empty_count = 0;
                }
                fen.push(piece.to_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            fen.push_str(&empty_count.to_string());
        }

        if row < BOARD_SIZE - 1 {
            fen.push('/');
        }
    }

    fen
}

/// Decodes the board field of `fen`. Anything after the first whitespace is ignored, so the
/// output of [`encode`] decodes as well as a bare board field.
///
/// Decoded pieces always carry `has_moved == false`.
pub fn decode(fen: &str) -> Result<Board, FenError> {
    let field = fen.split_whitespace().next().ok_or(FenError::Empty)?;

    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != BOARD_SIZE {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut board = Board::empty();

    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0;

        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                col += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::UnknownPiece(c))?;
                if col >= BOARD_SIZE {
                    return Err(FenError::RankWidth {
                        rank: BOARD_SIZE - row,
                        width: col + 1,
                    });
                }
                board.set_piece(&Position::new(row, col), Some(piece));
                col += 1;
            }
        }

        if col != BOARD_SIZE {
            return Err(FenError::RankWidth {
                rank: BOARD_SIZE - row,
                width: col,
            });
        }
    }

    Ok(board)
}
