use crate::board::Board;
use crate::fen;
use crate::position::Position;
use crate::r#move::{MoveFlags, MoveRecord};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize Board as its board-field string
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&fen::encode_board_field(self))
    }
}

/// Deserialize Board from a board-field string. Pieces come back unmoved.
impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        fen::decode(&text).map_err(serde::de::Error::custom)
    }
}

/// Serialize Position as an algebraic square
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_algebraic())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Position::from_algebraic(&text).map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct MoveRecordRepr {
    piece_type: crate::pieces::PieceType,
    color: crate::color::Color,
    src: Position,
    dst: Position,
    flags: u8,
}

impl Serialize for MoveRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MoveRecordRepr {
            piece_type: self.piece_type,
            color: self.color,
            src: self.src,
            dst: self.dst,
            flags: self.flags.bits(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MoveRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = MoveRecordRepr::deserialize(deserializer)?;
        let flags = MoveFlags::from_bits(repr.flags)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown move flags {}", repr.flags)))?;
        Ok(MoveRecord::new(repr.piece_type, repr.color, repr.src, repr.dst).with_flags(flags))
    }
}
