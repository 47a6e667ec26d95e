use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// One of the four independent tagging axes (equipment, body part, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Dimension(u8);

impl Dimension {
    pub const COUNT: usize = 4;

    pub const ALL: [Dimension; Self::COUNT] = [Dimension(1), Dimension(2), Dimension(3), Dimension(4)];

    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::COUNT as u8)
            .contains(&number)
            .then_some(Dimension(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Zero-based slot in per-dimension arrays.
    pub fn index(&self) -> usize {
        usize::from(self.0) - 1
    }
}

impl TryFrom<u8> for Dimension {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dimension::new(value).ok_or_else(|| format!("dimension must be 1-4, got {}", value))
    }
}

impl From<Dimension> for u8 {
    fn from(value: Dimension) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub dimension: Dimension,
    pub name: String,
}

impl FromSqliteRow for Category {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let number: u8 = row.get("dimension")?;
        let dimension = Dimension::new(number).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Integer,
                format!("invalid dimension {}", number).into(),
            )
        })?;
        Ok(Self {
            id: row.get("id")?,
            dimension,
            name: row.get("name")?,
        })
    }
}
