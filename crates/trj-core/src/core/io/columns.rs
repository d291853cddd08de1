use super::error::ParseError;
use crate::engine::config::ColumnLayout;
use phf::{Map, phf_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Id,
    Type,
    X,
    Y,
    Z,
}

impl Column {
    fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Type => "type",
            Column::X => "x",
            Column::Y => "y",
            Column::Z => "z",
        }
    }
}

// Lower rank wins when several spellings of one axis are present; scaled (fractional)
// coordinates are preferred over unscaled ones.
#[rustfmt::skip]
static COLUMN_ALIASES: Map<&'static str, (Column, u8)> = phf_map! {
    "id"   => (Column::Id, 0),
    "type" => (Column::Type, 0),
    "xs" => (Column::X, 0), "xsu" => (Column::X, 1), "x" => (Column::X, 2), "xu" => (Column::X, 3),
    "ys" => (Column::Y, 0), "ysu" => (Column::Y, 1), "y" => (Column::Y, 2), "yu" => (Column::Y, 3),
    "zs" => (Column::Z, 0), "zsu" => (Column::Z, 1), "z" => (Column::Z, 2), "zu" => (Column::Z, 3),
};

/// Ranks below this are scaled spellings (`xs`, `xsu`).
const FIRST_UNSCALED_RANK: u8 = 2;

/// Field positions of the five columns an atom record is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub id: usize,
    pub atom_type: usize,
    pub x: usize,
    pub y: usize,
    pub z: usize,
    /// Per axis, whether the column already holds fractional coordinates. Unscaled
    /// values are box-relative only after dividing by the frame's extent.
    pub scaled: [bool; 3],
}

impl ColumnMap {
    pub const FIXED: ColumnMap = ColumnMap {
        id: 0,
        atom_type: 1,
        x: 2,
        y: 3,
        z: 4,
        scaled: [true; 3],
    };

    pub fn resolve(layout: ColumnLayout, header: &[String]) -> Result<Self, ParseError> {
        match layout {
            ColumnLayout::Fixed => Ok(Self::FIXED),
            ColumnLayout::Header => Self::from_header(header),
        }
    }

    fn from_header(header: &[String]) -> Result<Self, ParseError> {
        let find = |wanted: Column| -> Result<(usize, u8), ParseError> {
            header
                .iter()
                .enumerate()
                .filter_map(|(pos, name)| match COLUMN_ALIASES.get(name.as_str()) {
                    Some(&(column, rank)) if column == wanted => Some((rank, pos)),
                    _ => None,
                })
                .min()
                .map(|(rank, pos)| (pos, rank))
                .ok_or(ParseError::MissingColumn {
                    column: wanted.name(),
                })
        };
        let (id, _) = find(Column::Id)?;
        let (atom_type, _) = find(Column::Type)?;
        let (x, x_rank) = find(Column::X)?;
        let (y, y_rank) = find(Column::Y)?;
        let (z, z_rank) = find(Column::Z)?;
        Ok(Self {
            id,
            atom_type,
            x,
            y,
            z,
            scaled: [x_rank, y_rank, z_rank].map(|rank| rank < FIRST_UNSCALED_RANK),
        })
    }

    pub fn all_scaled(&self) -> bool {
        self.scaled.iter().all(|&s| s)
    }

    /// The number of fields a line needs for every mapped column to exist.
    pub fn min_fields(&self) -> usize {
        [self.id, self.atom_type, self.x, self.y, self.z]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}
