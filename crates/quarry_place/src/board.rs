//! Board geometry: the heterogeneous cell grid the clusters are placed on.
//!
//! A [`Board`] is a rectangular grid of [`CellType`]s with a forbidden border
//! of `margin` cells, one designated generic (fillable) type, and a per-column
//! lane map giving the dominant type of each column. The lane map lets box
//! sizing skip whole columns of memory or DSP blocks without scanning rows.

use crate::error::{PlaceError, PlaceResult};
use quarry_common::{GridPos, Region};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The type of a board cell or of a block that must sit on one.
///
/// Block identifiers carry their type as their first character, so a type is
/// a single character such as `c` (logic), `m` (memory) or `d` (DSP).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellType(char);

impl CellType {
    /// Creates a cell type from its character tag.
    pub const fn new(tag: char) -> Self {
        Self(tag)
    }

    /// Returns the type a block needs, taken from its identifier's first character.
    pub fn of_block(block_id: &str) -> Option<Self> {
        block_id.chars().next().map(Self)
    }

    /// The character tag.
    pub const fn tag(self) -> char {
        self.0
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for CellType {
    fn from(tag: char) -> Self {
        Self(tag)
    }
}

/// Immutable board geometry for one placement run.
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    margin: i32,
    generic_type: CellType,
    layout: Vec<Vec<CellType>>,
    lanes: Vec<CellType>,
    arch: String,
}

impl Board {
    /// Builds a board from a row-major layout (`layout[y][x]`) and a
    /// precomputed lane map (`lanes[x]`).
    ///
    /// Fails if the layout is empty or ragged, the lane map does not match the
    /// width, or `margin` violates `0 <= margin < min(width, height) / 2`.
    pub fn new(
        layout: Vec<Vec<CellType>>,
        lanes: Vec<CellType>,
        generic_type: CellType,
        margin: i32,
        arch: impl Into<String>,
    ) -> PlaceResult<Self> {
        let height = layout.len();
        let width = layout.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(PlaceError::InvalidBoard("layout is empty".to_string()));
        }
        if let Some(y) = layout.iter().position(|row| row.len() != width) {
            return Err(PlaceError::InvalidBoard(format!(
                "row {y} has {} cells, expected {width}",
                layout[y].len()
            )));
        }
        if lanes.len() != width {
            return Err(PlaceError::InvalidBoard(format!(
                "lane map covers {} columns, board is {width} wide",
                lanes.len()
            )));
        }
        let (width, height) = (width as i32, height as i32);
        if margin < 0 || 2 * margin >= width.min(height) {
            return Err(PlaceError::InvalidBoard(format!(
                "margin {margin} leaves no placeable area on a {width}x{height} board"
            )));
        }
        Ok(Self {
            width,
            height,
            margin,
            generic_type,
            layout,
            lanes,
            arch: arch.into(),
        })
    }

    /// Builds a board and derives its lane map with [`analyze_lanes`].
    pub fn with_analyzed_lanes(
        layout: Vec<Vec<CellType>>,
        generic_type: CellType,
        margin: i32,
        arch: impl Into<String>,
    ) -> PlaceResult<Self> {
        let lanes = analyze_lanes(&layout, margin, generic_type);
        Self::new(layout, lanes, generic_type, margin, arch)
    }

    /// Parses a board from text rows, one character per cell; `rows[y]` is row `y`.
    pub fn from_rows(
        rows: &[&str],
        generic_type: CellType,
        margin: i32,
        arch: impl Into<String>,
    ) -> PlaceResult<Self> {
        let layout = rows
            .iter()
            .map(|row| row.chars().map(CellType::new).collect())
            .collect();
        Self::with_analyzed_lanes(layout, generic_type, margin, arch)
    }

    /// Grid width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Thickness of the forbidden border.
    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// The common, fillable cell type.
    pub fn generic_type(&self) -> CellType {
        self.generic_type
    }

    /// Architecture tag of the device this board models.
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Per-column lane classification.
    pub fn lanes(&self) -> &[CellType] {
        &self.lanes
    }

    /// Lane type of column `x`, or `None` past either board edge.
    pub fn lane(&self, x: i32) -> Option<CellType> {
        usize::try_from(x).ok().and_then(|x| self.lanes.get(x).copied())
    }

    /// Cell type at `pos`, or `None` off the board.
    pub fn cell_type(&self, pos: GridPos) -> Option<CellType> {
        let x = usize::try_from(pos.0).ok()?;
        let y = usize::try_from(pos.1).ok()?;
        self.layout.get(y).and_then(|row| row.get(x)).copied()
    }

    /// The placeable area inside the margin.
    pub fn legal_region(&self) -> Region {
        Region::new(
            self.margin,
            self.margin,
            self.width - self.margin - 1,
            self.height - self.margin - 1,
        )
    }

    /// Whether `pos` lies inside the margin and holds a cell of `cell_type`.
    pub fn is_cell_legal(&self, pos: GridPos, cell_type: CellType) -> bool {
        self.legal_region().contains(pos) && self.cell_type(pos) == Some(cell_type)
    }

    /// Geometric center of the board.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Iterates every cell with its type, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, CellType)> + '_ {
        self.layout.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &t)| ((x as i32, y as i32), t))
        })
    }

    /// Number of cells of `cell_type` anywhere on the board.
    pub fn count_of(&self, cell_type: CellType) -> usize {
        self.cells().filter(|&(_, t)| t == cell_type).count()
    }
}

/// Classifies each column by its most frequent cell type.
///
/// Only rows inside the margin are counted. Ties go to the generic type, then
/// to the lowest type character, so the result is deterministic.
pub fn analyze_lanes(layout: &[Vec<CellType>], margin: i32, generic: CellType) -> Vec<CellType> {
    let width = layout.first().map_or(0, Vec::len);
    let height = layout.len() as i32;
    let rows = margin.max(0)..(height - margin.max(0)).max(margin.max(0));
    (0..width)
        .map(|x| {
            let mut counts: BTreeMap<CellType, usize> = BTreeMap::new();
            for y in rows.clone() {
                if let Some(&t) = layout[y as usize].get(x) {
                    *counts.entry(t).or_default() += 1;
                }
            }
            let best = counts.values().copied().max().unwrap_or(0);
            if counts.get(&generic) == Some(&best) {
                return generic;
            }
            counts
                .into_iter()
                .find(|&(_, n)| n == best)
                .map_or(generic, |(t, _)| t)
        })
        .collect()
}
