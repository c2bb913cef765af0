// seating-chart: desk layout grid

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::AppError;

/// Empty desk: a desk with nobody assigned to it
pub const EMPTY_DESK: &str = "e";
/// No desk at all (hole in the grid)
pub const NO_DESK: &str = "x";

pub fn is_reserved(group: &str) -> bool {
    group == EMPTY_DESK || group == NO_DESK
}

/// 1-indexed grid coordinate, x = column, y = row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

/// Rectangular grid of group symbols, stored row by row
#[derive(Debug, Clone)]
pub struct LayoutGrid {
    cells: Vec<Vec<String>>,
    cols: usize,
}

impl LayoutGrid {
    pub fn new(cells: Vec<Vec<String>>) -> Result<Self, AppError> {
        let cols = cells.first().map(Vec::len).unwrap_or(0);
        if cells.is_empty() || cols == 0 {
            return Err(AppError::MalformedLayout("layout grid is empty".into()));
        }
        if let Some((row, len)) = cells
            .iter()
            .enumerate()
            .map(|(i, r)| (i + 1, r.len()))
            .find(|&(_, len)| len != cols)
        {
            return Err(AppError::MalformedLayout(format!(
                "row {} has {} columns, expected {}",
                row, len, cols
            )));
        }
        for (r, row) in cells.iter().enumerate() {
            if let Some(c) = row.iter().position(|symbol| symbol.is_empty()) {
                return Err(AppError::MalformedLayout(format!(
                    "empty cell at row {}, column {}",
                    r + 1,
                    c + 1
                )));
            }
        }
        Ok(Self { cells, cols })
    }

    /// Read a layout CSV. The header row and first column are positional
    /// indices and only carry shape.
    pub fn from_csv_path(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path)
            .map_err(|e| AppError::LayoutError(format!("{}: {}", path.display(), e)))?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut cells = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| AppError::LayoutError(e.to_string()))?;
            let row: Vec<String> = record.iter().skip(1).map(|s| s.trim().to_string()).collect();
            cells.push(row);
        }
        Self::new(cells)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Coordinates of every symbol, each list in row-major order.
    pub fn coords_by_group(&self) -> BTreeMap<String, Vec<Coord>> {
        let mut groups: BTreeMap<String, Vec<Coord>> = BTreeMap::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, symbol) in row.iter().enumerate() {
                groups.entry(symbol.clone()).or_default().push(Coord {
                    x: c as u32 + 1,
                    y: r as u32 + 1,
                });
            }
        }
        groups
    }

    /// Number of cells per symbol
    pub fn group_counts(&self) -> BTreeMap<String, usize> {
        self.coords_by_group()
            .into_iter()
            .map(|(group, coords)| (group, coords.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    impl LayoutGrid {
        pub(crate) fn get(&self, coord: Coord) -> Option<&str> {
            self.cells
                .get((coord.y as usize).checked_sub(1)?)?
                .get((coord.x as usize).checked_sub(1)?)
                .map(String::as_str)
        }
    }

    fn grid(rows: &[&[&str]]) -> Result<LayoutGrid, AppError> {
        LayoutGrid::new(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn coords_are_row_major() {
        let g = grid(&[&["a", "b", "a"], &["a", "e", "x"]]).unwrap();
        let coords = g.coords_by_group();
        assert_eq!(
            coords["a"],
            vec![
                Coord { x: 1, y: 1 },
                Coord { x: 3, y: 1 },
                Coord { x: 1, y: 2 },
            ]
        );
        assert_eq!(coords["e"], vec![Coord { x: 2, y: 2 }]);
        assert_eq!(coords["x"], vec![Coord { x: 3, y: 2 }]);
        assert_eq!(g.rows(), 2);
        assert_eq!(g.cols(), 3);
    }

    #[test]
    fn get_is_one_indexed() {
        let g = grid(&[&["a", "b"], &["e", "x"]]).unwrap();
        assert_eq!(g.get(Coord { x: 2, y: 1 }), Some("b"));
        assert_eq!(g.get(Coord { x: 1, y: 2 }), Some("e"));
        assert_eq!(g.get(Coord { x: 0, y: 1 }), None);
        assert_eq!(g.get(Coord { x: 3, y: 1 }), None);
    }

    #[test]
    fn empty_grid_is_malformed() {
        assert!(matches!(grid(&[]), Err(AppError::MalformedLayout(_))));
        assert!(matches!(grid(&[&[]]), Err(AppError::MalformedLayout(_))));
    }

    #[test]
    fn ragged_grid_is_malformed() {
        let err = grid(&[&["a", "a"], &["a"]]).unwrap_err();
        assert!(matches!(err, AppError::MalformedLayout(_)));
        assert!(err.to_string().contains("row 2 has 1 columns"));
    }

    #[test]
    fn csv_drops_index_row_and_column() {
        let csv = ",1,2,3\n1,a, b ,e\n2,x,a,b\n";
        let g = LayoutGrid::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(g.rows(), 2);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.get(Coord { x: 2, y: 1 }), Some("b"));
        assert_eq!(g.get(Coord { x: 1, y: 2 }), Some("x"));
        assert_eq!(g.group_counts()["a"], 2);
    }

    #[test]
    fn blank_cell_is_malformed() {
        let err = grid(&[&["a", "a"], &["e", ""]]).unwrap_err();
        assert!(matches!(err, AppError::MalformedLayout(_)));
        assert!(err.to_string().contains("empty cell at row 2, column 2"));

        let csv = ",1,2,3\n1,a,  ,e\n2,x,a,b\n";
        let err = LayoutGrid::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("empty cell at row 1, column 2"));
    }

    #[test]
    fn csv_ragged_rows_are_malformed() {
        let csv = ",1,2\n1,a,a\n2,a\n";
        let err = LayoutGrid::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MalformedLayout(_)));
    }
}
