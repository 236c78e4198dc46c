//! Stitch matrix construction
//!
//! Two bit strings become two boolean grids of shape `height × width`,
//! where `height = bits_h.len()` and `width = bits_v.len()`:
//!
//! - `H[r][c]`: stitch along the top edge of cell `(r, c)`. Row `r` starts
//!   at `bits_h[r]` and toggles at every column.
//! - `V[r][c]`: stitch along the right edge of cell `(r, c)`. Column `c`
//!   starts at `bits_v[c]` and toggles at every row, top to bottom.

use crate::encoder::BitString;
use crate::error::{CoreError, Result};

/// A strictly alternating sequence of length `n` starting at `bit`
pub fn alternating(bit: bool, n: usize) -> Vec<bool> {
    let mut current = bit;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(current);
        current = !current;
    }
    out
}

/// One alternating row per bit, each `width` long
pub fn build_horizontal(bits: &BitString, width: usize) -> Vec<Vec<bool>> {
    bits.bits().map(|bit| alternating(bit, width)).collect()
}

/// One alternating column per bit, each `height` long, laid out row-major
pub fn build_vertical(bits: &BitString, height: usize) -> Vec<Vec<bool>> {
    let columns: Vec<Vec<bool>> = bits.bits().map(|bit| alternating(bit, height)).collect();
    (0..height)
        .map(|r| columns.iter().map(|column| column[r]).collect())
        .collect()
}

/// The pair of stitch grids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchMatrix {
    height: usize,
    width: usize,
    horizontal: Vec<Vec<bool>>,
    vertical: Vec<Vec<bool>>,
}

impl StitchMatrix {
    /// Build both grids. Empty bit strings must be replaced with the
    /// default pattern before calling this.
    pub fn build(bits_h: &BitString, bits_v: &BitString) -> Result<Self> {
        if bits_h.is_empty() {
            return Err(CoreError::InvalidBits(
                "horizontal bit string is empty".to_string(),
            ));
        }
        if bits_v.is_empty() {
            return Err(CoreError::InvalidBits(
                "vertical bit string is empty".to_string(),
            ));
        }

        let height = bits_h.len();
        let width = bits_v.len();

        Ok(Self {
            height,
            width,
            horizontal: build_horizontal(bits_h, width),
            vertical: build_vertical(bits_v, height),
        })
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Stitch on the top edge of `(row, col)`
    pub fn horizontal(&self, row: usize, col: usize) -> bool {
        self.horizontal[row][col]
    }

    /// Stitch on the right edge of `(row, col)`
    pub fn vertical(&self, row: usize, col: usize) -> bool {
        self.vertical[row][col]
    }

    /// Rows of the horizontal grid
    pub fn horizontal_rows(&self) -> &[Vec<bool>] {
        &self.horizontal
    }

    /// Rows of the vertical grid
    pub fn vertical_rows(&self) -> &[Vec<bool>] {
        &self.vertical
    }

    /// Number of stitch segments across both grids
    pub fn stitch_count(&self) -> usize {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .map(|row| row.iter().filter(|on| **on).count())
            .sum()
    }

    /// Plain-text preview of the stitch layout.
    ///
    /// Each cell row becomes two lines: `+--+` marks for horizontal
    /// stitches, then `|` marks on the right edges.
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        for r in 0..self.height {
            for c in 0..self.width {
                out.push('+');
                out.push_str(if self.horizontal(r, c) { "--" } else { "  " });
            }
            out.push_str("+\n ");
            for c in 0..self.width {
                out.push_str("  ");
                out.push(if self.vertical(r, c) { '|' } else { ' ' });
            }
            out.push('\n');
        }
        for _ in 0..self.width {
            out.push_str("+  ");
        }
        out.push_str("+\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_alternating() {
        assert_eq!(alternating(false, 5), vec![false, true, false, true, false]);
        assert_eq!(alternating(true, 3), vec![true, false, true]);
        assert!(alternating(true, 0).is_empty());
        for n in 0..12 {
            let seq = alternating(n % 2 == 0, n);
            assert_eq!(seq.len(), n);
            for pair in seq.windows(2) {
                assert_ne!(pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_build_horizontal_shape() {
        let rows = build_horizontal(&bits("101"), 4);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 4));
        assert!(rows[0][0]);
        assert!(!rows[1][0]);
        assert!(rows[2][0]);
    }

    #[test]
    fn test_build_vertical_shape() {
        let grid = build_vertical(&bits("01"), 3);
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert!(!grid[0][0]);
        assert!(grid[0][1]);
        for c in 0..2 {
            for r in 0..2 {
                assert_ne!(grid[r][c], grid[r + 1][c]);
            }
        }
    }

    #[test]
    fn test_single_letter_scenario() {
        let a = bits("00001");
        let m = StitchMatrix::build(&a, &a).unwrap();
        assert_eq!(m.dimensions(), (5, 5));
        assert_eq!(m.horizontal_rows()[0], vec![false, true, false, true, false]);
        assert_eq!(m.horizontal_rows()[4], vec![true, false, true, false, true]);
        let col0: Vec<bool> = (0..5).map(|r| m.vertical(r, 0)).collect();
        let col4: Vec<bool> = (0..5).map(|r| m.vertical(r, 4)).collect();
        assert_eq!(col0, vec![false, true, false, true, false]);
        assert_eq!(col4, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_dimensions_follow_bit_lengths() {
        let m = StitchMatrix::build(&bits("110"), &bits("0101010")).unwrap();
        assert_eq!(m.height(), 3);
        assert_eq!(m.width(), 7);
    }

    #[test]
    fn test_empty_bits_rejected() {
        assert!(StitchMatrix::build(&BitString::default(), &bits("1")).is_err());
        assert!(StitchMatrix::build(&bits("1"), &BitString::default()).is_err());
    }

    #[test]
    fn test_stitch_count() {
        let m = StitchMatrix::build(&bits("1"), &bits("1")).unwrap();
        assert_eq!(m.stitch_count(), 2);
    }

    #[test]
    fn test_ascii_preview() {
        let m = StitchMatrix::build(&bits("1"), &bits("10")).unwrap();
        assert_eq!(m.to_ascii(), "+--+  +\n   |   \n+  +  +\n");
    }
}
