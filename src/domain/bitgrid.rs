/// Fixed-size 2D boolean plane, packed 8 cells per byte.
///
/// Cell `(x, y)` lives at linear index `y * width + x`; byte `index / 8`,
/// bit `index % 8`. This is the only place that index math happens.
/// Walls, explored flags and both overlays are all `BitGrid`s.

use crate::error::{MazeError, Result};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BitGrid {
    width: usize,
    height: usize,
    words: Vec<u8>,
}

impl BitGrid {
    /// All-false grid. Both dimensions must be positive.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions {
                width,
                height,
                reason: "grid dimensions must be positive",
            });
        }
        let cells = width.checked_mul(height).ok_or(MazeError::InvalidDimensions {
            width,
            height,
            reason: "grid is too large",
        })?;
        Ok(BitGrid { width, height, words: vec![0; cells.div_ceil(8)] })
    }

    /// A grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: bool) -> Result<Self> {
        let mut grid = Self::new(width, height)?;
        grid.fill(value);
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let (word, bit) = self.locate(x, y)?;
        Ok(self.words[word] & (1 << bit) != 0)
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        let (word, bit) = self.locate(x, y)?;
        if value {
            self.words[word] |= 1 << bit;
        } else {
            self.words[word] &= !(1 << bit);
        }
        Ok(())
    }

    pub fn fill(&mut self, value: bool) {
        self.words.fill(if value { 0xFF } else { 0x00 });
        self.clear_padding();
    }

    pub fn count_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Positions of every set cell, row-major.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        (0..self.width * self.height)
            .filter(move |&i| self.words[i / 8] & (1 << (i % 8)) != 0)
            .map(move |i| (i % width, i / width))
    }

    // ── Internal ──

    #[inline]
    fn locate(&self, x: usize, y: usize) -> Result<(usize, usize)> {
        if !self.contains(x, y) {
            return Err(MazeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let index = y * self.width + x;
        Ok((index / 8, index % 8))
    }

    /// Bits past `width * height` in the last byte stay zero so `count_set` is exact.
    fn clear_padding(&mut self) {
        let used = self.width * self.height;
        let tail = used % 8;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u8 << tail) - 1;
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
