//! Bar rasterization and output-grid assembly.
//!
//! A page's ranked colors become one horizontal bar of equal-width
//! column bands; the bars of all pages stack vertically, in page order,
//! into the final color-map image.

use crate::color::Rgb;
use crate::error::ExtractError;

/// Geometry of one color bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    /// Number of color segments per bar.
    pub num_colors: usize,
    /// Width of each segment in pixels.
    pub col_width: usize,
    /// Bar height in pixel rows.
    pub thickness: usize,
}

impl BarLayout {
    /// Create a bar layout.
    pub fn new(num_colors: usize, col_width: usize, thickness: usize) -> Self {
        Self {
            num_colors,
            col_width,
            thickness,
        }
    }

    /// Total bar width: `num_colors * col_width`.
    pub fn output_width(&self) -> usize {
        self.num_colors * self.col_width
    }
}

/// One rasterized color bar: a row-major pixel block of
/// `output_width x thickness`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBar {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl ColorBar {
    /// Bar width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bar height in pixel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }
}

/// Rasterize ranked colors into a column-banded bar.
///
/// Column range `[i*col_width, (i+1)*col_width)` of every row is filled
/// with `colors[i]`. Fails with [`ExtractError::MalformedInput`] when the
/// color count does not match the layout or the layout is degenerate;
/// either indicates a bug in the calling stage, not bad page data.
pub fn render_bar(colors: &[Rgb], layout: &BarLayout) -> Result<ColorBar, ExtractError> {
    if colors.len() != layout.num_colors {
        return Err(ExtractError::MalformedInput {
            what: "ranked color count",
            expected: layout.num_colors,
            actual: colors.len(),
        });
    }
    if layout.col_width == 0 {
        return Err(ExtractError::MalformedInput {
            what: "bar column width",
            expected: 1,
            actual: 0,
        });
    }

    let width = layout.output_width();
    let mut pixels = Vec::with_capacity(width * layout.thickness);
    for _row in 0..layout.thickness {
        for x in 0..width {
            pixels.push(colors[x / layout.col_width]);
        }
    }

    Ok(ColorBar {
        pixels,
        width,
        height: layout.thickness,
    })
}

/// The accumulated color map: every appended bar stacked vertically in
/// append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGrid {
    width: usize,
    pixels: Vec<Rgb>,
    bars: usize,
}

impl OutputGrid {
    /// Create an empty grid of the given fixed width.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            pixels: Vec::new(),
            bars: 0,
        }
    }

    /// Append a bar below the existing rows. Fails with
    /// [`ExtractError::MalformedInput`] on a width mismatch.
    pub fn push_bar(&mut self, bar: ColorBar) -> Result<(), ExtractError> {
        if bar.width() != self.width {
            return Err(ExtractError::MalformedInput {
                what: "bar width",
                expected: self.width,
                actual: bar.width(),
            });
        }
        self.pixels.extend_from_slice(bar.pixels());
        self.bars += 1;
        Ok(())
    }

    /// Grid width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixel rows.
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.pixels.len() / self.width
        }
    }

    /// Number of appended bars.
    pub fn bar_count(&self) -> usize {
        self.bars
    }

    /// Whether no bar has been appended.
    pub fn is_empty(&self) -> bool {
        self.bars == 0
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Flatten to raw `R,G,B` bytes for image encoding.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.to_bytes());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_dimensions() {
        let layout = BarLayout::new(3, 10, 2);
        let colors = [Rgb::new(1, 1, 1), Rgb::new(2, 2, 2), Rgb::new(3, 3, 3)];

        let bar = render_bar(&colors, &layout).unwrap();
        assert_eq!(bar.width(), 30);
        assert_eq!(bar.height(), 2);
        assert_eq!(bar.pixels().len(), 60);
    }

    #[test]
    fn test_column_banding() {
        let layout = BarLayout::new(3, 200, 3);
        let colors = [Rgb::new(255, 0, 0), Rgb::new(0, 255, 0), Rgb::new(0, 0, 255)];

        let bar = render_bar(&colors, &layout).unwrap();
        assert_eq!(bar.width(), 600);
        assert_eq!(bar.height(), 3);

        for y in 0..3 {
            for x in 0..600 {
                let expected = colors[x / 200];
                assert_eq!(bar.pixel(x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn test_wrong_color_count_is_malformed() {
        let layout = BarLayout::new(3, 10, 2);
        let colors = [Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)];

        let err = render_bar(&colors, &layout).unwrap_err();
        assert_eq!(
            err,
            ExtractError::MalformedInput {
                what: "ranked color count",
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_zero_col_width_is_malformed() {
        let layout = BarLayout::new(1, 0, 2);
        let err = render_bar(&[Rgb::new(1, 1, 1)], &layout).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedInput { .. }));
    }

    #[test]
    fn test_grid_stacks_bars_in_append_order() {
        let layout = BarLayout::new(1, 4, 2);
        let mut grid = OutputGrid::new(layout.output_width());

        grid.push_bar(render_bar(&[Rgb::new(10, 0, 0)], &layout).unwrap())
            .unwrap();
        grid.push_bar(render_bar(&[Rgb::new(20, 0, 0)], &layout).unwrap())
            .unwrap();

        assert_eq!(grid.bar_count(), 2);
        assert_eq!(grid.height(), 4);
        // Rows 0-1 belong to the first bar, rows 2-3 to the second.
        assert_eq!(grid.pixels()[0], Rgb::new(10, 0, 0));
        assert_eq!(grid.pixels()[2 * 4], Rgb::new(20, 0, 0));
    }

    #[test]
    fn test_grid_rejects_width_mismatch() {
        let mut grid = OutputGrid::new(8);
        let bar = render_bar(&[Rgb::new(1, 1, 1)], &BarLayout::new(1, 4, 1)).unwrap();

        let err = grid.push_bar(bar).unwrap_err();
        assert_eq!(
            err,
            ExtractError::MalformedInput {
                what: "bar width",
                expected: 8,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_to_rgb_bytes_layout() {
        let layout = BarLayout::new(2, 1, 1);
        let mut grid = OutputGrid::new(2);
        grid.push_bar(render_bar(&[Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)], &layout).unwrap())
            .unwrap();

        assert_eq!(grid.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = OutputGrid::new(600);
        assert!(grid.is_empty());
        assert_eq!(grid.height(), 0);
    }
}
