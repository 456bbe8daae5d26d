//! PNG output for assembled color-map grids.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use dominant_color::OutputGrid;

use crate::error::PipelineError;

/// Write an assembled grid to `path` as an 8-bit RGB PNG.
///
/// The grid must hold at least one bar; the pipeline guards this with
/// its empty-result check before saving.
pub fn save_png(grid: &OutputGrid, path: &Path) -> Result<(), PipelineError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, grid.width() as u32, grid.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&grid.to_rgb_bytes())?;

    tracing::info!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        bars = grid.bar_count(),
        "wrote color map"
    );
    Ok(())
}
