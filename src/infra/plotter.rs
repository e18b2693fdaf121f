// ============================================================
// Layer 6 — Plotter
// ============================================================
// Writes PNG files with plotters' bitmap backend:
//
//   ComparisonPlot::save   — one row per image,
//                            original on the left,
//                            reconstruction on the right
//
//   save_loss_curve        — train (blue) and validation (red)
//                            loss per epoch as polylines
//
// Everything is drawn from primitive shapes, so no font stack
// is required.
//
// Reference: plotters crate documentation (BitMapBackend, DrawingArea)

use anyhow::{anyhow, bail, Result};
use plotters::{coord::Shift, prelude::*};
use std::path::Path;

use crate::data::normalizer::to_byte;
use crate::domain::image::{GrayImage, ReconstructionPair, IMAGE_HEIGHT, IMAGE_WIDTH};
use crate::infra::metrics::EpochMetrics;

/// Side-by-side original/reconstruction image grid.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonPlot {
    /// Output pixels per image pixel
    pub scale: u32,
    /// Blank border around each panel, in output pixels
    pub gap:   u32,
}

impl Default for ComparisonPlot {
    fn default() -> Self {
        Self { scale: 8, gap: 4 }
    }
}

impl ComparisonPlot {
    fn panel_size(&self) -> (u32, u32) {
        (
            IMAGE_WIDTH  as u32 * self.scale + 2 * self.gap,
            IMAGE_HEIGHT as u32 * self.scale + 2 * self.gap,
        )
    }

    /// Output image size for `rows` pairs
    pub fn dimensions(&self, rows: usize) -> (u32, u32) {
        let (w, h) = self.panel_size();
        (2 * w, rows as u32 * h)
    }

    pub fn save(&self, pairs: &[ReconstructionPair], path: &Path) -> Result<()> {
        if pairs.is_empty() {
            bail!("Nothing to plot: no reconstructions were given");
        }

        let root = BitMapBackend::new(path, self.dimensions(pairs.len())).into_drawing_area();
        self.render(&root, pairs)?;

        root.present()
            .map_err(|e| anyhow!("Cannot write plot '{}': {e}", path.display()))?;
        tracing::info!("Saved {} reconstruction(s) to '{}'", pairs.len(), path.display());
        Ok(())
    }

    /// Draw the grid onto an area sized by `dimensions(pairs.len())`.
    pub fn render<DB: DrawingBackend>(
        &self,
        root:  &DrawingArea<DB, Shift>,
        pairs: &[ReconstructionPair],
    ) -> Result<()> {
        root.fill(&WHITE).map_err(|e| anyhow!("Plot fill failed: {e}"))?;

        let panels = root.split_evenly((pairs.len(), 2));
        for (pair, row) in pairs.iter().zip(panels.chunks(2)) {
            self.draw_image(&row[0], &pair.original)?;
            self.draw_image(&row[1], &pair.reconstructed)?;
        }
        Ok(())
    }

    fn draw_image<DB: DrawingBackend>(
        &self,
        area:  &DrawingArea<DB, Shift>,
        image: &GrayImage,
    ) -> Result<()> {
        let s = self.scale as i32;
        let g = self.gap   as i32;
        for row in 0..IMAGE_HEIGHT {
            for col in 0..IMAGE_WIDTH {
                let v  = to_byte(image.pixel(row, col));
                let x0 = g + col as i32 * s;
                let y0 = g + row as i32 * s;
                area.draw(&Rectangle::new(
                    [(x0, y0), (x0 + s - 1, y0 + s - 1)],
                    RGBColor(v, v, v).filled(),
                ))
                .map_err(|e| anyhow!("Plot draw failed: {e}"))?;
            }
        }
        Ok(())
    }
}

/// Plot per-epoch train and validation loss to a PNG.
pub fn save_loss_curve(history: &[EpochMetrics], path: &Path) -> Result<()> {
    const W: u32 = 640;
    const H: u32 = 480;
    const M: i32 = 32;

    if history.is_empty() {
        bail!("Nothing to plot: empty training history");
    }

    let finite = history
        .iter()
        .flat_map(|m| [m.train_loss, m.val_loss])
        .filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() {
        bail!("Nothing to plot: no finite loss values");
    }
    let span = if hi > lo { hi - lo } else { 1.0 };

    let steps = (history.len() - 1).max(1) as f64;
    let to_px = |i: usize, loss: f64| -> (i32, i32) {
        let x = M + ((i as f64 / steps) * (W as i32 - 2 * M) as f64) as i32;
        let y = M + ((1.0 - (loss - lo) / span) * (H as i32 - 2 * M) as f64) as i32;
        (x, y)
    };

    let root = BitMapBackend::new(path, (W, H)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("Plot fill failed: {e}"))?;

    // axes
    let axes = vec![(M, M), (M, H as i32 - M), (W as i32 - M, H as i32 - M)];
    root.draw(&PathElement::new(axes, BLACK.stroke_width(1)))
        .map_err(|e| anyhow!("Plot draw failed: {e}"))?;

    let series: [(fn(&EpochMetrics) -> f64, RGBColor); 2] = [
        (|m| m.train_loss, BLUE),
        (|m| m.val_loss,   RED),
    ];
    for (select, color) in series {
        let points: Vec<(i32, i32)> = history
            .iter()
            .enumerate()
            .filter(|(_, m)| select(m).is_finite())
            .map(|(i, m)| to_px(i, select(m)))
            .collect();

        root.draw(&PathElement::new(points.clone(), color.stroke_width(2)))
            .map_err(|e| anyhow!("Plot draw failed: {e}"))?;
        for p in points {
            root.draw(&Circle::new(p, 3, color.filled()))
                .map_err(|e| anyhow!("Plot draw failed: {e}"))?;
        }
    }

    root.present()
        .map_err(|e| anyhow!("Cannot write plot '{}': {e}", path.display()))?;
    tracing::info!("Saved loss curve to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::IMAGE_PIXELS;

    fn pair() -> ReconstructionPair {
        let original = GrayImage::new(vec![0.8; IMAGE_PIXELS], Some(1)).unwrap();
        ReconstructionPair::new(original, vec![0.0; IMAGE_PIXELS]).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let plot = ComparisonPlot { scale: 2, gap: 1 };
        assert_eq!(plot.dimensions(3), (2 * (56 + 2), 3 * (56 + 2)));
    }

    #[test]
    fn test_writes_png_with_grid_dimensions() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmp.png");
        let plot = ComparisonPlot { scale: 2, gap: 1 };
        plot.save(&[pair(), pair()], &path).unwrap();

        // IHDR width and height, big-endian, right after the 8-byte signature
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let width  = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        assert_eq!((width, height), plot.dimensions(2));
    }

    #[test]
    fn test_original_left_reconstruction_right() {
        let plot = ComparisonPlot { scale: 2, gap: 1 };
        let (w, h) = plot.dimensions(1);
        let (panel_w, _) = plot.panel_size();
        let mut buf = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            plot.render(&root, &[pair()]).unwrap();
            root.present().unwrap();
        }
        let rgb = |x: u32, y: u32| {
            let i = ((y * w + x) * 3) as usize;
            (buf[i], buf[i + 1], buf[i + 2])
        };

        // border, first pixel of the original (0.8), first pixel of the reconstruction (0.0)
        assert_eq!(rgb(0, 0), (255, 255, 255));
        assert_eq!(rgb(plot.gap + 1, plot.gap + 1), (204, 204, 204));
        assert_eq!(rgb(panel_w + plot.gap + 1, plot.gap + 1), (0, 0, 0));
    }

    #[test]
    fn test_empty_pairs_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ComparisonPlot::default().save(&[], &dir.path().join("x.png")).is_err());
    }

    #[test]
    fn test_loss_curve_skips_nan() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("loss.png");
        let history = vec![
            EpochMetrics::new(1, 0.09, f64::NAN),
            EpochMetrics::new(2, 0.05, f64::NAN),
            EpochMetrics::new(3, 0.04, f64::NAN),
        ];
        save_loss_curve(&history, &path).unwrap();
        assert!(fs_len(&path) > 0);
    }

    #[test]
    fn test_loss_curve_needs_values() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_loss_curve(&[], &dir.path().join("a.png")).is_err());
        let nan = vec![EpochMetrics::new(1, f64::NAN, f64::NAN)];
        assert!(save_loss_curve(&nan, &dir.path().join("b.png")).is_err());
    }

    fn fs_len(path: &Path) -> u64 {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}
