use crate::error::{FluError, Result};
use crate::grid::{Grid, Status, NUM_STAGES};
use crate::sweep::{RunRecord, SnapshotSink};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Colour per status code. Green for susceptible, blues for the two
/// infectious days, reds fading out over the immune days.
pub const PALETTE: [[u8; 3]; NUM_STAGES as usize] = [
    [34, 139, 34],   // forestgreen
    [0, 191, 255],   // deepskyblue
    [135, 206, 235], // skyblue
    [128, 0, 0],     // maroon
    [178, 34, 34],   // firebrick
    [205, 92, 92],   // indianred
    [240, 128, 128], // lightcoral
    [255, 228, 225], // mistyrose
];

pub fn color_of(status: Status) -> Rgba<u8> {
    let [r, g, b] = PALETTE[status.code() as usize];
    Rgba([r, g, b, 255])
}

/// One image of a snapshot, each person drawn as a `cell_pixels` square.
pub fn render_frame(grid: &Grid, cell_pixels: u32) -> Result<RgbaImage> {
    if cell_pixels == 0 {
        return Err(FluError::ZeroCellPixels);
    }
    let side = u32::try_from(grid.size())
        .ok()
        .and_then(|n| n.checked_mul(cell_pixels))
        .ok_or(FluError::FrameTooLarge {
            grid_size: grid.size(),
            cell_pixels,
        })?;
    Ok(RgbaImage::from_fn(side, side, |x, y| {
        let row = (y / cell_pixels) as usize;
        let col = (x / cell_pixels) as usize;
        color_of(grid.get((row, col)))
    }))
}

/// Encode the snapshots as a looping animated GIF.
pub fn write_gif<W: Write>(
    writer: W,
    snapshots: &[Grid],
    cell_pixels: u32,
    frame_delay_ms: u32,
) -> Result<()> {
    if snapshots.is_empty() {
        return Err(FluError::NoSnapshots);
    }
    let delay = Delay::from_numer_denom_ms(frame_delay_ms, 1);
    let frames = snapshots
        .iter()
        .map(|grid| Ok(Frame::from_parts(render_frame(grid, cell_pixels)?, 0, 0, delay)))
        .collect::<Result<Vec<_>>>()?;

    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(frames)?;
    Ok(())
}

/// Writes one `<label>.gif` per finished run into a directory.
pub struct GifSink {
    dir: PathBuf,
    cell_pixels: u32,
    frame_delay_ms: u32,
}

impl GifSink {
    pub fn create(dir: &Path, cell_pixels: u32, frame_delay_ms: u32) -> Result<GifSink> {
        fs::create_dir_all(dir)?;
        Ok(GifSink {
            dir: dir.to_path_buf(),
            cell_pixels,
            frame_delay_ms,
        })
    }

    pub fn path_for(&self, record: &RunRecord) -> PathBuf {
        self.dir.join(format!("{}.gif", record.item.label()))
    }
}

impl SnapshotSink for GifSink {
    fn consume(&self, record: &RunRecord) -> Result<()> {
        let path = self.path_for(record);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_gif(&mut writer, &record.snapshots, self.cell_pixels, self.frame_delay_ms)?;
        writer.flush()?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::sweep::{run_item, run_sweep, work_items};

    #[test]
    fn frame_maps_every_status_to_its_colour() {
        let g = Grid::from_rows(vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 0]]).unwrap();
        let img = render_frame(&g, 4).unwrap();
        assert_eq!(img.dimensions(), (12, 12));
        for row in 0..3 {
            for col in 0..3 {
                let expected = color_of(g.get((row, col)));
                for dy in 0..4 {
                    for dx in 0..4 {
                        let px = img.get_pixel(col as u32 * 4 + dx, row as u32 * 4 + dy);
                        assert_eq!(*px, expected);
                    }
                }
            }
        }
    }

    #[test]
    fn bad_frame_sizes_are_errors() {
        let g = Grid::from_rows(vec![vec![0, 1], vec![2, 3]]).unwrap();
        assert!(matches!(render_frame(&g, 0), Err(FluError::ZeroCellPixels)));
        assert!(matches!(
            render_frame(&g, u32::MAX),
            Err(FluError::FrameTooLarge { grid_size: 2, .. })
        ));
        assert!(matches!(
            write_gif(&mut Vec::<u8>::new(), &[g], 0, 100),
            Err(FluError::ZeroCellPixels)
        ));
    }

    #[test]
    fn sweep_with_zero_cell_pixels_is_rejected() {
        let dir = std::env::temp_dir().join(format!("flu_gif_zero_{}", std::process::id()));
        let sink = GifSink::create(&dir, 0, 100).unwrap();
        let config = SweepConfig {
            grid_size: 4,
            max_iter: 3,
            cell_pixels: 0,
            seed: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            run_sweep(&config, &[&sink]),
            Err(FluError::ZeroCellPixels)
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn palette_is_distinct() {
        for a in 0..PALETTE.len() {
            for b in (a + 1)..PALETTE.len() {
                assert_ne!(PALETTE[a], PALETTE[b]);
            }
        }
    }

    #[test]
    fn gif_has_header_and_rejects_empty_runs() {
        let snapshots = vec![
            Grid::from_rows(vec![vec![0, 1], vec![0, 0]]).unwrap(),
            Grid::from_rows(vec![vec![1, 2], vec![0, 1]]).unwrap(),
        ];
        let mut bytes: Vec<u8> = vec![];
        write_gif(&mut bytes, &snapshots, 2, 100).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");

        assert!(matches!(
            write_gif(&mut Vec::<u8>::new(), &[], 2, 100),
            Err(FluError::NoSnapshots)
        ));
    }

    #[test]
    fn sink_writes_labelled_file() {
        let dir = std::env::temp_dir().join(format!("flu_gif_{}", std::process::id()));
        let sink = GifSink::create(&dir, 2, 100).unwrap();
        let config = SweepConfig {
            grid_size: 5,
            max_iter: 4,
            ..Default::default()
        };
        let record = run_item(work_items()[0], &config, 11).unwrap();
        sink.consume(&record).unwrap();
        let path = dir.join("s0.1_i0.1.gif");
        assert_eq!(sink.path_for(&record), path);
        assert!(fs::metadata(&path).unwrap().len() > 0);
        fs::remove_dir_all(dir).unwrap();
    }
}
