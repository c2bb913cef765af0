// seating-chart: canvas geometry

use tracing::warn;

use crate::config::ChartConfig;
use crate::error::AppError;
use crate::layout::Coord;
use crate::roster::SeatedRecord;

/// Pixel geometry derived from the config and the grid shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub cell_width: u32,
    pub cell_height: u32,
    pub rows: u32,
    pub cols: u32,
    pub width: u32,
    pub height: u32,
    /// Top of the teacher band, directly below the student desks
    pub band_top: u32,
    pub teacher_desk_x: u32,
    pub teacher_desk_y: u32,
}

/// A seated record with its desk's top-left pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub record: SeatedRecord,
    pub left: i64,
    pub top: i64,
}

impl CanvasGeometry {
    pub fn compute(config: &ChartConfig, rows: usize, cols: usize) -> Result<Self, AppError> {
        let desk = &config.student_desk;
        let teacher = &config.teacher_desk;

        let overflow = || {
            AppError::ConfigError(format!("canvas for {} x {} desks is too large", cols, rows))
        };
        let sum = |parts: &[u32]| {
            parts
                .iter()
                .try_fold(0u32, |acc, &p| acc.checked_add(p))
                .ok_or_else(overflow)
        };

        let cell_width = sum(&[desk.padding_x, desk.sz_x, desk.padding_x])?;
        let cell_height = sum(&[
            desk.padding_y,
            desk.student_num.box_sz_y,
            desk.kana.box_sz_y,
            desk.name.box_sz_y,
            desk.padding_y,
        ])?;

        let rows = u32::try_from(rows).map_err(|_| overflow())?;
        let cols = u32::try_from(cols).map_err(|_| overflow())?;
        let width = cell_width.checked_mul(cols).ok_or_else(overflow)?;
        let band_top = cell_height.checked_mul(rows).ok_or_else(overflow)?;
        let height = sum(&[band_top, teacher.padding_y, teacher.sz_y, teacher.padding_y])?;

        if width <= teacher.sz_x {
            return Err(AppError::LayoutTooNarrow {
                canvas: width,
                teacher_desk: teacher.sz_x,
            });
        }

        Ok(Self {
            cell_width,
            cell_height,
            rows,
            cols,
            width,
            height,
            band_top,
            teacher_desk_x: (width - teacher.sz_x) / 2,
            teacher_desk_y: band_top + teacher.padding_y,
        })
    }

    /// Top-left pixel of a desk. Both axes are mirrored, so seat (1, 1) lands
    /// in the bottom-right of the student area.
    pub fn desk_origin(&self, coord: Coord) -> (i64, i64) {
        let left = (self.cols as i64 - coord.x as i64) * self.cell_width as i64;
        let top = (self.rows as i64 - coord.y as i64) * self.cell_height as i64;
        (left, top)
    }

    /// Only the top-left corner is checked, not the whole desk footprint.
    pub fn contains(&self, left: i64, top: i64) -> bool {
        left >= 0 && top >= 0 && left <= self.width as i64 && top <= self.height as i64
    }

    pub fn place(&self, records: Vec<SeatedRecord>) -> Vec<Placement> {
        records
            .into_iter()
            .map(|record| {
                let (left, top) = self.desk_origin(record.coord());
                if !self.contains(left, top) {
                    warn!(
                        x_idx = record.x_idx,
                        y_idx = record.y_idx,
                        left,
                        top,
                        canvas_width = self.width,
                        canvas_height = self.height,
                        "desk is placed outside the canvas"
                    );
                }
                Placement { record, left, top }
            })
            .collect()
    }
}
