// seating-chart: drawing desks, teacher band and labels

use ::image::{Rgb, RgbImage};
use chrono::NaiveDate;
use rusttype::{point, Font, Scale};
use std::path::Path;

use crate::canvas::{CanvasGeometry, Placement};
use crate::config::{ChartConfig, LabelConfig, TextBoxConfig};
use crate::error::AppError;

// ============================================================================
// Drawing Surface
// ============================================================================

/// Primitive drawing operations the chart needs. Coordinates are pixels from
/// the canvas top-left and may fall outside the canvas.
pub trait Surface {
    fn fill_rect(&mut self, left: i64, top: i64, width: u32, height: u32, color: Rgb<u8>);
    fn outline_rect(&mut self, left: i64, top: i64, width: u32, height: u32, color: Rgb<u8>);
    /// Draw `text` with its top-left at (left, top)
    fn draw_text(&mut self, left: i64, top: i64, px: f32, color: Rgb<u8>, text: &str);
    fn text_width(&self, px: f32, text: &str) -> f32;
    /// Ascent to descent at this size
    fn line_height(&self, px: f32) -> f32;
}

/// In-memory RGB image with a TrueType font
pub struct RasterSurface {
    image: RgbImage,
    font: Font<'static>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Rgb<u8>, font: Font<'static>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            font,
        }
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }
}

impl Surface for RasterSurface {
    fn fill_rect(&mut self, left: i64, top: i64, width: u32, height: u32, color: Rgb<u8>) {
        for y in top..top + height as i64 {
            for x in left..left + width as i64 {
                self.put(x, y, color);
            }
        }
    }

    fn outline_rect(&mut self, left: i64, top: i64, width: u32, height: u32, color: Rgb<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        let right = left + width as i64 - 1;
        let bottom = top + height as i64 - 1;
        for x in left..=right {
            self.put(x, top, color);
            self.put(x, bottom, color);
        }
        for y in top..=bottom {
            self.put(left, y, color);
            self.put(right, y, color);
        }
    }

    fn draw_text(&mut self, left: i64, top: i64, px: f32, color: Rgb<u8>, text: &str) {
        let scale = Scale::uniform(px);
        let v_metrics = self.font.v_metrics(scale);
        let origin = point(left as f32, top as f32 + v_metrics.ascent);
        let glyphs: Vec<_> = self.font.layout(text, scale, origin).collect();

        for glyph in glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let x = gx as i64 + bb.min.x as i64;
                let y = gy as i64 + bb.min.y as i64;
                if x < 0 || y < 0 {
                    return;
                }
                let Some(dst) = self.image.get_pixel_mut_checked(x as u32, y as u32) else {
                    return;
                };
                let alpha = v.clamp(0.0, 1.0);
                if alpha == 0.0 {
                    return;
                }
                let inv = 1.0 - alpha;
                for c in 0..3 {
                    dst.0[c] = (color.0[c] as f32 * alpha + dst.0[c] as f32 * inv) as u8;
                }
            });
        }
    }

    fn text_width(&self, px: f32, text: &str) -> f32 {
        let scale = Scale::uniform(px);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn line_height(&self, px: f32) -> f32 {
        let v_metrics = self.font.v_metrics(Scale::uniform(px));
        v_metrics.ascent - v_metrics.descent
    }
}

pub fn load_font(path: &Path) -> Result<Font<'static>, AppError> {
    if !path.exists() {
        return Err(AppError::MissingFont(path.display().to_string()));
    }
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::FontError(format!("{}: {}", path.display(), e)))?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| AppError::FontError(format!("{}: not a TrueType/OpenType font", path.display())))
}

// ============================================================================
// Chart Rendering
// ============================================================================

/// Start-date label; blank config text means "From <today>".
pub fn start_date_text(configured: &str, today: NaiveDate) -> String {
    if configured.is_empty() {
        format!("From {}", today.format("%Y-%m-%d"))
    } else {
        configured.to_string()
    }
}

/// Draw every placed desk followed by the teacher band.
pub fn render_chart<S: Surface>(
    surface: &mut S,
    config: &ChartConfig,
    geometry: &CanvasGeometry,
    placements: &[Placement],
    today: NaiveDate,
) {
    for placement in placements {
        draw_student_desk(surface, config, placement);
    }
    draw_teacher_band(surface, config, geometry, today);
}

fn draw_student_desk<S: Surface>(surface: &mut S, config: &ChartConfig, placement: &Placement) {
    let desk = &config.student_desk;
    let record = &placement.record;
    let left = placement.left + desk.padding_x as i64;
    let mut top = placement.top + desk.padding_y as i64;

    let number = record.number.map(|n| n.to_string()).unwrap_or_default();
    for (text_box, text) in [
        (&desk.student_num, number.as_str()),
        (&desk.kana, record.kana.as_str()),
        (&desk.name, record.name.as_str()),
    ] {
        draw_text_box(surface, text_box, left, top, desk.sz_x, text);
        top += text_box.box_sz_y as i64;
    }
}

fn draw_text_box<S: Surface>(
    surface: &mut S,
    text_box: &TextBoxConfig,
    left: i64,
    top: i64,
    width: u32,
    text: &str,
) {
    surface.fill_rect(left, top, width, text_box.box_sz_y, text_box.fill_clr.0);
    surface.outline_rect(left, top, width, text_box.box_sz_y, text_box.outline_clr.0);
    if !text.is_empty() {
        surface.draw_text(
            left + text_box.txt_offset_x as i64,
            top + text_box.txt_offset_y as i64,
            text_box.font_pt,
            text_box.txt_clr.0,
            text,
        );
    }
}

fn draw_teacher_band<S: Surface>(
    surface: &mut S,
    config: &ChartConfig,
    geometry: &CanvasGeometry,
    today: NaiveDate,
) {
    let teacher = &config.teacher_desk;
    let desk_left = geometry.teacher_desk_x as i64;
    let desk_top = geometry.teacher_desk_y as i64;

    surface.fill_rect(desk_left, desk_top, teacher.sz_x, teacher.sz_y, teacher.fill_clr.0);
    surface.outline_rect(desk_left, desk_top, teacher.sz_x, teacher.sz_y, teacher.outline_clr.0);
    if !teacher.text.is_empty() {
        // Centered in the desk box
        let text_w = surface.text_width(teacher.font_pt, &teacher.text);
        let text_left = desk_left + ((teacher.sz_x as f32 - text_w) / 2.0).round() as i64;
        let text_h = surface.line_height(teacher.font_pt);
        let text_top = desk_top + ((teacher.sz_y as f32 - text_h) / 2.0).round() as i64;
        surface.draw_text(text_left, text_top, teacher.font_pt, teacher.txt_clr.0, &teacher.text);
    }

    let band_top = geometry.band_top as i64;
    draw_label(surface, &config.title, &config.title.text, band_top);
    let date_text = start_date_text(&config.start_date.text, today);
    draw_label(surface, &config.start_date, &date_text, band_top);
}

fn draw_label<S: Surface>(surface: &mut S, label: &LabelConfig, text: &str, band_top: i64) {
    if text.is_empty() {
        return;
    }
    surface.draw_text(
        label.offset_x as i64,
        band_top + label.offset_y as i64,
        label.font_pt,
        label.txt_clr.0,
        text,
    );
}
