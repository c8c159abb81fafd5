//! Terminal renderer for a [`TabBarFrame`].
//!
//! Drawing is a thin, lossy mapping of the frame onto character cells: it
//! exists to show the synchronization core working, not to be pretty.
//!
//! Per item, the content row is the middle row of its container:
//!
//! - offsets from the preset move the icon and label between that row and
//!   the rows around it; anything leaving the content row is masked
//! - a bubble background is painted across its current width
//! - an indicator dot sits on the container's bottom row once it has grown
//!   past half its radius
//!
//! The whole grid is shifted down by the visibility translation.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{queue, terminal};

use crate::layout::string_width;
use crate::pipeline::{ItemFrame, TabBarFrame};
use crate::types::Rgba;

/// Smallest indicator radius that still gets a dot.
const INDICATOR_MIN_RADIUS: f64 = 0.25;

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

/// A rendered bar: `height` rows of `width` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBar {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl RenderedBar {
    fn new(width: usize, height: usize, bg: Option<Rgba>) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell { bg, ..Cell::default() }; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut Cell> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get_mut(y * self.width + x)
    }

    fn put_str(&mut self, x: i64, y: i64, text: &str, fg: Rgba) {
        let mut column = x;
        for ch in text.chars() {
            if let Some(cell) = self.get_mut(column, y) {
                cell.ch = ch;
                cell.fg = Some(fg);
            }
            column += string_width(ch.encode_utf8(&mut [0; 4])).max(1) as i64;
        }
    }

    fn fill_bg(&mut self, x: i64, y: i64, width: i64, bg: Rgba) {
        for column in x..x + width {
            if let Some(cell) = self.get_mut(column, y) {
                cell.bg = Some(bg);
            }
        }
    }

    /// Plain text rows, trailing spaces trimmed.
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>().trim_end().to_string())
            .collect()
    }
}

/// Turns frames into cell grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn render(&self, frame: &TabBarFrame) -> RenderedBar {
        let width = frame.bar.width.max(0.0).round() as usize;
        let height = frame.bar.height.max(0.0).round() as usize;
        let mut grid = RenderedBar::new(width, height, frame.background);
        for item in &frame.items {
            draw_item(&mut grid, item);
        }
        shift_down(grid, frame.translate_y.round().max(0.0) as usize, frame.background)
    }
}

fn draw_item(grid: &mut RenderedBar, item: &ItemFrame) {
    let region = item.region;
    let cw = item.container_width.round() as i64;
    let ch = item.container_height.round().max(1.0) as i64;
    let left = region.x.round() as i64 + ((region.width.round() as i64 - cw) / 2).max(0);
    let top = region.y.round() as i64 + ((region.height.round() as i64 - ch) / 2).max(0);
    let content_row = top + (ch - 1) / 2;
    let visual = &item.visual;

    let glyph = item
        .glyph
        .clone()
        .or_else(|| item.title.chars().next().map(String::from))
        .unwrap_or_default();

    if let Some(background) = visual.background {
        let pill = background.width.round() as i64;
        if background.color.a >= 128 {
            grid.fill_bg(left + (cw - pill) / 2, content_row, pill, background.color);
        }
        // Icon then label, left-aligned inside the pill.
        let start = left + (cw - pill) / 2 + 1;
        grid.put_str(start, content_row, &glyph, visual.icon_color);
        if visual.label_opacity >= 0.5 {
            let label_x = start + string_width(&glyph) as i64 + 1;
            grid.put_str(label_x, content_row, &item.title, visual.label_color);
        }
    } else {
        // Offsets are in rows; the content row masks everything else.
        let icon_row = content_row + (visual.icon_offset_y + 0.5).round() as i64;
        if icon_row == content_row {
            let x = left + (cw - string_width(&glyph) as i64) / 2;
            grid.put_str(x, content_row, &glyph, visual.icon_color);
        }
        let label_row = content_row + (visual.label_offset_y + 0.5).round() as i64;
        if label_row == content_row {
            let x = left + (cw - string_width(&item.title) as i64) / 2;
            grid.put_str(x, content_row, &item.title, visual.label_color);
        }
    }

    if let Some(indicator) = visual.indicator {
        if indicator.radius >= INDICATOR_MIN_RADIUS {
            grid.put_str(left + cw / 2, top + ch - 1, "•", indicator.color);
        }
    }
}

fn shift_down(grid: RenderedBar, rows: usize, bg: Option<Rgba>) -> RenderedBar {
    if rows == 0 {
        return grid;
    }
    let mut shifted = RenderedBar::new(grid.width, grid.height, bg);
    for y in rows..grid.height {
        let from = (y - rows) * grid.width;
        let to = y * grid.width;
        shifted.cells[to..to + grid.width].copy_from_slice(&grid.cells[from..from + grid.width]);
    }
    shifted
}

/// Paint `bar` with its top-left corner at terminal row `origin_row`.
pub fn write_frame<W: Write>(out: &mut W, bar: &RenderedBar, origin_row: u16) -> io::Result<()> {
    for y in 0..bar.height() {
        let row = origin_row.saturating_add(y as u16);
        queue!(out, MoveTo(0, row), terminal::Clear(terminal::ClearType::CurrentLine))?;
        for x in 0..bar.width() {
            let Some(cell) = bar.get(x, y) else {
                continue;
            };
            queue!(out, ResetColor)?;
            if let Some(fg) = cell.fg {
                queue!(out, SetForegroundColor(Color::from(fg)))?;
            }
            if let Some(bg) = cell.bg {
                queue!(out, SetBackgroundColor(Color::from(bg)))?;
            }
            queue!(out, Print(cell.ch))?;
        }
    }
    queue!(out, ResetColor)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{BackgroundVisual, IndicatorVisual, ItemVisual};
    use crate::state::{PositionMode, VisibilityPhase};
    use crate::types::LayoutBox;

    fn visual(icon_offset_y: f64, label_offset_y: f64) -> ItemVisual {
        ItemVisual {
            icon_offset_y,
            label_offset_y,
            label_opacity: 1.0,
            icon_color: Rgba::WHITE,
            label_color: Rgba::WHITE,
            background: None,
            indicator: None,
        }
    }

    fn item(title: &str, x: f32, visual: ItemVisual) -> ItemFrame {
        ItemFrame {
            key: title.into(),
            title: title.into(),
            glyph: Some("*".into()),
            region: LayoutBox::new(x, 0.0, 6.0, 3.0),
            container_width: 6.0,
            container_height: 3.0,
            focus: 0.0,
            selected: false,
            visual,
        }
    }

    fn frame(items: Vec<ItemFrame>, translate_y: f64) -> TabBarFrame {
        TabBarFrame {
            bar: LayoutBox::new(0.0, 0.0, 12.0, 3.0),
            translate_y,
            position_mode: PositionMode::Relative,
            phase: VisibilityPhase::Visible,
            background: None,
            selected_index: Some(1),
            is_rtl: false,
            items,
        }
    }

    #[test]
    fn test_flashy_swaps_icon_for_label() {
        let frame = frame(
            vec![
                item("Home", 0.0, visual(-0.5, 0.5)),
                item("Feed", 6.0, visual(-1.5, -0.5)),
            ],
            0.0,
        );
        let lines = TextRenderer.render(&frame).lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  *    Feed");
    }

    #[test]
    fn test_bubble_shows_label_when_opaque() {
        let mut v = visual(0.0, 0.0);
        v.background = Some(BackgroundVisual {
            width: 6.0,
            color: Rgba::BLUE,
        });
        let bar = TextRenderer.render(&frame(vec![item("Hi", 0.0, v)], 0.0));
        assert_eq!(bar.lines()[1], " * Hi");
        assert_eq!(bar.get(0, 1).unwrap().bg, Some(Rgba::BLUE));
    }

    #[test]
    fn test_indicator_on_bottom_row() {
        let mut v = visual(-1.5, -0.5);
        v.indicator = Some(IndicatorVisual {
            left: 2.5,
            top: 2.0,
            radius: 0.5,
            color: Rgba::RED,
        });
        let lines = TextRenderer.render(&frame(vec![item("Go", 0.0, v)], 0.0)).lines();
        assert_eq!(lines[2], "   •");
    }

    #[test]
    fn test_translation_pushes_rows_down() {
        let frame = frame(vec![item("Home", 0.0, visual(-0.5, 0.5))], 1.0);
        let lines = TextRenderer.render(&frame).lines();
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "  *");
    }

    #[test]
    fn test_write_frame_emits_text() {
        let frame = frame(vec![item("Home", 0.0, visual(-0.5, 0.5))], 0.0);
        let bar = TextRenderer.render(&frame);
        let mut out = Vec::new();
        write_frame(&mut out, &bar, 10).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('*'));
    }
}
