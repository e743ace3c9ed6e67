// SPDX-License-Identifier: GPL-3.0-only

//! Terminal depth preview
//!
//! Draws a color raster inline in the terminal using Unicode half-block
//! characters, placed with the same display transform a graphical surface
//! would use.

use crate::depth::{ColorRaster, DisplayTransform, compute_transform};

use ratatui::{
    Terminal, TerminalOptions, Viewport, backend::CrosstermBackend, buffer::Buffer, layout::Rect,
    style::Color, widgets::Widget,
};
use std::io::stdout;
use tracing::debug;

/// Rows kept free below the preview for the shell prompt and status line
const RESERVED_ROWS: u16 = 2;

/// Smallest preview height in terminal rows
const MIN_PREVIEW_ROWS: u16 = 4;

/// Draw `raster` once, rotated by `rotation_degrees`, followed by `status`
pub fn preview(
    raster: &ColorRaster,
    rotation_degrees: f32,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, rows) = crossterm::terminal::size()?;
    let height = rows.saturating_sub(RESERVED_ROWS).max(MIN_PREVIEW_ROWS);

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )?;

    let widget = RasterWidget {
        raster,
        rotation_degrees,
    };

    terminal.draw(|f| {
        let area = f.area();

        // Reserve bottom line for status
        let raster_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let status_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };

        f.render_widget(&widget, raster_area);
        f.render_widget(StatusBar { message: status }, status_area);
    })?;

    drop(terminal);
    println!();
    Ok(())
}

/// Widget that renders a raster using half-block characters
struct RasterWidget<'a> {
    raster: &'a ColorRaster,
    rotation_degrees: f32,
}

impl RasterWidget<'_> {
    /// Surface-to-raster map for an area of terminal cells
    ///
    /// Each cell shows two vertical pixels, so the surface is twice as tall as
    /// the area in pixel units.
    fn sampling_transform(&self, area: Rect) -> Option<DisplayTransform> {
        compute_transform(
            self.raster.width(),
            self.raster.height(),
            area.width as u32,
            area.height as u32 * 2,
            self.rotation_degrees,
        )
        .invert()
    }

    fn sample(&self, inverse: &DisplayTransform, px: u32, py: u32) -> Color {
        // Sample at the pixel center
        let (x, y) = inverse.map_point(px as f32 + 0.5, py as f32 + 0.5);
        if x < 0.0 || y < 0.0 {
            return Color::Black;
        }
        match self.raster.pixel(x as u32, y as u32) {
            Some([r, g, b, _]) => Color::Rgb(r, g, b),
            None => Color::Black,
        }
    }
}

impl Widget for &RasterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some(inverse) = self.sampling_transform(area) else {
            return;
        };

        debug!(
            cols = area.width,
            rows = area.height,
            rotation = self.rotation_degrees,
            "Rendering depth preview"
        );

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..area.height {
            for tx in 0..area.width {
                let top = self.sample(&inverse, tx as u32, ty as u32 * 2);
                let bottom = self.sample(&inverse, tx as u32, ty as u32 * 2 + 1);

                if let Some(cell) = buf.cell_mut((area.x + tx, area.y + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::{ColorRamp, DistanceField, FixedCutoff, render};

    fn checker_raster() -> ColorRaster {
        // Left column near, right column far
        let field = DistanceField::new(2, 2, vec![0, 100, 0, 100]).unwrap();
        render(&field, &FixedCutoff::new(100, 255), ColorRamp::Green)
    }

    #[test]
    fn test_raster_fills_matching_area() {
        let raster = checker_raster();
        let widget = RasterWidget {
            raster: &raster,
            rotation_degrees: 0.0,
        };
        // 2 cols x 1 row = 2x2 pixels, scale 1
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let left = &buf[(0, 0)];
        let right = &buf[(1, 0)];
        assert_eq!(left.symbol(), "▀");
        assert_eq!(left.fg, Color::Rgb(0, 0, 0));
        assert_eq!(right.fg, Color::Rgb(0, 255, 0));
        assert_eq!(right.bg, Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_rotation_moves_far_column_to_bottom() {
        let raster = checker_raster();
        let widget = RasterWidget {
            raster: &raster,
            rotation_degrees: 90.0,
        };
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        // Clockwise quarter turn: right column becomes the bottom row
        let cell = &buf[(0, 0)];
        assert_eq!(cell.fg, Color::Rgb(0, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_status_bar_truncates() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        StatusBar { message: "abcdefgh" }.render(area, &mut buf);
        assert_eq!(buf[(3, 0)].symbol(), "d");
    }
}
