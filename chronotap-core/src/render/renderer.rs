//! Dirty-region renderer
//!
//! Keeps the last frame it pushed to the panel and, when due, redraws only
//! the fields whose content changed. Each field is rasterised into the
//! scratch `Canvas` and pushed with one `draw_region` call.

use chronotap_display::{Canvas, DisplayBackend, DisplayError, Rect};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Primitive, Size};
use embedded_graphics::primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_graphics::Drawable;

use crate::time::Tick;

use super::frame::DisplayFrame;
use super::layout::{
    Field, Layout, BACKGROUND, BUTTON_BORDER, BUTTON_FILL, BUTTON_TEXT, CLEAR_STRIP_ROWS,
    DOT_COLOR, RESET_LABEL, SCREEN_HEIGHT, SCREEN_WIDTH, STATUS_COLOR, TIME_IDLE_COLOR,
    TIME_RUNNING_COLOR, TITLE, TITLE_COLOR,
};

/// Result of one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderReport {
    /// Regions pushed to the panel
    pub regions: u8,
    /// Regions whose push failed; they stay dirty
    pub failed: u8,
    pub last_error: Option<DisplayError>,
}

impl RenderReport {
    fn record(&mut self, result: Result<(), DisplayError>) -> bool {
        match result {
            Ok(()) => {
                self.regions += 1;
                true
            }
            Err(e) => {
                self.failed += 1;
                self.last_error = Some(e);
                false
            }
        }
    }
}

/// Rate-limited partial redraw of `DisplayFrame`s
pub struct Renderer {
    layout: Layout,
    interval_ms: u32,
    degraded: bool,
    /// Static decoration (background, title, buttons) is on screen
    decorated: bool,
    /// Last frame pushed; fields in `stale` do not match the panel
    shown: Option<DisplayFrame>,
    stale: u8,
    last_render: Option<Tick>,
    canvas: Canvas,
}

impl Renderer {
    pub const fn new(layout: Layout, interval_ms: u32) -> Self {
        Self {
            layout,
            interval_ms,
            degraded: false,
            decorated: false,
            shown: None,
            stale: 0,
            last_render: None,
            canvas: Canvas::new(),
        }
    }

    /// Minimum spacing between redraws, doubled in degraded mode
    pub fn min_interval_ms(&self) -> u32 {
        if self.degraded {
            self.interval_ms.saturating_mul(2)
        } else {
            self.interval_ms
        }
    }

    /// Check if enough time has passed since the last redraw
    pub fn is_due(&self, now: Tick) -> bool {
        match self.last_render {
            None => true,
            Some(last) => now.wrapping_since(last) >= self.min_interval_ms(),
        }
    }

    pub fn set_degraded(&mut self, degraded: bool) {
        self.degraded = degraded;
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Free the scratch raster; the next redraw reallocates it
    pub fn release_scratch(&mut self) {
        self.canvas.release();
    }

    /// Heap bytes held by the scratch raster
    pub fn scratch_bytes(&self) -> usize {
        self.canvas.capacity_bytes()
    }

    /// Check if any field still differs from what the panel shows
    pub fn needs_redraw(&self, candidate: &DisplayFrame) -> bool {
        !self.decorated || self.dirty_mask(candidate) != 0
    }

    /// Redraw changed fields if the rate cap allows
    ///
    /// Returns `None` when not due or nothing changed.
    pub fn render<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        now: Tick,
        candidate: &DisplayFrame,
    ) -> Option<RenderReport> {
        if !self.is_due(now) || !self.needs_redraw(candidate) {
            return None;
        }

        let mut report = RenderReport::default();
        self.last_render = Some(now);

        if !self.decorated {
            if !report.record(self.draw_decoration(display)) {
                return Some(report);
            }
            self.decorated = true;
            self.shown = None;
        }

        let dirty = self.dirty_mask(candidate);
        let mut stale = 0;
        for field in Field::ALL {
            if dirty & field.bit() == 0 {
                continue;
            }
            let result = self.draw_field(display, field, candidate);
            if !report.record(result) {
                stale |= field.bit();
            }
        }

        self.shown = Some(candidate.clone());
        self.stale = stale;
        Some(report)
    }

    fn dirty_mask(&self, candidate: &DisplayFrame) -> u8 {
        match &self.shown {
            None => Field::ALL.iter().fold(0, |mask, f| mask | f.bit()),
            Some(shown) => Field::ALL
                .iter()
                .filter(|f| shown.differs(candidate, **f))
                .fold(self.stale, |mask, f| mask | f.bit()),
        }
    }

    /// Background, title and both button faces
    fn draw_decoration<D: DisplayBackend>(&mut self, display: &mut D) -> Result<(), DisplayError> {
        let mut y = 0;
        while y < SCREEN_HEIGHT {
            let rows = CLEAR_STRIP_ROWS.min(SCREEN_HEIGHT - y);
            self.canvas.prepare(SCREEN_WIDTH, rows, BACKGROUND)?;
            display.draw_region(Rect::new(0, y, SCREEN_WIDTH, rows), self.canvas.pixels())?;
            y += rows;
        }

        let title = self.layout.title;
        self.draw_text(
            display,
            title,
            TITLE,
            &FONT_10X20,
            TITLE_COLOR,
            BACKGROUND,
            Alignment::Center,
        )?;

        self.draw_button(display, self.layout.start_stop, None)?;
        self.draw_button(display, self.layout.reset, Some(RESET_LABEL))
    }

    fn draw_field<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        field: Field,
        frame: &DisplayFrame,
    ) -> Result<(), DisplayError> {
        let area = self.layout.field_rect(field);
        match field {
            Field::Time => {
                let color = if frame.state.is_running() {
                    TIME_RUNNING_COLOR
                } else {
                    TIME_IDLE_COLOR
                };
                self.draw_text(
                    display,
                    area,
                    &frame.time,
                    &FONT_10X20,
                    color,
                    BACKGROUND,
                    Alignment::Center,
                )
            }
            Field::Dot => {
                self.canvas.prepare(area.width, area.height, BACKGROUND)?;
                if frame.dot {
                    let center = Point::new(area.width as i32 / 2, area.height as i32 / 2);
                    let _ = Circle::with_center(center, 11)
                        .into_styled(PrimitiveStyle::with_fill(DOT_COLOR))
                        .draw(&mut self.canvas);
                }
                display.draw_region(area, self.canvas.pixels())
            }
            Field::StartLabel => self.draw_text(
                display,
                area,
                frame.start_label(),
                &FONT_10X20,
                BUTTON_TEXT,
                BUTTON_FILL,
                Alignment::Center,
            ),
            Field::Status => {
                let text = frame.status_text();
                self.draw_text(
                    display,
                    area,
                    &text,
                    &FONT_6X10,
                    STATUS_COLOR,
                    BACKGROUND,
                    Alignment::Left,
                )
            }
            Field::Light => {
                let text = frame.light_text();
                self.draw_text(
                    display,
                    area,
                    &text,
                    &FONT_6X10,
                    STATUS_COLOR,
                    BACKGROUND,
                    Alignment::Left,
                )
            }
        }
    }

    /// Filled button with a one-pixel border and optional centered label
    fn draw_button<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        area: Rect,
        label: Option<&str>,
    ) -> Result<(), DisplayError> {
        self.canvas.prepare(area.width, area.height, BUTTON_FILL)?;
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(BUTTON_BORDER)
            .stroke_width(1)
            .fill_color(BUTTON_FILL)
            .build();
        let _ = Rectangle::new(Point::zero(), Size::new(area.width as u32, area.height as u32))
            .into_styled(style)
            .draw(&mut self.canvas);
        if let Some(label) = label {
            let center = Point::new(area.width as i32 / 2, area.height as i32 / 2);
            let _ = Text::with_text_style(
                label,
                center,
                MonoTextStyle::new(&FONT_10X20, BUTTON_TEXT),
                TextStyleBuilder::new()
                    .alignment(Alignment::Center)
                    .baseline(Baseline::Middle)
                    .build(),
            )
            .draw(&mut self.canvas);
        }
        display.draw_region(area, self.canvas.pixels())
    }

    /// Fill `area` with `background` and draw one line of text in it
    #[allow(clippy::too_many_arguments)]
    fn draw_text<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        area: Rect,
        text: &str,
        font: &MonoFont<'_>,
        color: Rgb565,
        background: Rgb565,
        alignment: Alignment,
    ) -> Result<(), DisplayError> {
        self.canvas.prepare(area.width, area.height, background)?;

        let middle = area.height as i32 / 2;
        let anchor = match alignment {
            Alignment::Left => Point::new(5, middle),
            Alignment::Center => Point::new(area.width as i32 / 2, middle),
            Alignment::Right => Point::new(area.width as i32 - 5, middle),
        };
        let _ = Text::with_text_style(
            text,
            anchor,
            MonoTextStyle::new(font, color),
            TextStyleBuilder::new()
                .alignment(alignment)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(&mut self.canvas);

        display.draw_region(area, self.canvas.pixels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StopwatchConfig;
    use crate::render::frame::FrameStyle;
    use crate::state::StopwatchState;
    use crate::testing::RecordingDisplay;
    use crate::timing::TimeFormat;

    const STYLE: FrameStyle = FrameStyle {
        format: TimeFormat::Full,
        show_milliseconds: true,
        show_light: true,
    };

    fn renderer() -> Renderer {
        Renderer::new(Layout::new(&StopwatchConfig::default().buttons), 100)
    }

    fn display() -> RecordingDisplay {
        let mut d = RecordingDisplay::new();
        d.init().unwrap();
        d
    }

    fn frame(ms: u64, state: StopwatchState) -> DisplayFrame {
        DisplayFrame::build(ms, state, Some(3000), &STYLE)
    }

    #[test]
    fn test_first_render_paints_everything() {
        let mut r = renderer();
        let mut d = display();
        let report = r.render(&mut d, Tick(0), &frame(0, StopwatchState::Idle)).unwrap();
        assert_eq!(report.failed, 0);
        // Decoration counts as one, then all five fields
        assert_eq!(report.regions, 6);
        // 15 background strips + title + 2 buttons + 5 fields
        assert_eq!(d.regions.len(), 15 + 3 + 5);
        // Title pixels are yellow somewhere in its band
        assert!((0..SCREEN_WIDTH).any(|x| d.pixel(x, 8 + 12) == TITLE_COLOR));
    }

    #[test]
    fn test_identical_frame_is_not_redrawn() {
        let mut r = renderer();
        let mut d = display();
        let f = frame(0, StopwatchState::Idle);
        r.render(&mut d, Tick(0), &f);
        d.clear_log();

        assert_eq!(r.render(&mut d, Tick(500), &f), None);
        assert!(d.regions.is_empty());
    }

    #[test]
    fn test_only_changed_fields_are_pushed() {
        let mut r = renderer();
        let mut d = display();
        r.render(&mut d, Tick(0), &frame(2000, StopwatchState::Stopped));
        d.clear_log();

        // Only the time text moves
        let report = r
            .render(&mut d, Tick(200), &frame(2001, StopwatchState::Stopped))
            .unwrap();
        assert_eq!(report.regions, 1);
        assert_eq!(d.regions, vec![r.layout.time]);
    }

    #[test]
    fn test_rate_cap() {
        let mut r = renderer();
        let mut d = display();
        r.render(&mut d, Tick(1000), &frame(0, StopwatchState::Idle));
        assert!(!r.is_due(Tick(1099)));
        assert_eq!(
            r.render(&mut d, Tick(1050), &frame(1, StopwatchState::Idle)),
            None
        );
        assert!(r.is_due(Tick(1100)));

        r.set_degraded(true);
        assert!(!r.is_due(Tick(1150)));
        assert!(r.is_due(Tick(1200)));
    }

    #[test]
    fn test_rate_cap_across_counter_wrap() {
        let mut r = renderer();
        let mut d = display();
        r.render(&mut d, Tick(u32::MAX - 20), &frame(0, StopwatchState::Idle));
        assert!(!r.is_due(Tick(30)));
        assert!(r.is_due(Tick(79)));
    }

    #[test]
    fn test_failed_region_is_retried() {
        let mut r = renderer();
        let mut d = display();
        r.render(&mut d, Tick(0), &frame(0, StopwatchState::Idle));
        d.clear_log();

        d.fail_draws = 1;
        let f = frame(5, StopwatchState::Idle);
        let report = r.render(&mut d, Tick(100), &f).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.last_error, Some(DisplayError::Communication));
        assert!(r.needs_redraw(&f));

        // Same content, but the time field is still owed to the panel
        let report = r.render(&mut d, Tick(200), &f).unwrap();
        assert_eq!(report.regions, 1);
        assert_eq!(d.regions, vec![r.layout.time]);
        assert!(!r.needs_redraw(&f));
    }

    #[test]
    fn test_failed_decoration_retried_next_time() {
        let mut r = renderer();
        let mut d = display();
        d.fail_draws = 1;
        let f = frame(0, StopwatchState::Idle);
        let report = r.render(&mut d, Tick(0), &f).unwrap();
        assert_eq!(report.failed, 1);
        assert!(d.regions.is_empty());

        let report = r.render(&mut d, Tick(100), &f).unwrap();
        assert_eq!(report.failed, 0);
        assert_eq!(report.regions, 6);
    }

    #[test]
    fn test_start_transition_redraws_label_status_and_time() {
        let mut r = renderer();
        let mut d = display();
        r.render(&mut d, Tick(0), &frame(0, StopwatchState::Idle));
        d.clear_log();

        r.render(&mut d, Tick(100), &frame(0, StopwatchState::Running));
        let rects = &d.regions;
        assert!(rects.contains(&r.layout.time));
        assert!(rects.contains(&r.layout.field_rect(Field::StartLabel)));
        assert!(rects.contains(&r.layout.status));
        assert!(!rects.contains(&r.layout.light));
    }

    #[test]
    fn test_release_scratch_frees_heap() {
        let mut r = renderer();
        let mut d = display();
        r.render(&mut d, Tick(0), &frame(0, StopwatchState::Idle));
        assert!(r.scratch_bytes() > 0);
        r.release_scratch();
        assert_eq!(r.scratch_bytes(), 0);

        // Still renders afterwards
        let report = r.render(&mut d, Tick(100), &frame(7, StopwatchState::Idle)).unwrap();
        assert_eq!(report.regions, 1);
    }
}
