//! Interactive skyline view: routes terminal input to the scene and paints
//! frames onto a [`Canvas`].

use std::io::{self, Write};
use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{debug, info};

use crate::graphics::Canvas;
use crate::palette::Rgb;
use crate::render::{build_frame, Frame, FrameStats};
use crate::state::{SceneState, SLIDER_STEP};

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

const OVERLAY: Rgb = Rgb::WHITE;

/// Skyline view bound to a terminal-sized canvas
pub struct SkylineWidget {
    state: SceneState,
    canvas: Canvas,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    stats: FrameStats,
}

impl SkylineWidget {
    pub fn new(state: SceneState, cols: u16, rows: u16) -> Self {
        let canvas = Canvas::new(cols, rows, &state.viewport);
        SkylineWidget {
            state,
            canvas,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Handle a terminal event
    pub fn event(&mut self, event: &Event) -> Control {
        match event {
            Event::Key(key) => return self.key(key),
            Event::Mouse(mouse) => self.mouse(mouse),
            Event::Resize(cols, rows) => {
                debug!("resized to {cols}x{rows}");
                self.canvas.resize(*cols, *rows, &self.state.viewport);
            }
            _ => {}
        }
        Control::Continue
    }

    fn key(&mut self, key: &KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        let s = &mut self.state;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => s.reset_camera(),
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                if let Some(name) = s.apply_preset(index) {
                    info!("view {name}");
                }
            }
            KeyCode::Char('[') => s.adjust_time_of_day(-SLIDER_STEP),
            KeyCode::Char(']') => s.adjust_time_of_day(SLIDER_STEP),
            KeyCode::Char('-') => s.adjust_wind(-SLIDER_STEP),
            KeyCode::Char('=') | KeyCode::Char('+') => s.adjust_wind(SLIDER_STEP),
            KeyCode::Char('w') | KeyCode::Char('W') => {
                let mode = s.cycle_weather();
                info!("weather {mode}");
            }
            KeyCode::Char('a') | KeyCode::Char('A') => s.toggle_auto_rotate(),
            KeyCode::Char('l') | KeyCode::Char('L') => s.toggle_labels(),
            KeyCode::Char('m') | KeyCode::Char('M') => s.toggle_landmarks(),
            KeyCode::Char('p') | KeyCode::Char('P') => s.toggle_pause(),
            KeyCode::Char('d') | KeyCode::Char('D') => s.toggle_debug(),
            _ => {}
        }
        Control::Continue
    }

    fn mouse(&mut self, mouse: &MouseEvent) {
        let at = self.canvas.to_viewport(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let pan = mouse.modifiers.contains(KeyModifiers::SHIFT);
                self.state.pointer_down(at.x, at.y, pan);
            }
            // Shift-click is often taken by the terminal for selection
            MouseEventKind::Down(MouseButton::Right) => self.state.pointer_down(at.x, at.y, true),
            MouseEventKind::Drag(_) => self.state.pointer_move(at.x, at.y),
            MouseEventKind::Up(_) => self.state.pointer_up(),
            MouseEventKind::ScrollUp => self.state.wheel(-1.0),
            MouseEventKind::ScrollDown => self.state.wheel(1.0),
            _ => {}
        }
    }

    /// One simulation step
    pub fn tick(&mut self) {
        self.state.tick();
    }

    /// Paint the current frame and write the changed cells to `out`
    pub fn paint<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let frame = build_frame(&self.state);
        self.stats = frame.stats;
        self.canvas.draw_frame(&frame);

        self.canvas.text(1, 0, self.state.title, OVERLAY, 0.9);

        if self.state.display.debug {
            self.debug_overlay(&frame);
        }

        if self.state.display.paused {
            let text = "Paused";
            let (cols, rows) = self.canvas.size();
            let col = (cols as isize - text.len() as isize) / 2;
            self.canvas.text(col, rows as isize / 2, text, OVERLAY, 1.0);
        }

        self.canvas.flush(out)
    }

    fn debug_overlay(&mut self, frame: &Frame) {
        let camera = self.state.camera;
        let weather = &self.state.weather;
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("FPS: {:.2}", self.fps),
            format!(
                "Camera: yaw {:.2} pitch {:.2} zoom {:.2}",
                camera.yaw, camera.pitch, camera.zoom
            ),
            format!(
                "Weather: {} time {:.2} wind {:.2}",
                weather.mode(),
                weather.time_of_day(),
                weather.wind_speed()
            ),
            format!(
                "Objects: {} segments {} labels {}",
                self.stats.objects, self.stats.segments, self.stats.labels
            ),
            format!("Primitives: {}", primitive_mix(frame)),
        ];
        for (row, line) in lines.iter().enumerate() {
            self.canvas.text(1, row as isize + 2, line, OVERLAY, 1.0);
        }
    }
}

/// Primitive counts by kind, in first-seen order
fn primitive_mix(frame: &Frame) -> String {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for primitive in &frame.primitives {
        let kind = primitive.kind();
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
        .iter()
        .map(|(kind, n)| format!("{kind} {n}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SceneConfig;
    use crate::weather::WeatherMode;

    fn widget() -> SkylineWidget {
        SkylineWidget::new(SceneState::new(&SceneConfig::default()), 90, 26)
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        })
    }

    fn row_text(w: &SkylineWidget, row: u16) -> String {
        let (cols, _) = w.canvas().size();
        (0..cols)
            .filter_map(|col| w.canvas().cell(col, row).map(|cell| cell.ch))
            .collect()
    }

    #[test]
    fn quit_keys() {
        let mut w = widget();
        assert_eq!(w.event(&press(KeyCode::Char('q'))), Control::Quit);
        assert_eq!(w.event(&press(KeyCode::Esc)), Control::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(w.event(&ctrl_c), Control::Quit);
        assert_eq!(w.event(&press(KeyCode::Char('x'))), Control::Continue);
    }

    #[test]
    fn keys_drive_the_scene() {
        let mut w = widget();
        let time = w.state().weather.time_of_day();
        w.event(&press(KeyCode::Char('[')));
        assert!((w.state().weather.time_of_day() - (time - SLIDER_STEP)).abs() < 1e-12);
        w.event(&press(KeyCode::Char('w')));
        assert_eq!(w.state().weather.mode(), WeatherMode::Clear.next());
        w.event(&press(KeyCode::Char('p')));
        assert!(w.state().display.paused);
        w.event(&press(KeyCode::Char('d')));
        assert!(w.state().display.debug);
        w.event(&press(KeyCode::Char('a')));
        assert!(!w.state().controller.auto_rotate);
        w.event(&press(KeyCode::Char('2')));
        assert_eq!(w.state().camera.pitch, 0.8);
        w.event(&press(KeyCode::Char('r')));
        assert_eq!(w.state().camera, w.state().controller.home());
    }

    #[test]
    fn drag_rotates_and_wheel_zooms() {
        let mut w = widget();
        let camera = w.state().camera;
        w.event(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            10,
            10,
            KeyModifiers::NONE,
        ));
        w.event(&mouse(
            MouseEventKind::Drag(MouseButton::Left),
            20,
            10,
            KeyModifiers::NONE,
        ));
        w.event(&mouse(
            MouseEventKind::Up(MouseButton::Left),
            20,
            10,
            KeyModifiers::NONE,
        ));
        // Ten cells of 10 viewport units each
        assert!((w.state().camera.yaw - (camera.yaw + 100.0 * 0.004)).abs() < 1e-9);
        w.event(&mouse(MouseEventKind::ScrollUp, 0, 0, KeyModifiers::NONE));
        assert!(w.state().camera.zoom > camera.zoom);
    }

    #[test]
    fn shift_drag_pans() {
        let mut w = widget();
        w.event(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            10,
            10,
            KeyModifiers::SHIFT,
        ));
        w.event(&mouse(
            MouseEventKind::Drag(MouseButton::Left),
            10,
            12,
            KeyModifiers::SHIFT,
        ));
        assert!((w.state().camera.pan[1] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn paint_shows_title_and_pause() {
        let mut w = widget();
        w.event(&press(KeyCode::Char('p')));
        let written = w.paint(&mut Vec::<u8>::new()).unwrap();
        assert_eq!(written, 90 * 26);
        assert!(row_text(&w, 0).contains("NEW YORK CITY"));
        assert!(row_text(&w, 13).contains("Paused"));
    }

    #[test]
    fn debug_overlay_lists_camera() {
        let mut w = widget();
        w.event(&press(KeyCode::Char('d')));
        w.paint(&mut Vec::<u8>::new()).unwrap();
        assert!(row_text(&w, 2).contains(env!("CARGO_PKG_NAME")));
        assert!(row_text(&w, 4).contains("Camera: yaw"));
        assert!(row_text(&w, 7).contains("Primitives: sky 1"));
    }

    #[test]
    fn resize_follows_the_terminal() {
        let mut w = widget();
        w.event(&Event::Resize(120, 40));
        assert_eq!(w.canvas().size(), (120, 40));
    }
}
