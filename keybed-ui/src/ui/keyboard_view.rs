//! The instrument screen: a control panel over a row of 13 keys.
//!
//! Both rows share the full width, split into equal columns, so the layout
//! reads like a touchscreen grid with one cell per key.

use keybed_types::{InstrumentState, Key, PlayRequest, Waveform, KEY_COUNT, MAX_VOLUME};

use super::piano_keyboard::char_for_key;
use super::{Color, Rect, RenderBuf, Style};

const VOLUME_LABEL: &str = "Volume ";
const WAVE_LABEL: &str = "Wave   ";
const HELP: &str = "[a..k] play  [-/+] volume  [Tab] wave  [q] quit";

/// Screen regions, computed from the terminal area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLayout {
    pub panel: Rect,
    pub volume_bar: Rect,
    pub waveforms: [Rect; 3],
    pub status: Rect,
    pub help: Rect,
    pub keys: [Rect; KEY_COUNT],
}

/// What to draw.
pub struct ViewState<'a> {
    pub instrument: &'a InstrumentState,
    pub keys: &'a [Key; KEY_COUNT],
    pub held: [bool; KEY_COUNT],
    pub last_note: Option<(Key, PlayRequest)>,
    pub status: &'a str,
}

impl ViewLayout {
    pub fn new(area: Rect) -> Self {
        // border
        let inner = Rect::new(
            area.x.saturating_add(1),
            area.y.saturating_add(1),
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        let panel_height = (inner.height / 2).max(4).min(inner.height);
        let panel = Rect::new(inner.x, inner.y, inner.width, panel_height);
        let keys_area = Rect::new(
            inner.x,
            inner.y + panel_height,
            inner.width,
            inner.height - panel_height,
        );

        let row = |i: u16| Rect::new(panel.x + 1, panel.y + i, panel.width.saturating_sub(2), 1);

        let bar_x = panel.x + 1 + VOLUME_LABEL.len() as u16;
        let bar_width = panel.width.saturating_sub(VOLUME_LABEL.len() as u16 + 8).min(40);
        let volume_bar = Rect::new(bar_x, panel.y, bar_width, 1.min(panel.height));

        let mut waveforms = [Rect::default(); 3];
        let mut x = panel.x + 1 + WAVE_LABEL.len() as u16;
        for (slot, w) in waveforms.iter_mut().zip(Waveform::ALL) {
            let width = w.label().len() as u16 + 2;
            *slot = Rect::new(x, panel.y + 1, width, 1);
            x += width + 1;
        }

        let mut keys = [Rect::default(); KEY_COUNT];
        let n = KEY_COUNT as u32;
        for (i, slot) in keys.iter_mut().enumerate() {
            let i = i as u32;
            let x0 = keys_area.x as u32 + i * keys_area.width as u32 / n;
            let x1 = keys_area.x as u32 + (i + 1) * keys_area.width as u32 / n;
            *slot = Rect::new(x0 as u16, keys_area.y, (x1 - x0) as u16, keys_area.height);
        }

        Self {
            panel,
            volume_bar,
            waveforms,
            status: row(2),
            help: row(3),
            keys,
        }
    }

    /// Key under a terminal cell.
    pub fn hit_key(&self, column: u16, row: u16) -> Option<Key> {
        self.keys
            .iter()
            .position(|r| contains(r, column, row))
            .and_then(|i| Key::new(i as u8))
    }

    pub fn hit_waveform(&self, column: u16, row: u16) -> Option<Waveform> {
        self.waveforms
            .iter()
            .zip(Waveform::ALL)
            .find(|(r, _)| contains(r, column, row))
            .map(|(_, w)| w)
    }

    /// Volume for a click on the bar: silent at the left-most cell, full
    /// volume at the right-most.
    pub fn hit_volume(&self, column: u16, row: u16) -> Option<u8> {
        if !contains(&self.volume_bar, column, row) {
            return None;
        }
        let last = self.volume_bar.width.saturating_sub(1) as u32;
        if last == 0 {
            return Some(MAX_VOLUME);
        }
        let pos = (column - self.volume_bar.x) as u32;
        Some((pos * MAX_VOLUME as u32 / last) as u8)
    }
}

fn contains(r: &Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

pub fn render(area: Rect, buf: &mut RenderBuf, view: &ViewState) {
    let border = Style::new().fg(Color::MAGENTA);
    buf.draw_block(area, " KEYBED ", border);
    let layout = ViewLayout::new(area);
    render_panel(&layout, buf, view);
    render_keys(&layout, buf, view);
}

fn render_panel(layout: &ViewLayout, buf: &mut RenderBuf, view: &ViewState) {
    let panel = layout.panel;
    if panel.height == 0 {
        return;
    }
    let label = Style::new().fg(Color::GRAY);

    // volume
    let volume = view.instrument.volume;
    buf.draw_str(panel.x + 1, panel.y, VOLUME_LABEL, label);
    let bar = layout.volume_bar;
    let filled = (bar.width as u32 * volume as u32 / MAX_VOLUME as u32) as u16;
    for i in 0..bar.width {
        let (ch, color) = if i < filled { ('█', Color::meter(volume)) } else { ('░', Color::DARK_GRAY) };
        buf.draw_str(bar.x + i, bar.y, &ch.to_string(), Style::new().fg(color));
    }
    buf.draw_str(bar.x + bar.width + 1, bar.y, &format!("{:>3}%", volume), Style::new().fg(Color::WHITE));

    // waveform selector
    if panel.height > 1 {
        buf.draw_str(panel.x + 1, panel.y + 1, WAVE_LABEL, label);
        for (rect, w) in layout.waveforms.iter().zip(Waveform::ALL) {
            let style = if w == view.instrument.waveform {
                Style::new().fg(Color::WHITE).bg(Color::SELECTION_BG).bold()
            } else {
                Style::new().fg(Color::SKY_BLUE)
            };
            buf.draw_str(rect.x, rect.y, &format!(" {} ", w.label()), style);
        }
    }

    // last note + status
    if panel.height > 2 {
        let note = match view.last_note {
            Some((key, req)) => format!(
                "{:<2} {:>7.2} Hz  gain {:.2}  {}",
                key.name(),
                req.frequency,
                req.gain,
                req.waveform.synth_name()
            ),
            None => "-".to_string(),
        };
        let held = format!("  held {}", view.instrument.held_keys());
        buf.draw_line(
            layout.status,
            &[
                (&note, Style::new().fg(Color::GOLD)),
                (&held, Style::new().fg(Color::CYAN)),
                ("  ", Style::new()),
                (view.status, Style::new().fg(Color::DARK_GRAY)),
            ],
        );
    }

    if panel.height > 3 {
        buf.draw_line(layout.help, &[(HELP, Style::new().fg(Color::DARK_GRAY))]);
    }
}

fn render_keys(layout: &ViewLayout, buf: &mut RenderBuf, view: &ViewState) {
    for (i, (rect, key)) in layout.keys.iter().zip(view.keys.iter()).enumerate() {
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let (face, text) = Color::key_colors(key.is_sharp(), view.held[i]);

        // one-column gap between keys
        let body = Rect::new(rect.x, rect.y, rect.width.saturating_sub(1).max(1), rect.height);
        buf.fill(body, Style::new().bg(face));

        let style = Style::new().fg(text).bg(face).bold();
        let bottom = body.y + body.height.saturating_sub(1);
        buf.draw_str(body.x, bottom.saturating_sub(1), key.name(), style);
        buf.draw_str(body.x, bottom, &char_for_key(*key).to_string(), Style::new().fg(text).bg(face));
    }
}
