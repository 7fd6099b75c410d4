//! UI rendering helpers for the terminal user interface.
//!
//! A pure view over `App`: nothing here mutates state. The event loop redraws
//! after playlist notifications and on every tick for the progress bar.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, PlaybackState};
use crate::config::{ControlsSettings, Theme};
use crate::playlist::{RepeatMode, Track};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("h/l", "prev/next"),
    ("enter", "play"),
    ("space/p", "play/pause"),
    ("gg/G", "top/bottom"),
    ("0-9", "jump"),
    ("+/-", "volume"),
    ("/", "search"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("d", "remove"),
    ("c", "clear"),
    ("n", "night mode"),
    ("i", "info"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(2, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::Gray,
            accent: Color::Blue,
            dim: Color::DarkGray,
        },
        Theme::Dark => Palette {
            fg: Color::Gray,
            bg: Color::Black,
            accent: Color::Magenta,
            dim: Color::DarkGray,
        },
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format a row duration in seconds; `NaN` (not probed yet) renders as `--:--`.
fn format_secs(secs: f64) -> String {
    Duration::try_from_secs_f64(secs)
        .map(format_mmss)
        .unwrap_or_else(|_| "--:--".to_string())
}

fn repeat_text(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "REPEAT: Off",
        RepeatMode::All => "REPEAT: All",
        RepeatMode::One => "REPEAT: One",
    }
}

/// Human-readable byte count for the cover line.
fn format_bytes(n: usize) -> String {
    if n >= 1024 * 1024 {
        format!("{:.1} MiB", n as f64 / (1024.0 * 1024.0))
    } else if n >= 1024 {
        format!("{:.1} KiB", n as f64 / 1024.0)
    } else {
        format!("{n} B")
    }
}

fn cover_text(track: &Track) -> String {
    match track.cover() {
        Some(cover) => format!("Cover: {} ({})", cover.mime_type, format_bytes(cover.bytes.len())),
        None => "Cover: none".to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw(frame: &mut Frame, app: &App, display: &[usize], controls: &ControlsSettings) {
    let p = palette(app.theme);
    let base = Style::default().fg(p.fg).bg(p.bg);
    frame.render_widget(Block::default().style(base), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, app, p, chunks[0]);
    draw_status(frame, app, p, chunks[1]);
    draw_now_playing(frame, app, p, chunks[2]);
    draw_list(frame, app, display, p, chunks[3]);

    if app.info_window {
        draw_info_popup(frame, app, p, chunks[3]);
    }

    let footer = Paragraph::new(controls_text(controls.scrub_seconds))
        .style(Style::default().fg(p.dim))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_header(frame: &mut Frame, app: &App, p: Palette, area: Rect) {
    let header = Paragraph::new(app.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(p.accent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn draw_status(frame: &mut Frame, app: &App, p: Palette, area: Rect) {
    let mut parts: Vec<String> = Vec::new();

    parts.push(
        match app.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
        .to_string(),
    );
    parts.push(repeat_text(app.playlist.repeat()).to_string());
    parts.push(format!(
        "SHUFFLE: {}",
        if app.playlist.shuffle() { "On" } else { "Off" }
    ));
    parts.push(format!("VOL: {}%", app.volume));

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let cursor = if app.filter_mode { "_" } else { "" };
        parts.push(format!("SEARCH: {q}{cursor}"));
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {}", dir.display()));
    }

    let mut lines = vec![Line::from(parts.join(" • "))];
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(p.accent),
        )));
    }

    let status = Paragraph::new(lines)
        .block(Block::bordered().padding(left_padded()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_now_playing(frame: &mut Frame, app: &App, p: Palette, area: Rect) {
    let block = Block::bordered().title(" now playing ").padding(left_padded());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = app.now_playing_index().and_then(|i| app.playlist.get(i)) else {
        frame.render_widget(
            Paragraph::new("Nothing playing").style(Style::default().fg(p.dim)),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            track.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {} • {}", track.artist(), track.album())),
        Span::styled(format!("  {}", cover_text(track)), Style::default().fg(p.dim)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let (elapsed, total) = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|info| (info.elapsed, info.total)))
        .unwrap_or((Duration::ZERO, None));
    let total = total.or(track.duration());

    let ratio = match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let label = match total {
        Some(t) => format!("{} / {}", format_mmss(elapsed), format_mmss(t)),
        None => format_mmss(elapsed),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(p.accent).bg(p.bg))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, rows[1]);
}

fn draw_list(frame: &mut Frame, app: &App, display: &[usize], p: Palette, area: Rect) {
    // Only build ListItems for the visible window, centered on the cursor.
    let total = display.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let playing = app.now_playing_index();
    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = display[start..end]
        .iter()
        .filter_map(|&i| app.rows.get(i).map(|row| (i, row)))
        .map(|(i, row)| {
            let marker = if playing == Some(i) { "♪ " } else { "  " };
            let title = format!("{marker}{} - {}", row.display_name, row.artist);
            let time = format_secs(row.duration_secs);
            let pad = width.saturating_sub(title.chars().count() + time.len());
            let style = if playing == Some(i) {
                Style::default().fg(p.accent)
            } else {
                Style::default()
            };
            ListItem::new(format!("{title}{}{time}", " ".repeat(pad))).style(style)
        })
        .collect();

    let title = format!(" tracks ({}) ", app.rows.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn info_text(track: &Track) -> String {
    let duration = track
        .duration()
        .map(format_mmss)
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nFile: {}\n{}\nRef: {}",
        track.display_name(),
        track.artist(),
        track.album(),
        duration,
        track.source().name(),
        cover_text(track),
        track.playable().locator(),
    )
}

fn draw_info_popup(frame: &mut Frame, app: &App, p: Palette, list_area: Rect) {
    let popup_area = centered_rect_sized(72, 10, list_area);
    frame.render_widget(Clear, popup_area);

    let text = app
        .playlist
        .get(app.selected)
        .map(info_text)
        .unwrap_or_else(|| "No track selected".to_string());
    let popup = Paragraph::new(text)
        .style(Style::default().fg(p.fg).bg(p.bg))
        .block(
            Block::default()
                .padding(left_padded())
                .borders(Borders::ALL)
                .title(" track info (i closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests;
