//! Dashboard frame rendering.
//!
//! Turns a [`FrameModel`] into styled lines and draws them as one
//! paragraph, shifted by the navigator's scroll offset.

use anyhow::Result;
use chrono::Local;
use ratatui::{
    backend::TestBackend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::{FrameModel, TableRow};
use crate::ui::Theme;

/// Width of the element name column.
const NAME_WIDTH: usize = 24;
/// Indent of pad names under their element.
const PAD_INDENT: usize = 4;
/// Width of the proctime, average and queue columns together.
const ELEMENT_METRICS_WIDTH: usize = 62;
/// Width of the horizontal rules.
const RULE_WIDTH: usize = NAME_WIDTH + ELEMENT_METRICS_WIDTH + 40;
/// Column of the clock on the debug line.
const CLOCK_COLUMN: usize = 63;

// Minimum terminal size for usable display
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 8;

/// Render one dashboard frame.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, area.height / 2, area.width, area.height - area.height / 2);
        frame.render_widget(paragraph, centered);
        return;
    }

    let model = app.frame_model(Local::now());
    let lines = frame_lines(&model, &app.theme, &help_hint(app));
    let skip = u16::try_from(app.navigator.scroll_offset().unsigned_abs()).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), area);
}

/// Render one frame into plain text, one line per terminal row.
pub fn render_to_string(app: &App, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|frame| render(frame, app))?;

    let buffer = terminal.backend().buffer();
    let text = buffer
        .content
        .chunks(usize::from(width.max(1)))
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text.trim_end().to_string())
}

/// Render the whole frame as plain text, tall enough for every line and
/// never below the minimum terminal size.
pub fn dump_to_string(app: &App, width: u16) -> Result<String> {
    let lines = app.frame_model(Local::now()).line_count();
    let height = u16::try_from(lines).unwrap_or(u16::MAX).max(MIN_HEIGHT);
    render_to_string(app, width.max(MIN_WIDTH), height)
}

fn help_hint(app: &App) -> String {
    format!(
        "  ←/→ sibling  ↓ pads  ↑ elements  space peer  [/] scroll  refresh {}",
        format_duration(app.frame_interval)
    )
}

/// Build every line of a frame, top to bottom.
pub fn frame_lines(model: &FrameModel, theme: &Theme, hint: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(model.line_count());

    let key = format!("{:36}key {}", "", model.last_key);
    lines.push(Line::from(vec![
        Span::raw(format!("{:<width$}", key, width = CLOCK_COLUMN)),
        Span::styled(model.clock.clone(), theme.label),
    ]));

    let mut help = vec![
        Span::styled("Press 'q' or 'Q' to quit", theme.inverted),
        Span::raw(hint.to_string()),
    ];
    if let Some(ref err) = model.error {
        help.push(Span::styled(format!("  {}", err), theme.error));
    }
    lines.push(Line::from(help));
    lines.push(rule(theme));

    lines.push(Line::styled("CPU Usage", theme.title));
    for (index, load) in model.cpu_loads.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<11}", format!("CPU{:2}", index)), theme.label),
            Span::raw(format!("{:3.1}%", load)),
        ]));
    }
    lines.push(rule(theme));

    lines.push(Line::styled(
        format!(
            "{:<name$}{:>20} {:>20} {:>20}{:>20}{:>20}",
            "ElementName",
            "Proctime(ns)",
            "Avg_proctime(ns)",
            "Queue/Max",
            "Datarate",
            "Buffer",
            name = NAME_WIDTH
        ),
        theme.title,
    ));

    for row in &model.rows {
        lines.push(table_line(row, theme));
    }
    lines
}

fn rule(theme: &Theme) -> Line<'static> {
    Line::styled("-".repeat(RULE_WIDTH), theme.rule)
}

fn table_line(row: &TableRow, theme: &Theme) -> Line<'static> {
    match row {
        TableRow::Element(e) => Line::from(vec![
            Span::styled(
                format!("{:<w$.w$}", e.name, w = NAME_WIDTH),
                theme.element_style(e.selected),
            ),
            Span::raw(format!(
                "{:>20} {:>20.3} {:>17}/{:<2}",
                e.proctime, e.avg_proctime, e.queue_level, e.max_queue_level
            )),
        ]),
        TableRow::Pad(p) => Line::from(vec![
            Span::raw(" ".repeat(PAD_INDENT)),
            Span::styled(
                format!("{:<w$.w$}", p.name, w = NAME_WIDTH - PAD_INDENT),
                theme.pad_style(p.highlight),
            ),
            Span::raw(format!(
                "{:w$}{:>20.2}{:>20}",
                "",
                p.datarate,
                p.buffer_size,
                w = ELEMENT_METRICS_WIDTH
            )),
        ]),
    }
}
