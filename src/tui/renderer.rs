//! Personal menu view
//!
//! Draws the shared state: a header line, the panel body and a status line.
//! Wide terminals show every section side by side. Narrow terminals show a
//! tab bar over a horizontal strip of sections, scrolled by the pager's
//! current offset.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::core::{PanelState, Section};
use crate::ui_backend::{SharedState, WidgetStatus};

use super::markup::html_to_lines;
use super::theme::Theme;

/// One line of a section, single-styled
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLine {
    pub text: String,
    pub style: Style,
}

impl SectionLine {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Lines a section renders: its title, then each of its widget regions
pub fn section_lines(state: &SharedState, section: Section, theme: &Theme) -> Vec<SectionLine> {
    let mut lines = vec![SectionLine::new(
        section.title(),
        Style::default()
            .fg(theme.blue)
            .add_modifier(Modifier::BOLD),
    )];

    for widget in section.widgets() {
        let Some(region) = state.region(*widget) else {
            continue;
        };
        if section.widgets().len() > 1 {
            lines.push(SectionLine::new(
                widget.title(),
                Style::default().fg(theme.text_primary).add_modifier(Modifier::UNDERLINED),
            ));
        }

        match &region.status {
            WidgetStatus::Loading if region.content.is_empty() => {
                lines.push(SectionLine::new("loading…", Style::default().fg(theme.text_muted)));
            }
            WidgetStatus::Failed(_) => {
                lines.push(SectionLine::new(
                    "offline, showing stored content",
                    Style::default().fg(theme.yellow),
                ));
            }
            WidgetStatus::ServerError(message) => {
                lines.push(SectionLine::new(message.clone(), Style::default().fg(theme.red)));
            }
            _ => {}
        }

        let body_style = if region.from_cache && region.status == WidgetStatus::Loading {
            Style::default().fg(theme.text_muted)
        } else {
            Style::default().fg(theme.text_primary)
        };
        lines.extend(
            html_to_lines(&region.content)
                .into_iter()
                .map(|text| SectionLine::new(text, body_style)),
        );
    }
    lines
}

/// Fit text into exactly `width` columns
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Logical pixels to terminal cells, saturating at the widest a buffer can be
fn cells(px: u32, px_per_cell: u32) -> u16 {
    u16::try_from(px / px_per_cell.max(1)).unwrap_or(u16::MAX)
}

/// The personal menu view widget
pub struct MenuView<'a> {
    state: &'a SharedState,
    theme: &'a Theme,
    breakpoint_px: u32,
    px_per_column: u32,
    px_per_row: u32,
}

impl<'a> MenuView<'a> {
    pub fn new(state: &'a SharedState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            breakpoint_px: 992,
            px_per_column: 8,
            px_per_row: 16,
        }
    }

    pub fn breakpoint(mut self, px: u32) -> Self {
        self.breakpoint_px = px;
        self
    }

    pub fn cell_size(mut self, px_per_column: u32, px_per_row: u32) -> Self {
        self.px_per_column = px_per_column.max(1);
        self.px_per_row = px_per_row.max(1);
        self
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let (label, color) = match self.state.panel() {
            PanelState::Open => ("open", self.theme.green),
            PanelState::Closed => ("closed", self.theme.text_muted),
        };
        let mut spans = vec![
            Span::styled(
                " Personal menu ",
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("[{}]", label), Style::default().fg(color)),
        ];
        if let Some(location) = self.state.location() {
            spans.push(Span::styled(
                format!("  redirected to {}", location),
                Style::default().fg(self.theme.yellow),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let line = match self.state.latest_notification() {
            Some(toast) => Line::from(Span::styled(
                format!(" {}", toast.message),
                Style::default().fg(self.theme.red),
            )),
            None => Line::from(Span::styled(
                " p: toggle  1-5/←/→: sections  q: quit",
                Style::default().fg(self.theme.text_muted),
            )),
        };
        Paragraph::new(line).render(area, buf);
    }

    fn render_columns(&self, area: Rect, buf: &mut Buffer) {
        let order = self.state.geometry().paged_sections();
        let constraints = vec![Constraint::Ratio(1, order.len() as u32); order.len()];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (section, column) in order.iter().zip(columns.iter()) {
            let lines: Vec<Line> = section_lines(self.state, *section, self.theme)
                .into_iter()
                .map(|l| Line::from(Span::styled(l.text, l.style)))
                .collect();
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::LEFT)
                        .border_style(Style::default().fg(self.theme.border)),
                )
                .render(*column, buf);
        }
    }

    fn render_paged(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let geometry = self.state.geometry();
        let order = geometry.paged_sections();
        let selected = self
            .state
            .active_tab()
            .and_then(|tab| order.iter().position(|s| *s == tab))
            .unwrap_or(0);
        Tabs::new(order.iter().map(|s| s.title()))
            .select(selected)
            .style(Style::default().fg(self.theme.text_muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.border_focused)
                    .add_modifier(Modifier::BOLD),
            )
            .render(chunks[0], buf);

        let section_cols = (geometry.section_width() / self.px_per_column).max(1) as usize;
        let columns: Vec<Vec<SectionLine>> = order
            .iter()
            .map(|section| section_lines(self.state, *section, self.theme))
            .collect();
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

        let strip: Vec<Line> = (0..rows)
            .map(|row| {
                Line::from(
                    columns
                        .iter()
                        .map(|lines| match lines.get(row) {
                            Some(line) => Span::styled(fit(&line.text, section_cols), line.style),
                            None => Span::raw(" ".repeat(section_cols)),
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let pager = self.state.pager();
        let (scroll_x, body) = match pager.content_style {
            Some(style) => {
                let visible_rows = cells(style.height, self.px_per_row);
                let height = visible_rows.min(chunks[1].height);
                let body = Rect {
                    height,
                    ..chunks[1]
                };
                (cells(style.offset_left, self.px_per_column), body)
            }
            None => (0, chunks[1]),
        };
        Paragraph::new(strip)
            .scroll((cells(pager.scroll_top, self.px_per_row), scroll_x))
            .render(body, buf);
    }
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_status(chunks[2], buf);

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(if self.state.panel_focused() {
                self.theme.border_focused
            } else {
                self.theme.border
            }));
        let body = block.inner(chunks[1]);
        block.render(chunks[1], buf);

        if !self.state.panel().is_open() {
            Paragraph::new(Line::from(Span::styled(
                "Press p to open the personal menu",
                Style::default().fg(self.theme.text_muted),
            )))
            .render(body, buf);
            return;
        }

        if self.state.geometry().viewport.width >= self.breakpoint_px {
            self.render_columns(body, buf);
        } else {
            self.render_paged(body, buf);
        }
    }
}
