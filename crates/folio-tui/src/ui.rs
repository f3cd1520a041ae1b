use folio_core::{ContactField, ContactStatus, MarqueeEngine, Sender};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};

/// Colours shared by every panel. Built once, on the first render.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub muted: Color,
    pub user: Color,
    pub bot: Color,
    pub badge: Color,
    pub error: Color,
    pub success: Color,
    icons: [Color; 5],
}

impl Theme {
    pub fn new() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            user: Color::Cyan,
            bot: Color::Yellow,
            badge: Color::Red,
            error: Color::LightRed,
            success: Color::Green,
            icons: [
                Color::LightBlue,
                Color::LightYellow,
                Color::LightMagenta,
                Color::LightGreen,
                Color::LightCyan,
            ],
        }
    }

    fn icon(&self, index: usize) -> Color {
        self.icons[index % self.icons.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let theme = *app.theme.get_or_insert_with(Theme::new);
    let area = frame.area();

    let marquee_height = if app.marquee.is_some() { 3 } else { 0 };

    // Main layout: header, marquee, body, footer
    let [header_area, marquee_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(marquee_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, &theme, frame, header_area);

    if app.marquee.is_some() {
        app.marquee_area = Some(marquee_area);
        render_marquee(app, &theme, frame, marquee_area);
    } else {
        app.marquee_area = None;
    }

    match app.screen {
        Screen::Home => render_home(app, &theme, frame, body_area),
        Screen::Contact => render_contact(app, &theme, frame, body_area),
    }

    render_footer(app, &theme, frame, footer_area);

    if app.assistant.is_open() {
        render_assistant(app, &theme, frame, area);
    } else {
        app.chat_area = None;
    }
}

fn render_header(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", app.profile_name), Style::default().fg(theme.accent).bold()),
        Span::styled("| ", Style::default().fg(theme.muted)),
        Span::raw(app.typewriter.visible()),
        Span::styled("▌", Style::default().fg(theme.accent)),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

/// One terminal cell of the marquee strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripCell {
    /// Empty for the trailing half of a wide glyph
    pub symbol: String,
    pub logo: usize,
    pub icon: bool,
}

impl StripCell {
    fn blank(logo: usize) -> Self {
        Self {
            symbol: " ".to_string(),
            logo,
            icon: false,
        }
    }
}

/// Lay the whole strip out cell by cell, matching the engine's item widths.
pub fn strip_cells(engine: &MarqueeEngine) -> Vec<StripCell> {
    let options = engine.options();
    let mut cells = Vec::with_capacity(engine.rendered_width());

    for (logo, entry) in engine.strip().iter().enumerate() {
        cells.extend((0..options.gap).map(|_| StripCell::blank(logo)));

        let mut used = 0;
        for c in entry.icon.chars() {
            let symbol = c.to_string();
            let width = Span::raw(symbol.as_str()).width();
            if width == 0 || used + width > options.item_size {
                break;
            }
            cells.push(StripCell { symbol, logo, icon: true });
            for _ in 1..width {
                cells.push(StripCell { symbol: String::new(), logo, icon: true });
            }
            used += width;
        }
        cells.extend((used..options.item_size).map(|_| StripCell::blank(logo)));

        cells.push(StripCell::blank(logo));
        cells.extend(entry.title.chars().map(|c| StripCell {
            symbol: c.to_string(),
            logo,
            icon: false,
        }));
        cells.extend((0..options.gap).map(|_| StripCell::blank(logo)));
    }

    cells
}

/// The `width` cells starting at `start`, wrapping around the strip. Wide
/// glyphs cut by either edge become blanks.
pub fn visible_cells(cells: &[StripCell], start: usize, width: usize) -> Vec<StripCell> {
    if cells.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<StripCell> = (0..width)
        .map(|i| cells[(start + i) % cells.len()].clone())
        .collect();

    if let Some(first) = out.first_mut() {
        if first.symbol.is_empty() {
            *first = StripCell::blank(first.logo);
        }
    }
    if width > 0 {
        let next = &cells[(start + width) % cells.len()];
        if next.symbol.is_empty() {
            if let Some(last) = out.last_mut() {
                *last = StripCell::blank(last.logo);
            }
        }
    }

    out
}

fn render_marquee(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let Some(engine) = &app.marquee else {
        return;
    };

    let border = if engine.is_hovered() { theme.accent } else { theme.muted };
    let title = if engine.is_paused() { " Stack (paused) " } else { " Stack " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let cells = strip_cells(engine);
    let visible = visible_cells(&cells, engine.visible_start(), inner_width);
    let logo_count = engine.options().logos.len().max(1);

    let spans: Vec<Span> = visible
        .into_iter()
        .filter(|cell| !cell.symbol.is_empty())
        .map(|cell| {
            let style = if cell.icon {
                Style::default().fg(theme.icon(cell.logo % logo_count))
            } else {
                Style::default()
            };
            Span::styled(cell.symbol, style)
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_home(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.muted))
        .title(" About ");

    let lines = vec![
        Line::from(Span::styled(
            format!("Hi, I'm {}.", app.profile_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("Ask the assistant about my skills, projects, experience or how to reach me."),
        Line::from(vec![
            Span::raw("Type "),
            Span::styled("!send <message>", Style::default().fg(theme.accent)),
            Span::raw(" in the chat to message me directly."),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Hover the stack to highlight it, click a logo to open its site.",
            Style::default().fg(theme.muted),
        )),
    ];

    let body = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn render_contact(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let [form_area, banner_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Contact (Tab next field, Enter on Message sends, Esc back) ");
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .split(inner);

    for (field, row) in ContactField::all().into_iter().zip(rows.iter()) {
        let focused = app.contact.focus == field;
        let border = if focused { theme.bot } else { theme.muted };
        let field_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", field.label()));

        let value = app.contact.form.field(field);
        let widget = Paragraph::new(value.to_string())
            .block(field_block)
            .wrap(Wrap { trim: false });
        frame.render_widget(widget, *row);

        if focused && !app.contact.is_sending() {
            let inner_width = row.width.saturating_sub(2).max(1);
            let len = value.chars().count() as u16;
            let cursor_x = len % inner_width;
            let cursor_y = (len / inner_width).min(row.height.saturating_sub(3));
            frame.set_cursor_position((row.x + 1 + cursor_x, row.y + 1 + cursor_y));
        }
    }

    let (text, color) = match app.contact.status() {
        ContactStatus::Editing => (String::new(), theme.muted),
        ContactStatus::Sending => ("Sending...".to_string(), theme.muted),
        ContactStatus::Sent => (
            "Thank you! Your message has been sent successfully.".to_string(),
            theme.success,
        ),
        ContactStatus::Failed(message) => (message.clone(), theme.error),
    };
    if !text.is_empty() {
        let banner = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        frame.render_widget(banner, banner_area);
    }
}

fn render_footer(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = if app.assistant.is_open() {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
        ]
    } else {
        match app.screen {
            Screen::Home => vec![
                Span::styled(" a ", key_style),
                Span::styled(" assistant ", label_style),
                Span::styled(" m ", key_style),
                Span::styled(" contact ", label_style),
                Span::styled(" o ", key_style),
                Span::styled(" open logo ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
            Screen::Contact => vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" next ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" next/send ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" back ", label_style),
            ],
        }
    };

    if app.assistant.has_unread() {
        hints.push(Span::raw(" "));
        hints.push(Span::styled(" ● new message ", Style::default().bg(theme.badge).fg(Color::White).bold()));
    }

    if let Some(status) = &app.status {
        hints.push(Span::raw(" "));
        hints.push(Span::styled(status.clone(), Style::default().fg(theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_assistant(app: &mut App, theme: &Theme, frame: &mut Frame, area: Rect) {
    // Anchored bottom-right, above the footer
    let popup_width = 56.min(area.width.saturating_sub(2));
    let popup_height = (area.height * 2 / 3).max(8).min(area.height.saturating_sub(2));
    let popup_x = area.width.saturating_sub(popup_width + 1);
    let popup_y = area.height.saturating_sub(popup_height + 1);
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(popup_area);

    app.chat_area = Some(chat_area);
    // inner size minus borders
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let transcript = transcript_paragraph(app, theme);
    if app.seen_scroll_generation != app.assistant.scroll_generation() {
        // rows the wrapped paragraph really occupies
        let total_lines = transcript.line_count(app.chat_width);
        app.scroll_chat_to_bottom(total_lines);
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Assistant ");

    let chat = transcript
        .block(chat_block)
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    render_chat_input(app, theme, frame, input_area);
}

/// Transcript and typing indicator, wrapped but without a border.
fn transcript_paragraph(app: &App, theme: &Theme) -> Paragraph<'static> {
    let mut lines: Vec<Line> = Vec::new();
    if app.assistant.transcript().is_empty() && !app.assistant.is_typing() {
        lines.push(Line::from(Span::styled(
            "Ask about skills, projects, experience or contact...",
            Style::default().fg(theme.muted),
        )));
    }
    for msg in app.assistant.transcript() {
        let (label, color) = match msg.sender {
            Sender::User => ("You", theme.user),
            Sender::Bot => ("Bot", theme.bot),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}:", label), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", msg.time_label()), Style::default().fg(theme.muted)),
        ]));
        for line in msg.text.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }
    if app.assistant.is_typing() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("typing{}", dots),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true })
}

fn render_chat_input(app: &App, theme: &Theme, frame: &mut Frame, input_area: Rect) {
    let focused = app.assistant.is_input_focused();
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { theme.bot } else { theme.muted }))
        .title(" Message ");

    // Keep the cursor visible by scrolling the input horizontally
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };
    let visible_text: String = app
        .chat_input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(theme.user))
        .block(input_block);
    frame.render_widget(input, input_area);

    if focused {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}
