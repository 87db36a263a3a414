use crate::app::{App, FocusPane};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rolldraw_core::DrawState;
use std::time::Instant;

const SPARKLES: [&str; 6] = ["✦", "✧", "★", "☆", "·", "*"];
const SPARKLE_COLORS: [Color; 4] = [Color::Yellow, Color::Magenta, Color::Cyan, Color::LightRed];
const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(root[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(middle[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(4),
            Constraint::Min(5),
        ])
        .split(middle[1]);

    draw_roster(frame, left[0], app);
    draw_settings(frame, left[1], app);
    draw_display(frame, right[0], app);
    draw_results(frame, right[1], app);
    draw_history(frame, right[2], app);
    draw_events(frame, root[2], app);
    draw_toasts(frame, app);

    if app.show_help {
        draw_help_popup(frame, app);
    }
    if app.count_input.is_some() {
        draw_count_prompt(frame, app);
    }
    if app.confirm_reset {
        draw_confirm_reset(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "{} | {}: {} | {}: {}",
        app.locale.text("Rolldraw", "随机抽取"),
        app.locale.text("Focus", "焦点"),
        app.focus_label(app.focus),
        app.locale.text("Hint", "提示"),
        app.next_hint()
    );
    let extra = format!(
        "{} {} | {} {} | {} {} | {}: {}",
        app.locale.text("Seed", "种子"),
        app.session.seed(),
        app.locale.text("Lang", "语言"),
        app.locale.code(),
        app.locale.text("State", "状态"),
        app.session.state().label(),
        app.locale.text("Status", "信息"),
        app.status_line
    );
    let lines = vec![Line::from(title.bold()), Line::from(extra)];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Overview", "概览"));
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_roster(frame: &mut Frame, area: Rect, app: &App) {
    let raw = app.session.roster().raw_text();
    let mut lines: Vec<Line<'_>> = raw.split('\n').map(Line::from).collect();
    if app.editing_roster {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }
    } else if raw.is_empty() {
        lines = vec![Line::from(
            app.locale
                .text("one name per line (e to edit)", "每行一个名字（e 编辑）")
                .dark_gray(),
        )];
    }
    let capacity = area.height.saturating_sub(2) as usize;
    let start = lines.len().saturating_sub(capacity);
    let visible: Vec<Line<'_>> = lines.into_iter().skip(start).collect();
    let title = format!(
        "{} ({}){}",
        app.locale.text("Roster", "名单"),
        app.session.candidates().len(),
        if app.editing_roster {
            app.locale.text(" [editing]", " [编辑中]")
        } else {
            ""
        }
    );
    let block = pane_block(title.as_str(), app.focus == FocusPane::Roster);
    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn draw_settings(frame: &mut Frame, area: Rect, app: &App) {
    let preset = app
        .presets
        .get(app.preset_cursor)
        .map(|preset| preset.name.as_str())
        .unwrap_or("-");
    let dedupe = if app.session.roster().dedupe() {
        app.locale.text("on", "开")
    } else {
        app.locale.text("off", "关")
    };
    let lines = vec![
        Line::from(format!(
            "{}: {}   (n / + / -)",
            app.locale.text("Count", "抽取人数"),
            app.count_label()
        )),
        Line::from(format!(
            "{}: {}   (u)",
            app.locale.text("Dedupe", "去重"),
            dedupe
        )),
        Line::from(format!(
            "{}: {}   (p / P)",
            app.locale.text("Preset", "预设"),
            preset
        )),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Valid candidates", "有效人数"),
            app.session.candidates().len()
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Settings", "设置"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_display(frame: &mut Frame, area: Rect, app: &App) {
    let ports = app.session.ports();
    let (label, name_style) = match app.session.state() {
        DrawState::Idle => (
            app.locale.text("Waiting", "等待开始"),
            Style::default().fg(Color::DarkGray),
        ),
        DrawState::Rolling => (
            app.locale.text("Rolling...", "抽取中..."),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        DrawState::Revealed => (
            app.locale.text("Done!", "抽取完成!"),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    };
    let mut lines = Vec::new();
    match ports.celebration_phase(Instant::now()) {
        Some(phase) => lines.push(sparkle_line(phase, area.width.saturating_sub(2))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(Span::styled(
        ports.frame().unwrap_or("?").to_string(),
        name_style,
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(label.italic()));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Draw", "抽取"));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn sparkle_line(phase: u128, width: u16) -> Line<'static> {
    let step = (phase / 100) as usize;
    let count = (width / 2) as usize;
    let spans: Vec<Span<'static>> = (0..count)
        .map(|idx| {
            let glyph = SPARKLES[(idx * 7 + step) % SPARKLES.len()];
            let color = SPARKLE_COLORS[(idx + step) % SPARKLE_COLORS.len()];
            Span::styled(format!("{glyph} "), Style::default().fg(color))
        })
        .collect();
    Line::from(spans)
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app.session.ports().result_rows();
    let items: Vec<ListItem<'_>> = if rows.is_empty() {
        vec![ListItem::new(app.locale.text("no result yet", "暂无结果"))]
    } else {
        rows.iter()
            .map(|row| ListItem::new(row.as_str()).green())
            .collect()
    };
    let title = format!(
        "{} ({})",
        app.locale.text("Results", "抽取结果"),
        rows.len()
    );
    let block = pane_block(title.as_str(), app.focus == FocusPane::Results);
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let history = app.session.history();
    let items: Vec<ListItem<'_>> = if history.is_empty() {
        vec![ListItem::new(app.locale.text("empty", "空"))]
    } else {
        history
            .iter()
            .enumerate()
            .map(|(idx, names)| {
                ListItem::new(format!(
                    "{} {}: {}",
                    app.locale.text("Round", "第"),
                    round_label(app, idx),
                    names.join(", ")
                ))
            })
            .collect()
    };
    let title = format!(
        "{} ({}/{})",
        app.locale.text("History", "历史记录"),
        history.len(),
        history.cap()
    );
    let block = pane_block(title.as_str(), app.focus == FocusPane::History);
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    if app.focus == FocusPane::History && !history.is_empty() {
        state.select(Some(app.history_cursor.min(history.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn round_label(app: &App, idx: usize) -> String {
    match app.locale {
        rolldraw_core::Locale::EnUs => format!("{}", idx + 1),
        rolldraw_core::Locale::ZhCn => format!("{} 轮", idx + 1),
    }
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = pane_block(
        app.locale.text("Events", "事件"),
        app.focus == FocusPane::Events,
    );
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_toasts(frame: &mut Frame, app: &App) {
    let screen = frame.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut bottom = screen.y + screen.height;
    let toasts: Vec<_> = app.session.ports().toasts().collect();
    for toast in toasts.into_iter().rev() {
        if bottom < screen.y + TOAST_HEIGHT {
            break;
        }
        bottom -= TOAST_HEIGHT;
        let area = Rect {
            x: screen.x + screen.width - width,
            y: bottom,
            width,
            height: TOAST_HEIGHT,
        };
        let color = if toast.error { Color::Red } else { Color::Green };
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(toast.title.as_str().bold());
        frame.render_widget(
            Paragraph::new(toast.description.as_str())
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "q quit | ? help | tab focus | arrows/jk move",
            "q 退出 | ? 帮助 | tab 切焦点 | 方向键/jk 移动",
        )),
        Line::from(app.locale.text(
            "e edit roster (Esc to finish, paste supported)",
            "e 编辑名单（Esc 结束，支持粘贴）",
        )),
        Line::from(app.locale.text(
            "d/space/enter draw | c copy result",
            "d/空格/回车 开始抽取 | c 复制结果",
        )),
        Line::from(app.locale.text(
            "n set count | +/- adjust count | u toggle dedupe",
            "n 设置人数 | +/- 调整人数 | u 切换去重",
        )),
        Line::from(app.locale.text(
            "p next preset | P load preset",
            "p 下一个预设 | P 加载预设",
        )),
        Line::from(app.locale.text(
            "Shift+R/Ctrl+R reset everything (asks first)",
            "Shift+R/Ctrl+R 重置全部（需确认）",
        )),
        Line::from(app.locale.text(
            "Esc closes help and dismisses notifications",
            "Esc 关闭帮助并清除通知",
        )),
    ];
    let block = Block::default()
        .title(app.locale.text("Help", "帮助"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_count_prompt(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 24, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(
            app.locale
                .text("Enter=apply  Esc=cancel", "回车=确认  Esc=取消"),
        ),
        Line::from(app.locale.text("Leave empty for 1.", "留空则为 1。")),
        Line::from(""),
        Line::from(format!(
            "> {}",
            app.count_input.as_deref().unwrap_or_default()
        )),
    ];
    let block = Block::default()
        .title(app.locale.text("Count", "抽取人数"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_confirm_reset(frame: &mut Frame, app: &App) {
    let area = centered_rect(56, 28, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text("Reset everything?", "确认重置全部内容？").bold()),
        Line::from(app.locale.text(
            "Roster, result and history will be cleared.",
            "名单、结果和历史记录都将被清除。",
        )),
        Line::from(""),
        Line::from(app.locale.text(
            "y/Enter = reset   n/Esc = keep",
            "y/回车 = 重置   n/Esc = 取消",
        )),
    ];
    let block = Block::default()
        .title(app.locale.text("Confirm", "确认"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
