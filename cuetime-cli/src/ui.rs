use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use cuetime_lib::Playback;

use crate::controls::{StatusSnapshot, TimerLine};

const TITLE: &str = "CUETIME";
const CONTROLS: &str = "space=play/pause  s=stop  d=direction  +/-=duration 1m  \
                        1/!=timer1 play-pause/stop  o=on air  q=quit";

pub fn draw_status(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    status: &StatusSnapshot,
    log_lines: &[String],
) {
    let _ = terminal.draw(|f| {
        // one row per timer plus the message row, inside the borders
        let timers_height = status.timers.len() as u16 + 3;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(timers_height),
                Constraint::Min(0),
            ])
            .split(f.size());

        f.render_widget(Paragraph::new(header_line(status)), chunks[0]);

        let controls = Paragraph::new(CONTROLS)
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL).title("Controls"));
        f.render_widget(controls, chunks[1]);

        let mut rows: Vec<Line> = status.timers.iter().map(timer_row).collect();
        rows.push(Line::from(Span::styled(
            format!(
                "Public message: {}",
                status.public_message.as_deref().unwrap_or("-")
            ),
            Style::default().fg(Color::White),
        )));
        let border = if status.any_overrun() {
            Color::Red
        } else {
            Color::Green
        };
        let timers_widget = Paragraph::new(rows).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title("Timers"),
        );
        f.render_widget(timers_widget, chunks[2]);

        let log_height = chunks[3].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_rows: Vec<Line> = if log_lines.is_empty() {
            vec![Line::from("No logs yet.")]
        } else {
            log_lines[start..].iter().map(|line| log_row(line)).collect()
        };
        let log_widget = Paragraph::new(log_rows)
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(log_widget, chunks[3]);
    });
}

fn header_line(status: &StatusSnapshot) -> Line<'static> {
    let title = Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    if status.on_air {
        let on_air = Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD);
        Line::from(vec![title, Span::raw("  "), Span::styled(" ON AIR ", on_air)])
    } else {
        Line::from(vec![title, Span::raw("  off air")])
    }
}

fn timer_row(line: &TimerLine) -> Line<'static> {
    let style = if line.overrun {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        match line.playback {
            Playback::Play => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Playback::Pause => Style::default().fg(Color::Yellow),
            Playback::Stop => Style::default().fg(Color::DarkGray),
        }
    };
    Line::from(Span::styled(line.text.clone(), style))
}

fn log_row(line: &str) -> Line<'_> {
    let color = if line.contains("[ERROR]") {
        Color::Red
    } else if line.contains("[WARN]") {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    Line::from(Span::styled(line, Style::default().fg(color)))
}
