use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Style};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::panel::{DisplayFrame, LedPanel};
use crate::plugin::PluginInfo;
use crate::ui::layout::LayoutAreas;

pub const ERROR_CHAR: char = '!';

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let frame = app.frame();
    let info = app.plugin.info();

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.show_logs);

        if !app.settings.full_screen {
            draw_status_bar(f, layout.status_bar, app, &info);
        }
        draw_panel(f, layout.main, &frame);
        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_status_bar(f: &mut Frame, status_bar: [Rect; 2], app: &App, info: &PluginInfo) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let mut summary = status_summary(info);
    if app.plugin.last_poll_failed() {
        summary.push_str(&format!("  {ERROR_CHAR}"));
    }
    if let Some(error) = &app.last_error {
        summary.push_str(&format!("  {error}"));
    }
    let left = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(left, status_bar[0]);

    let rotation = app.plugin.display_duration().as_secs();
    let help = Paragraph::new(format!("{rotation}s  q l f c "))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, status_bar[1]);
}

fn status_summary(info: &PluginInfo) -> String {
    let showing = match (&info.current_tournament, &info.previous_tournament) {
        (Some(current), _) => format!(" {current} ({} players)", info.players_count),
        (None, Some(previous)) => {
            format!(" previous: {previous} ({} players)", info.previous_players_count)
        }
        (None, None) => " no tournament".to_owned(),
    };
    match &info.last_update {
        Some(at) => format!("{showing}  updated {at}"),
        None => showing,
    }
}

fn draw_panel(f: &mut Frame, area: Rect, frame: &DisplayFrame) {
    let block = default_border(Color::DarkGray).title(" PGA Tour ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(LedPanel { frame, title: "" }, inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::White))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}
