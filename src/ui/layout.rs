use tui::layout::{Constraint, Layout, Rect, Size};
pub const STATUS_BAR_HEIGHT: u16 = 3;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub status_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (status_bar, body) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [status, body] = Layout::vertical([
                Constraint::Length(STATUS_BAR_HEIGHT),
                Constraint::Fill(1),
            ])
            .areas(area);
            (Self::split_status_bar(status), body)
        };

        if !show_logs {
            return LayoutAreas { status_bar, main: body, logs: None };
        }

        let [main, logs] =
            Layout::vertical([Constraint::Fill(1), Constraint::Percentage(40)]).areas(body);
        LayoutAreas { status_bar, main, logs: Some(logs) }
    }

    fn split_status_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(75), Constraint::Percentage(25)]).areas(area)
    }
}
