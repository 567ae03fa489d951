use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::route::Route;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::TripDetail;

/// Screen regions for one frame.
pub struct ScreenLayout {
    pub header: Rect,
    pub main: Rect,
    pub error: Rect,
    pub footer: Rect,
}

pub fn screen_layout(area: Rect, has_error: bool) -> ScreenLayout {
    use Constraint::{Length, Min};
    let error_height = if has_error { 1 } else { 0 };
    let layout = Layout::vertical([Length(1), Min(0), Length(error_height), Length(1)]);
    let [header, main, error, footer] = layout.areas(area);
    ScreenLayout {
        header,
        main,
        error,
        footer,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, web_url: &str) {
    let layout = screen_layout(frame.area(), app.error.is_some());

    match app.route {
        Route::Home => draw_home(frame, layout.main, app.logged_in),
        Route::Dashboard => tui.trip_list.render(frame, layout.main),
        Route::Trip(id) => match app.trip(id) {
            Some(trip) => TripDetail::new(trip, tui.detail_scroll).render(frame, layout.main),
            None => draw_centered(frame, layout.main, "This trip is no longer available."),
        },
        Route::Login => draw_centered(
            frame,
            layout.main,
            &format!(
                "Sign in at {web_url}/login, then run `roadtrip login --token <token>`."
            ),
        ),
        Route::SignUp => draw_centered(
            frame,
            layout.main,
            &format!("Create an account at {web_url}/signup."),
        ),
    }

    if let Some(error) = &app.error {
        let line = Line::from(vec![
            Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), layout.error);
    }

    let footer = Line::from(vec![
        Span::styled(app.status_message.as_str(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(key_hints(app), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), layout.footer);

    // Last, so the account menu overlays the page
    tui.header.render(frame, layout.header);
}

fn key_hints(app: &App) -> &'static str {
    match (app.logged_in, app.route) {
        (false, _) => "l Login  s Sign Up  q Quit",
        (true, Route::Dashboard) => "↑↓ Move  Enter Open  d Delete  r Refresh  m Menu  q Quit",
        (true, Route::Trip(_)) => "↑↓ Scroll  Esc Back  m Menu  q Quit",
        (true, _) => "m Menu  q Quit",
    }
}

fn draw_home(frame: &mut Frame, area: Rect, logged_in: bool) {
    let text = if logged_in {
        "Welcome back. Open the account menu and pick Dashboard to see your trips."
    } else {
        "Plan road trips with Roadtrip.ai. Log in to see your saved trips."
    };
    draw_centered(frame, area, text);
}

fn draw_centered(frame: &mut Frame, area: Rect, text: &str) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .areas(area);
    let paragraph = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, middle);
}
