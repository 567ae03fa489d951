//! # TripDetail Component
//!
//! Day-by-day view of one trip's primary plan. Stateless: the trip and the
//! scroll offset are props, so the parent decides what is shown.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::trip::{DayPlan, Trip};
use crate::tui::component::Component;

pub struct TripDetail<'a> {
    pub trip: &'a Trip,
    pub scroll: u16,
}

impl<'a> TripDetail<'a> {
    pub fn new(trip: &'a Trip, scroll: u16) -> Self {
        Self { trip, scroll }
    }

    /// All lines for the given content width, before scrolling.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let trip = self.trip;
        let muted = Style::default().fg(Color::Gray);
        let mut lines = vec![
            Line::from(Span::styled(
                trip.route_label(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "Created {} | {} days | {}{}",
                    trip.created_label(),
                    trip.days,
                    trip.distance_label(),
                    if trip.roundtrip { " | round trip" } else { "" }
                ),
                muted,
            )),
            Line::from(Span::styled(
                format!("Interests: {}", trip.interests_label()),
                muted,
            )),
            Line::default(),
        ];

        let Some(plan) = trip.primary_plan() else {
            lines.push(Line::from(Span::styled(
                "No itinerary has been generated for this trip.",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        };

        if trip.trip_plans.len() > 1 {
            lines.push(Line::from(Span::styled(
                format!("Showing plan 1 of {}", trip.trip_plans.len()),
                Style::default().fg(Color::DarkGray),
            )));
        }

        for day in plan.ordered_days() {
            lines.extend(day_lines(day, width));
        }
        lines
    }
}

fn day_lines(day: &DayPlan, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("Day {}: ", day.day_number),
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{} → {} ({} km)",
            day.start_location.name, day.finish_location.name, day.distance_km
        )),
    ])];

    let wrap_width = (width as usize).saturating_sub(2).max(10);
    for row in textwrap::wrap(day.introduction.trim(), wrap_width) {
        lines.push(Line::from(format!("  {row}")));
    }

    for place in &day.places_of_interest {
        let text = if place.description.trim().is_empty() {
            place.name.clone()
        } else {
            format!("{}: {}", place.name, place.description.trim())
        };
        let options = textwrap::Options::new(wrap_width)
            .initial_indent("  • ")
            .subsequent_indent("    ");
        for row in textwrap::wrap(&text, options) {
            lines.push(Line::from(Span::styled(
                row.into_owned(),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    lines.push(Line::default());
    lines
}

impl Component for TripDetail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Trip #{} ", self.trip.id));
        let inner = block.inner(area);
        let lines = self.lines(inner.width);
        let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll.min(max_scroll), 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, sample_trip};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_days_listed_in_day_order() {
        let mut trip = sample_trip(1);
        trip.trip_plans[0].days.reverse();
        let detail = TripDetail::new(&trip, 0);
        let texts: Vec<String> = detail.lines(60).iter().map(line_text).collect();

        let day1 = texts.iter().position(|t| t.starts_with("Day 1:")).unwrap();
        let day2 = texts.iter().position(|t| t.starts_with("Day 2:")).unwrap();
        assert!(day1 < day2);
        assert!(texts.iter().any(|t| t.contains("Belem Tower")));
    }

    #[test]
    fn test_trip_without_plans() {
        let mut trip = sample_trip(1);
        trip.trip_plans.clear();
        let texts: Vec<String> = TripDetail::new(&trip, 0)
            .lines(60)
            .iter()
            .map(line_text)
            .collect();
        assert!(texts.iter().any(|t| t.contains("No itinerary")));
    }

    #[test]
    fn test_render_shows_title_and_summary() {
        let trip = sample_trip(5);
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal
            .draw(|f| TripDetail::new(&trip, 0).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Trip #5"));
        assert!(text.contains("Lisbon to Porto"));
        assert!(text.contains("312.5 km"));
    }
}
