//! # TripList Component
//!
//! Dashboard view: one [`TripCard`] per displayed trip, stacked vertically.
//!
//! The list does not own the trips. `App::trips` is the collection; the list
//! mirrors it with [`TripList::sync`] each frame, matching cards by trip id
//! so a card keeps its delete state while its trip stays in the collection.
//!
//! Keys: Up/Down move the highlight, Enter selects, `d` deletes the
//! highlighted trip. Mouse clicks are routed to whichever card was drawn
//! under the cursor.

use std::collections::HashMap;

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::core::trip::{Trip, TripId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::trip_card::{
    CARD_HEIGHT, CardEvent, DeleteRequest, DeleteTask, TripCard, TripCardContext,
};
use crate::tui::event::TuiEvent;

/// Events emitted by the trip list.
pub enum TripListEvent {
    /// The highlight moved.
    Highlighted(usize),
    /// A card was selected; its `on_select` callback already fired.
    Selected(TripId),
    /// A card entered `Requesting`; the caller must run the task.
    DeleteStarted(DeleteTask),
    /// A delete was refused before any request (no token, or already running).
    DeleteRefused(TripId),
}

pub struct TripList {
    cards: Vec<TripCard>,
    context: TripCardContext,
    selected: usize,
    offset: usize,
    /// Props: whether the collection is still being fetched.
    pub loading: bool,
}

impl TripList {
    pub fn new(context: TripCardContext) -> Self {
        Self {
            cards: Vec::new(),
            context,
            selected: 0,
            offset: 0,
            loading: false,
        }
    }

    pub fn cards(&self) -> &[TripCard] {
        &self.cards
    }

    pub fn selected(&self) -> Option<&TripCard> {
        self.cards.get(self.selected)
    }

    /// Mirror the parent's collection, keeping existing cards by id.
    pub fn sync(&mut self, trips: &[Trip]) {
        let unchanged = self.cards.len() == trips.len()
            && self
                .cards
                .iter()
                .zip(trips)
                .all(|(card, trip)| card.trip() == trip);
        if unchanged {
            return;
        }

        let mut existing: HashMap<TripId, TripCard> =
            self.cards.drain(..).map(|card| (card.id(), card)).collect();
        self.cards = trips
            .iter()
            .map(|trip| match existing.remove(&trip.id) {
                Some(mut card) => {
                    card.set_trip(trip.clone());
                    card
                }
                None => TripCard::new(trip.clone(), self.context.clone()),
            })
            .collect();
        if !existing.is_empty() {
            debug!("Dropped {} cards no longer in the trip list", existing.len());
        }
        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
    }

    /// Return the card for `id` to `Idle`. A card that has since left the
    /// list has nothing to settle.
    pub fn settle(&mut self, id: TripId) {
        match self.cards.iter_mut().find(|card| card.id() == id) {
            Some(card) => card.settle_delete(),
            None => debug!("Discarding delete completion for departed trip {}", id),
        }
    }

    fn start_delete(&mut self, index: usize) -> Option<TripListEvent> {
        let card = self.cards.get_mut(index)?;
        let id = card.id();
        match card.request_delete() {
            DeleteRequest::Started(task) => Some(TripListEvent::DeleteStarted(task)),
            DeleteRequest::MissingCredential | DeleteRequest::AlreadyRequesting => {
                Some(TripListEvent::DeleteRefused(id))
            }
        }
    }

    fn select(&mut self, index: usize) -> Option<TripListEvent> {
        let card = self.cards.get(index)?;
        card.select();
        Some(TripListEvent::Selected(card.id()))
    }

    fn handle_click(&mut self, col: u16, row: u16) -> Option<TripListEvent> {
        let (index, hit) = self
            .cards
            .iter()
            .enumerate()
            .find_map(|(i, card)| card.hit_test(col, row).map(|hit| (i, hit)))?;
        self.selected = index;
        match hit {
            CardEvent::Delete => self.start_delete(index),
            CardEvent::Select => self.select(index),
        }
    }

    fn visible_count(area: Rect) -> usize {
        ((area.height / CARD_HEIGHT) as usize).max(1)
    }
}

impl EventHandler for TripList {
    type Event = TripListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TripListEvent> {
        if self.cards.is_empty() {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                Some(TripListEvent::Highlighted(self.selected))
            }
            TuiEvent::CursorDown => {
                self.selected = (self.selected + 1).min(self.cards.len() - 1);
                Some(TripListEvent::Highlighted(self.selected))
            }
            TuiEvent::Submit => self.select(self.selected),
            TuiEvent::InputChar('d') => self.start_delete(self.selected),
            TuiEvent::MouseClick(col, row) => self.handle_click(*col, *row),
            _ => None,
        }
    }
}

impl Component for TripList {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        for card in &mut self.cards {
            card.clear_hitboxes();
        }

        if self.cards.is_empty() {
            let text = if self.loading {
                "Loading trips..."
            } else {
                "No trips yet. Press r to refresh."
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        // Keep the highlighted card in view
        let visible = Self::visible_count(area);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible {
            self.offset = self.selected + 1 - visible;
        }

        let bottom = area.y + area.height;
        let mut y = area.y;
        for (i, card) in self.cards.iter_mut().enumerate().skip(self.offset) {
            if y >= bottom {
                break;
            }
            let rect = Rect::new(area.x, y, area.width, CARD_HEIGHT.min(bottom - y));
            card.highlighted = i == self.selected;
            card.render(frame, rect);
            y += CARD_HEIGHT;
        }
    }
}
