//! # TripCard Component
//!
//! One trip summary in the dashboard list, plus the delete flow for that trip.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │Lisbon to Porto                   [ Delete ]  │
//! │3/15/2024                                     │
//! │Days: 3, Total Distance: 312.5 km             │
//! │Interests: food, history                      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Delete state machine
//!
//! ```text
//!            request_delete()               task finishes
//!   Idle ─────────────────────▶ Requesting ───────────────▶ Idle
//!    │                              │
//!    │ no token: set_error,         │ request_delete() again:
//!    │ stays Idle                   │ ignored (control disabled)
//! ```
//!
//! The request itself runs in a [`DeleteTask`] so the UI loop can spawn it and
//! keep drawing. The task reports to the parent through the injected
//! [`TripCardCallbacks`]: `on_delete(id)` after the server confirms,
//! `set_error(..)` otherwise. Nothing escapes the card as an error value.
//!
//! ## Hit testing
//!
//! A click inside the delete control is a delete, a click anywhere else on
//! the card is a select. One click never produces both.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::TripsApi;
use crate::core::credentials::{CredentialStore, TOKEN_KEY};
use crate::core::trip::{Trip, TripId};
use crate::tui::component::Component;

pub const NO_CREDENTIAL_MESSAGE: &str = "No JWT token found. Please log in again.";
pub const DELETE_FAILED_MESSAGE: &str =
    "Failed to delete trip. Please try again or check your connection.";
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(10);

/// Rendered height of one card, borders included.
pub const CARD_HEIGHT: u16 = 6;

const DELETE_LABEL: &str = "[ Delete ]";
const DELETING_LABEL: &str = "[ Deleting ]";

/// Parent-supplied reactions to card interactions.
///
/// One implementation is shared by every card in a list, so each call
/// carries the id of the trip it concerns.
pub trait TripCardCallbacks: Send + Sync {
    /// The card body was clicked (or Enter pressed on it).
    fn on_select(&self, id: TripId);
    /// The server confirmed the trip is deleted.
    fn on_delete(&self, id: TripId);
    /// Show a message on the error surface, or clear it with `None`.
    fn set_error(&self, error: Option<String>);
}

/// Everything a card needs besides its trip. Cheap to clone.
#[derive(Clone)]
pub struct TripCardContext {
    pub api: Arc<dyn TripsApi>,
    pub credentials: Arc<dyn CredentialStore>,
    pub callbacks: Arc<dyn TripCardCallbacks>,
    pub delete_timeout: Duration,
}

impl TripCardContext {
    pub fn new(
        api: Arc<dyn TripsApi>,
        credentials: Arc<dyn CredentialStore>,
        callbacks: Arc<dyn TripCardCallbacks>,
    ) -> Self {
        Self {
            api,
            credentials,
            callbacks,
            delete_timeout: DELETE_TIMEOUT,
        }
    }

    pub fn with_delete_timeout(mut self, timeout: Duration) -> Self {
        self.delete_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Requesting,
}

/// What a click on the card means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Select,
    Delete,
}

/// Result of asking the card to start a delete.
pub enum DeleteRequest {
    /// The card is now `Requesting`; run the task to finish.
    Started(DeleteTask),
    /// No credential token; the error surface was told, no request was made.
    MissingCredential,
    /// A request for this card is already in flight.
    AlreadyRequesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    MissingCredential,
    Failed,
    Ignored,
}

/// An in-flight delete. Owns everything it needs so it can be spawned.
pub struct DeleteTask {
    trip_id: TripId,
    token: String,
    api: Arc<dyn TripsApi>,
    callbacks: Arc<dyn TripCardCallbacks>,
    timeout: Duration,
}

impl DeleteTask {
    pub fn trip_id(&self) -> TripId {
        self.trip_id
    }

    /// Issue the request and report the result through the callbacks.
    pub async fn run(self) -> DeleteOutcome {
        let result =
            tokio::time::timeout(self.timeout, self.api.delete_trip(self.trip_id, &self.token))
                .await;
        match result {
            Ok(Ok(())) => {
                info!("Trip {} deleted", self.trip_id);
                self.callbacks.on_delete(self.trip_id);
                DeleteOutcome::Deleted
            }
            Ok(Err(e)) => {
                warn!("Error deleting trip {}: {}", self.trip_id, e);
                self.callbacks.set_error(Some(DELETE_FAILED_MESSAGE.to_string()));
                DeleteOutcome::Failed
            }
            Err(_) => {
                warn!(
                    "Error deleting trip {}: no response within {:?}",
                    self.trip_id, self.timeout
                );
                self.callbacks.set_error(Some(DELETE_FAILED_MESSAGE.to_string()));
                DeleteOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CardHitboxes {
    card: Rect,
    delete: Rect,
}

pub struct TripCard {
    trip: Trip,
    context: TripCardContext,
    delete_state: DeleteState,
    /// Drawn with the selection highlight (keyboard focus).
    pub highlighted: bool,
    hitboxes: CardHitboxes,
}

impl TripCard {
    pub fn new(trip: Trip, context: TripCardContext) -> Self {
        Self {
            trip,
            context,
            delete_state: DeleteState::Idle,
            highlighted: false,
            hitboxes: CardHitboxes::default(),
        }
    }

    pub fn id(&self) -> TripId {
        self.trip.id
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    /// Replace the displayed trip (same id, refreshed fields).
    pub fn set_trip(&mut self, trip: Trip) {
        self.trip = trip;
    }

    pub fn delete_state(&self) -> DeleteState {
        self.delete_state
    }

    /// Classify a click against the areas drawn by the last render.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<CardEvent> {
        let position = Position::new(col, row);
        if self.hitboxes.delete.contains(position) {
            Some(CardEvent::Delete)
        } else if self.hitboxes.card.contains(position) {
            Some(CardEvent::Select)
        } else {
            None
        }
    }

    /// Forget the drawn areas; used for cards scrolled out of view.
    pub fn clear_hitboxes(&mut self) {
        self.hitboxes = CardHitboxes::default();
    }

    pub fn select(&self) {
        self.context.callbacks.on_select(self.trip.id);
    }

    /// Move to `Requesting` if a credential is available.
    pub fn request_delete(&mut self) -> DeleteRequest {
        if self.delete_state == DeleteState::Requesting {
            debug!("Delete for trip {} already in flight", self.trip.id);
            return DeleteRequest::AlreadyRequesting;
        }

        let token = self
            .context
            .credentials
            .get(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty());
        let Some(token) = token else {
            warn!("Delete for trip {} without a credential token", self.trip.id);
            self.context
                .callbacks
                .set_error(Some(NO_CREDENTIAL_MESSAGE.to_string()));
            return DeleteRequest::MissingCredential;
        };

        self.delete_state = DeleteState::Requesting;
        DeleteRequest::Started(DeleteTask {
            trip_id: self.trip.id,
            token,
            api: self.context.api.clone(),
            callbacks: self.context.callbacks.clone(),
            timeout: self.context.delete_timeout,
        })
    }

    /// Back to `Idle` once the task has reported.
    pub fn settle_delete(&mut self) {
        self.delete_state = DeleteState::Idle;
    }

    /// Full delete flow in one call: request, run, settle.
    pub async fn delete(&mut self) -> DeleteOutcome {
        match self.request_delete() {
            DeleteRequest::Started(task) => {
                let outcome = task.run().await;
                self.settle_delete();
                outcome
            }
            DeleteRequest::MissingCredential => DeleteOutcome::MissingCredential,
            DeleteRequest::AlreadyRequesting => DeleteOutcome::Ignored,
        }
    }

    fn summary_lines(&self, width: usize) -> Vec<String> {
        vec![
            truncate_to_width(&self.trip.created_label(), width),
            truncate_to_width(
                &format!(
                    "Days: {}, Total Distance: {}",
                    self.trip.days,
                    self.trip.distance_label()
                ),
                width,
            ),
            truncate_to_width(
                &format!("Interests: {}", self.trip.interests_label()),
                width,
            ),
        ]
    }
}

impl Component for TripCard {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.highlighted {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (label, label_style) = match self.delete_state {
            DeleteState::Idle => (DELETE_LABEL, Style::default().fg(Color::Red)),
            DeleteState::Requesting => (
                DELETING_LABEL,
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
            ),
        };
        let label_w = (label.width() as u16).min(inner.width);
        let delete_rect = Rect::new(
            inner.x + inner.width - label_w,
            inner.y,
            label_w,
            inner.height.min(1),
        );
        self.hitboxes = CardHitboxes {
            card: area,
            delete: delete_rect,
        };

        let title_width = inner.width.saturating_sub(label_w + 1) as usize;
        let mut title_style = Style::default().add_modifier(Modifier::BOLD);
        if self.highlighted {
            title_style = title_style.fg(Color::LightBlue);
        }

        let mut lines = vec![Line::from(Span::styled(
            truncate_to_width(&self.trip.route_label(), title_width),
            title_style,
        ))];
        lines.extend(
            self.summary_lines(inner.width as usize)
                .into_iter()
                .map(|text| Line::from(Span::styled(text, Style::default().fg(Color::Gray)))),
        );

        frame.render_widget(Paragraph::new(lines), inner);
        frame.render_widget(Span::styled(label, label_style), delete_rect);
    }
}

/// Cut `s` to at most `max_width` display columns, ending in "..." when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}
