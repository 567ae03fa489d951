//! # Header Component
//!
//! Top navigation bar. Renders one of two branches depending on the shared
//! `SessionState`:
//!
//! ```text
//! logged out:  Roadtrip.ai                                Login  Sign Up
//! logged in:   Roadtrip.ai                                [ Account ▾ ]
//!                                                        ┌──────────────┐
//!                                            (menu open) │Dashboard     │
//!                                                        │Sign Out      │
//!                                                        └──────────────┘
//! ```
//!
//! ## State
//!
//! Two independent axes:
//! - Auth branch: derived from `SessionState` on every render/event, never stored.
//! - Menu visibility: owned here, `Closed` until the account affordance is
//!   toggled (click it, or press `m`).
//!
//! Whenever the header observes the logged-out branch it forces the menu
//! back to `Closed`, so a later login never resurrects a stale open menu.
//!
//! ## Capabilities
//!
//! The header performs its actions itself through injected capabilities:
//! `Navigator` for "Dashboard" and the Login/Sign Up links, `SessionState`
//! for "Sign Out". The returned `HeaderEvent` only reports what happened.

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear};
use unicode_width::UnicodeWidthStr;

use crate::core::route::{DASHBOARD_PATH, Navigator, Route};
use crate::core::session::SessionState;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const BRAND: &str = "Roadtrip.ai";
const LOGIN: &str = "Login";
const SIGN_UP: &str = "Sign Up";
const ACCOUNT: &str = "[ Account ▾ ]";
const MENU_WIDTH: u16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuVisibility {
    #[default]
    Closed,
    Open,
}

impl MenuVisibility {
    fn toggled(self) -> Self {
        match self {
            MenuVisibility::Closed => MenuVisibility::Open,
            MenuVisibility::Open => MenuVisibility::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Dashboard,
    SignOut,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Dashboard => "Dashboard",
            MenuItem::SignOut => "Sign Out",
        }
    }
}

const MENU_ITEMS: [MenuItem; 2] = [MenuItem::Dashboard, MenuItem::SignOut];

/// What the header did in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEvent {
    MenuToggled(MenuVisibility),
    MenuHighlighted(MenuItem),
    Navigated(String),
    SignedOut,
}

/// Screen areas recorded by the last render, used for mouse hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderHitboxes {
    pub brand: Rect,
    pub login: Option<Rect>,
    pub sign_up: Option<Rect>,
    pub account: Option<Rect>,
    pub menu: Option<Rect>,
    pub menu_items: Vec<(MenuItem, Rect)>,
}

fn label_width(label: &str) -> u16 {
    label.width() as u16
}

/// Lay out the bar inside `area`; the dropdown hangs below it, clipped to `bounds`.
fn compute_hitboxes(
    area: Rect,
    bounds: Rect,
    logged_in: bool,
    menu: MenuVisibility,
) -> HeaderHitboxes {
    let height = area.height.min(1);
    let brand = Rect::new(
        area.x + 1u16.min(area.width),
        area.y,
        label_width(BRAND).min(area.width.saturating_sub(1)),
        height,
    );
    // One column of right padding
    let right = area.x + area.width.saturating_sub(1);

    if !logged_in {
        let sign_up_w = label_width(SIGN_UP);
        let sign_up = Rect::new(right.saturating_sub(sign_up_w), area.y, sign_up_w, height);
        let login_w = label_width(LOGIN);
        let login = Rect::new(sign_up.x.saturating_sub(2 + login_w), area.y, login_w, height);
        return HeaderHitboxes {
            brand,
            login: Some(login),
            sign_up: Some(sign_up),
            ..Default::default()
        };
    }

    let account_w = label_width(ACCOUNT);
    let account = Rect::new(right.saturating_sub(account_w), area.y, account_w, height);

    let mut hitboxes = HeaderHitboxes {
        brand,
        account: Some(account),
        ..Default::default()
    };

    if menu == MenuVisibility::Open {
        let menu_rect = Rect::new(
            right.saturating_sub(MENU_WIDTH),
            area.y + height,
            MENU_WIDTH,
            MENU_ITEMS.len() as u16 + 2,
        )
        .intersection(bounds);
        let inner_bottom = menu_rect.y + menu_rect.height.saturating_sub(1);
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let row = menu_rect.y + 1 + i as u16;
            if row < inner_bottom {
                hitboxes.menu_items.push((
                    *item,
                    Rect::new(menu_rect.x + 1, row, menu_rect.width.saturating_sub(2), 1),
                ));
            }
        }
        hitboxes.menu = Some(menu_rect);
    }

    hitboxes
}

fn hit(rect: Option<Rect>, col: u16, row: u16) -> bool {
    rect.is_some_and(|r| r.contains(Position::new(col, row)))
}

pub struct Header {
    session: Arc<SessionState>,
    navigator: Arc<dyn Navigator>,
    menu: MenuVisibility,
    highlighted: usize,
    hitboxes: HeaderHitboxes,
}

impl Header {
    pub fn new(session: Arc<SessionState>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            menu: MenuVisibility::Closed,
            highlighted: 0,
            hitboxes: HeaderHitboxes::default(),
        }
    }

    pub fn menu(&self) -> MenuVisibility {
        self.menu
    }

    pub fn hitboxes(&self) -> &HeaderHitboxes {
        &self.hitboxes
    }

    /// Read the auth branch, closing the menu if it has no affordance anymore.
    fn observe_session(&mut self) -> bool {
        let logged_in = self.session.is_logged_in();
        if !logged_in {
            self.menu = MenuVisibility::Closed;
        }
        logged_in
    }

    pub fn toggle_menu(&mut self) -> Option<HeaderEvent> {
        if !self.observe_session() {
            return None;
        }
        self.menu = self.menu.toggled();
        self.highlighted = 0;
        log::debug!("Account menu {:?}", self.menu);
        Some(HeaderEvent::MenuToggled(self.menu))
    }

    pub fn activate(&mut self, item: MenuItem) -> HeaderEvent {
        self.menu = MenuVisibility::Closed;
        match item {
            MenuItem::Dashboard => {
                self.navigator.navigate(DASHBOARD_PATH);
                HeaderEvent::Navigated(DASHBOARD_PATH.to_string())
            }
            MenuItem::SignOut => {
                self.session.logout();
                HeaderEvent::SignedOut
            }
        }
    }

    fn navigate(&self, route: Route) -> HeaderEvent {
        let path = route.path();
        self.navigator.navigate(&path);
        HeaderEvent::Navigated(path)
    }

    fn handle_click(&mut self, col: u16, row: u16, logged_in: bool) -> Option<HeaderEvent> {
        if hit(Some(self.hitboxes.brand), col, row) {
            return Some(self.navigate(Route::Home));
        }
        if !logged_in {
            if hit(self.hitboxes.login, col, row) {
                return Some(self.navigate(Route::Login));
            }
            if hit(self.hitboxes.sign_up, col, row) {
                return Some(self.navigate(Route::SignUp));
            }
            return None;
        }
        if hit(self.hitboxes.account, col, row) {
            return self.toggle_menu();
        }
        if self.menu == MenuVisibility::Open {
            let clicked = self
                .hitboxes
                .menu_items
                .iter()
                .find(|(_, rect)| rect.contains(Position::new(col, row)))
                .map(|(item, _)| *item);
            if let Some(item) = clicked {
                return Some(self.activate(item));
            }
            // Clicks on the menu border are swallowed
            if hit(self.hitboxes.menu, col, row) {
                return Some(HeaderEvent::MenuToggled(self.menu));
            }
        }
        None
    }
}

impl EventHandler for Header {
    type Event = HeaderEvent;

    /// Returns `Some` when the header consumed the event.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<HeaderEvent> {
        let logged_in = self.observe_session();

        if let TuiEvent::MouseClick(col, row) = *event {
            return self.handle_click(col, row, logged_in);
        }

        if !logged_in {
            return match event {
                TuiEvent::InputChar('l') => Some(self.navigate(Route::Login)),
                TuiEvent::InputChar('s') => Some(self.navigate(Route::SignUp)),
                _ => None,
            };
        }

        match (self.menu, event) {
            (_, TuiEvent::InputChar('m')) => self.toggle_menu(),
            (MenuVisibility::Open, TuiEvent::Escape) => self.toggle_menu(),
            (MenuVisibility::Open, TuiEvent::CursorUp) => {
                self.highlighted = self.highlighted.saturating_sub(1);
                Some(HeaderEvent::MenuHighlighted(MENU_ITEMS[self.highlighted]))
            }
            (MenuVisibility::Open, TuiEvent::CursorDown) => {
                self.highlighted = (self.highlighted + 1).min(MENU_ITEMS.len() - 1);
                Some(HeaderEvent::MenuHighlighted(MENU_ITEMS[self.highlighted]))
            }
            (MenuVisibility::Open, TuiEvent::Submit) => {
                Some(self.activate(MENU_ITEMS[self.highlighted]))
            }
            _ => None,
        }
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let logged_in = self.observe_session();
        self.hitboxes = compute_hitboxes(area, frame.area(), logged_in, self.menu);

        let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        frame.render_widget(Block::default().style(bar_style), area);
        frame.render_widget(
            Span::styled(BRAND, bar_style.add_modifier(Modifier::BOLD)),
            self.hitboxes.brand,
        );

        let link_style = bar_style.fg(Color::LightBlue);
        if let Some(rect) = self.hitboxes.login {
            frame.render_widget(Span::styled(LOGIN, link_style), rect);
        }
        if let Some(rect) = self.hitboxes.sign_up {
            frame.render_widget(Span::styled(SIGN_UP, link_style), rect);
        }
        if let Some(rect) = self.hitboxes.account {
            let style = if self.menu == MenuVisibility::Open {
                link_style.add_modifier(Modifier::REVERSED)
            } else {
                link_style
            };
            frame.render_widget(Span::styled(ACCOUNT, style), rect);
        }

        if let Some(menu_rect) = self.hitboxes.menu {
            frame.render_widget(Clear, menu_rect);
            frame.render_widget(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Gray))
                    .style(Style::default().bg(Color::Black)),
                menu_rect,
            );
            for (i, (item, rect)) in self.hitboxes.menu_items.iter().enumerate() {
                let style = if i == self.highlighted {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::White)
                };
                frame.render_widget(Span::styled(item.label(), style), *rect);
            }
        }
    }
}
