//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TripDetail`: day-by-day view of one trip
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that own local state and react to events:
//! - `Header`: navigation bar, owns the account menu visibility
//! - `TripCard`: one trip summary, owns its delete state machine
//! - `TripList`: stacks cards, owns the highlight and scroll offset
//!
//! ## Injected Capabilities
//!
//! Side effects are never reached through globals. Each stateful component
//! receives what it may do at construction:
//!
//! ```rust,ignore
//! // Header: may navigate and may sign the user out
//! let header = Header::new(session.clone(), navigator);
//!
//! // TripCard: may call the API, read the token, report to its parent
//! let card = TripCard::new(trip, TripCardContext::new(api, credentials, callbacks));
//! ```
//!
//! Tests swap in recording fakes for every capability.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs        (Top navigation bar + account menu)
//! ├── trip_card.rs     (Single trip summary + delete flow)
//! ├── trip_list.rs     (Dashboard list of cards)
//! └── trip_detail.rs   (Itinerary view)
//! ```

pub mod header;
pub mod trip_card;
pub mod trip_detail;
pub mod trip_list;

pub use header::{Header, HeaderEvent, MenuVisibility};
pub use trip_card::{TripCard, TripCardCallbacks, TripCardContext};
pub use trip_detail::TripDetail;
pub use trip_list::{TripList, TripListEvent};
