//! Application layer - realtime sync services.
//!
//! Coordinates domain state with the ports:
//!
//! - `ConnectionManager` - push socket lifecycle and frame routing
//! - `EventReconciler` - notification list + unread counter
//! - `FlightListView` - per-screen flight rows fed by seat broadcasts
//! - `optimistic` - seat adjustment and ticket cancellation with rollback
//! - `RealtimeSession` - owns all of the above for one signed-in user

pub mod connection_manager;
pub mod event_reconciler;
pub mod flight_view;
pub mod optimistic;
pub mod session;

pub use connection_manager::{ConnectionManager, FrameRouter, RouteOutcome};
pub use event_reconciler::{EventReconciler, PollHandle};
pub use flight_view::FlightListView;
pub use optimistic::{MutationError, OptimisticController, PendingGuard, SeatAdjuster, TicketCanceller};
pub use session::{RealtimeSession, SessionPorts};
