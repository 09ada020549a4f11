//! Booking - seat availability, tickets, and pending optimistic mutations.

mod pending;
mod seats;
mod ticket;

pub use pending::{PendingMutation, PendingMutations};
pub use seats::{clamp_seats, FlightBoard, FlightSeats, SeatSnapshot};
pub use ticket::{Ticket, TicketBoard, TicketStatus};
