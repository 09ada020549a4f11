//! Wire shapes that exist only at the HTTP boundary.

use serde::Deserialize;

use crate::domain::booking::{Ticket, TicketStatus};

#[derive(Debug, Deserialize)]
pub(super) struct UnreadCountDto {
    pub unread: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct CancelDto {
    pub status: TicketStatus,
}

/// `GET /tickets/my` has been served both as a bare array and wrapped in a
/// page object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TicketListDto {
    Page { items: Vec<Ticket> },
    Bare(Vec<Ticket>),
}

impl TicketListDto {
    pub fn into_items(self) -> Vec<Ticket> {
        match self {
            TicketListDto::Page { items } | TicketListDto::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_list_accepts_both_shapes() {
        let row = r#"{"confirmation_id":"AB12CD","flight_id":3,"status":"paid","email":"a@b.c","price_paid":99.0}"#;

        let page: TicketListDto =
            serde_json::from_str(&format!(r#"{{"items":[{row}],"total":1}}"#)).unwrap();
        let bare: TicketListDto = serde_json::from_str(&format!("[{row}]")).unwrap();

        assert_eq!(page.into_items().len(), 1);
        assert_eq!(bare.into_items()[0].status, TicketStatus::Paid);
    }
}
