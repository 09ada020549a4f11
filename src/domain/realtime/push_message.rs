//! Push channel envelope decoding.
//!
//! Every frame is `{ "type": <string>, "data": <payload> }`. Unknown types
//! decode to [`Decoded::Unknown`] so newer servers never break older
//! clients; frames that are not valid envelopes decode to an error that the
//! caller drops.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::booking::SeatSnapshot;
use crate::domain::foundation::NotificationId;
use crate::domain::notifications::Notification;

/// Wire names of the recognized message types.
pub mod kinds {
    pub const NOTIFICATION: &str = "notification";
    pub const NOTIFICATION_READ: &str = "notification_read";
    pub const NOTIFICATION_MARK_ALL: &str = "notification_mark_all";
    pub const FLIGHT_SEATS: &str = "flight_seats";
}

/// A recognized inbound push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushMessage {
    Notification(Notification),
    NotificationRead { id: NotificationId },
    NotificationMarkAll,
    FlightSeats(SeatSnapshot),
}

impl PushMessage {
    /// Decodes one text frame.
    pub fn decode(raw: &str) -> Result<Decoded, EnvelopeError> {
        let envelope: RawEnvelope = serde_json::from_str(raw).map_err(EnvelopeError::Malformed)?;
        let RawEnvelope { kind, data } = envelope;

        let message = match kind.as_str() {
            kinds::NOTIFICATION => PushMessage::Notification(payload(&kind, data)?),
            kinds::NOTIFICATION_READ => {
                let ReadPayload { id } = payload(&kind, data)?;
                PushMessage::NotificationRead { id }
            }
            kinds::NOTIFICATION_MARK_ALL => PushMessage::NotificationMarkAll,
            kinds::FLIGHT_SEATS => PushMessage::FlightSeats(payload(&kind, data)?),
            _ => return Ok(Decoded::Unknown(kind)),
        };
        Ok(Decoded::Known(message))
    }

    /// Wire name of this message's type.
    pub fn kind(&self) -> &'static str {
        match self {
            PushMessage::Notification(_) => kinds::NOTIFICATION,
            PushMessage::NotificationRead { .. } => kinds::NOTIFICATION_READ,
            PushMessage::NotificationMarkAll => kinds::NOTIFICATION_MARK_ALL,
            PushMessage::FlightSeats(_) => kinds::FLIGHT_SEATS,
        }
    }
}

/// Result of decoding a well-formed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Known(PushMessage),
    /// Envelope with a `type` this client does not handle.
    Unknown(String),
}

/// Why a frame could not be decoded.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("invalid '{kind}' payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ReadPayload {
    id: NotificationId,
}

fn payload<T: for<'de> Deserialize<'de>>(
    kind: &str,
    data: serde_json::Value,
) -> Result<T, EnvelopeError> {
    serde_json::from_value(data).map_err(|source| EnvelopeError::InvalidPayload {
        kind: kind.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::FlightId;

    #[test]
    fn decodes_notification() {
        let raw = r#"{"type":"notification","data":{"id":5,"type":"flight_update","message":"Gate changed","created_at":"2025-03-01T10:00:00","read":false}}"#;
        match PushMessage::decode(raw).unwrap() {
            Decoded::Known(PushMessage::Notification(n)) => {
                assert_eq!(n.id, NotificationId::new(5));
                assert!(!n.read);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decodes_read_receipt() {
        let decoded = PushMessage::decode(r#"{"type":"notification_read","data":{"id":9}}"#).unwrap();
        assert_eq!(
            decoded,
            Decoded::Known(PushMessage::NotificationRead { id: NotificationId::new(9) })
        );
    }

    #[test]
    fn mark_all_needs_no_payload() {
        let decoded = PushMessage::decode(r#"{"type":"notification_mark_all"}"#).unwrap();
        assert_eq!(decoded, Decoded::Known(PushMessage::NotificationMarkAll));
    }

    #[test]
    fn decodes_flight_seats() {
        let decoded =
            PushMessage::decode(r#"{"type":"flight_seats","data":{"flight_id":3,"seats_available":41}}"#)
                .unwrap();
        assert_eq!(
            decoded,
            Decoded::Known(PushMessage::FlightSeats(SeatSnapshot {
                flight_id: FlightId::new(3),
                seats_available: 41,
            }))
        );
    }

    #[test]
    fn unknown_type_is_reported_not_failed() {
        let decoded = PushMessage::decode(r#"{"type":"promo_banner","data":{"x":1}}"#).unwrap();
        assert_eq!(decoded, Decoded::Unknown("promo_banner".to_string()));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            PushMessage::decode("not json"),
            Err(EnvelopeError::Malformed(_))
        ));
        assert!(matches!(
            PushMessage::decode(r#"{"data":{}}"#),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn bad_payload_for_known_type_is_invalid() {
        let err = PushMessage::decode(r#"{"type":"flight_seats","data":{"flight_id":"x"}}"#).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidPayload { ref kind, .. } if kind == "flight_seats"));
    }
}
