use serde::Serialize;

use paddock_core::{AttendeeId, Entity, EventId, RiderId};

/// Join record: `rider_id` attends `event_id`. The pair is unique.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: AttendeeId,
    pub event_id: EventId,
    pub rider_id: RiderId,
}

impl Entity for Attendee {
    type Id = AttendeeId;

    fn id(&self) -> AttendeeId {
        self.id
    }
}
