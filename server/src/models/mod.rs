pub mod event;
pub mod registration;

pub use event::{
    CreateEventRequest, Event, EventField, EventForm, EventPatch, NewEvent, PatchValue,
    UpdateEventRequest,
};
pub use registration::Registrant;
