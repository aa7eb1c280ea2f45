pub mod event;
pub mod form;

pub use event::{Event, EventDraft, EventRow, EventStatus, UnknownStatus};
pub use form::EventForm;
