pub mod calendar;
pub mod events;
pub mod listing;
pub mod normalize;
