pub mod bookings;
pub mod draft;
pub mod money;
pub mod quote;
pub mod room;
pub mod wizard;
