pub mod room;
pub mod movie;
pub mod showtime;
pub mod seat;
pub mod reservation;

pub use room::Room;
pub use movie::{Movie, NewMovie};
pub use showtime::Showtime;
pub use seat::Seat;
pub use reservation::Reservation;
