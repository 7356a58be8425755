// Persistence contract: plain query functions, no business logic.
// Every function takes an executor so services can run them on the
// pool directly or compose them inside one transaction.
pub mod rooms;
pub mod movies;
pub mod showtimes;
pub mod seats;
