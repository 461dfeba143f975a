pub mod response;
pub mod signal;
pub mod stock;
pub mod watchlist;

pub use response::*;
pub use signal::*;
pub use stock::*;
pub use watchlist::*;
