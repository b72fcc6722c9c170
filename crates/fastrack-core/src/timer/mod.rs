mod countdown;
mod driver;

pub use countdown::{Countdown, CountdownState};
pub use driver::TickDriver;
