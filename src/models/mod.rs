pub mod progress;
pub mod session;

pub use progress::{DayProgress, MonthProgress, RangeProgress, WeekProgress};
pub use session::Session;
