pub mod bill;
pub mod category;
pub mod rate_unit;
pub mod work_entry;

pub use bill::Bill;
pub use category::Category;
pub use rate_unit::RateUnit;
pub use work_entry::{WorkEntry, parse_work_date};
