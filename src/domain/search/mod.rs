//! Search domain: criteria, command kinds, listings, ranking, and the
//! result cursor that drives paginated delivery.

mod command_kind;
mod criteria;
mod cursor;
mod listing;
mod ranking;

pub use command_kind::CommandKind;
pub use criteria::{CriteriaDraft, Currency, SearchCriteria};
pub use cursor::ResultCursor;
pub use listing::{Listing, Price};
pub use ranking::rank;
