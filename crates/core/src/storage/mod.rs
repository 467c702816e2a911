mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{Result, StoreError, TimeWindowError};
pub use http_mapping::store_error_to_status_code;
pub use traits::CalendarStore;
pub use types::TimeWindow;
