mod increment_u64_id;
mod now;

pub use increment_u64_id::increment_u64_id;
pub use now::{elapsed_milliseconds, now};
