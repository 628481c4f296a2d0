mod combine_operator;
mod remote_handle;
mod remote_object_id;

pub use combine_operator::{Combinable, CombineOperator};
pub use remote_handle::RemoteHandle;
pub use remote_object_id::RemoteObjectId;
