use serde::{Deserialize, Serialize};

/// How the state behind one remote object is merged with the currently
/// selected object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CombineOperator {
    Union,
    Intersection,
    Exclude,
    Replace,
}

/// Hook for handles that represent combinable state.
///
/// The default implementation does nothing; views that support set-like
/// combination override it.
pub trait Combinable {
    fn combine(&self, _how: CombineOperator) {}
}
