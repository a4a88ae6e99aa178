//! Error classification at the dispatch boundary.
//!
//! Only [`UpstreamCallError`] crosses the boundary; everything else is
//! contained and reported as a `failed` status.

use crate::domain::{ActionError, UpstreamCallError};

#[derive(Debug)]
pub enum Disposition {
    /// Hand back to the caller of `execute` unmodified.
    Propagate(UpstreamCallError),
    /// Log and convert to `(absent, failed)`.
    Contain(ActionError),
}

pub fn classify(err: ActionError) -> Disposition {
    match err {
        ActionError::Upstream(upstream) => Disposition::Propagate(upstream),
        ActionError::Other(boxed) => match ActionError::other(boxed) {
            ActionError::Upstream(upstream) => Disposition::Propagate(upstream),
            contained => Disposition::Contain(contained),
        },
        other => Disposition::Contain(other),
    }
}
