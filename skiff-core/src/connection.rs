use crate::{Executor, Result};
use std::{future::Future, sync::Arc};

/// A non-fatal diagnostic emitted by the backend during execution.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Backend-specific result or error code.
    pub code: i32,
    pub message: String,
}

/// Sink receiving [`Notice`]s, installed per connection. Besides the `log`
/// facade this is the only diagnostic channel that is not an error return.
pub type NoticeSink = Arc<dyn Fn(&Notice) + Send + Sync>;

/// A single open connection to the backend. One is created per engine call
/// and released (handle closed) when it goes out of scope, on every exit
/// path.
pub trait Connection: Executor {
    /// Open a connection to the given URL (`<driver>://..`).
    fn connect(url: &str) -> impl Future<Output = Result<Self>>
    where
        Self: Sized;

    /// Install a diagnostic sink. Default: notices are dropped (they are
    /// still logged by the driver).
    fn on_notice(&mut self, _sink: NoticeSink) {}
}
