pub mod auth;
pub mod chain;
pub mod cors;
pub mod error;
pub mod rate_limit;
pub mod traits;

pub use chain::{execute, Chain, Outcome};
pub use error::{Error, Lookup, Result, ValidationFailure};
pub use traits::{handler_fn, pass_through, BoxFuture, BoxedHandler, Handler, HandlerFn, PassThrough};
