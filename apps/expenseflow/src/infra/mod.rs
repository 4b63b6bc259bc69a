pub mod context;

pub use context::{build_context, ClientContext, ContextBuilder};
