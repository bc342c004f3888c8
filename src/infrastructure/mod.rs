pub mod js_executor;

pub use js_executor::{with_payload, JsExecutor};
