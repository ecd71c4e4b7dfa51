/*!
 * Monitoring
 * Structured logging for lifecycle operations
 */

mod tracer;

pub use tracer::{init_tracing, span_strategy};
