//! Ready-to-use command tree passes.

pub mod dumper;
pub mod kinds;
pub mod parameters;

pub use dumper::ExpressionDumper;
pub use kinds::KindCounter;
pub use parameters::ParameterCollector;
