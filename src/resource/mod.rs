pub mod payload;
pub mod results;

pub use payload::{Field, ResultPayload};
pub use results::{Reply, ResultResource};
