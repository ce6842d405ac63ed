pub mod collection;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::get as collection_get;
pub use collection::post as collection_post;
pub use collection::options as collection_options;
pub use collection::fallback as collection_fallback;

pub use record::get as record_get;
pub use record::put as record_put;
pub use record::delete as record_delete;
pub use record::options as record_options;
pub use record::fallback as record_fallback;
