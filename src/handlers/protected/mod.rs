// handlers/protected/mod.rs - Handlers behind bearer-token authentication
//
// The `authenticate` middleware resolves every request into an
// `Authentication`; each operation then rejects anonymous callers with 401
// and applies the results policy before touching the store.

pub mod results;

pub use results::*;
