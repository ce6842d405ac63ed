// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service descriptor and health probe. OPTIONS on the results resource is
// public too, but lives with the rest of the resource under `protected`.

pub mod home;

pub use home::{health, root};
