// handlers/mod.rs - Two tiers
//
// Public (no auth) → Protected (JWT bearer, checked per operation)
pub mod public;
pub mod protected;
