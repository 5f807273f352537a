// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (whitelisted address or bearer token).
pub mod extract;
pub mod protected;
pub mod public;
