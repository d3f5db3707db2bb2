// handlers/mod.rs - 2-Tier Handler Architecture
//
// Public (no auth) -> Protected (Basic auth via middleware::basic_auth_middleware)
pub mod public; // Tier 1: catalog reads, team roster, meta, health
pub mod protected; // Tier 2: catalog writes (/api/items POST, PUT, DELETE)
