// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Read-only views of the catalog plus liveness. Inputs are untrusted but nothing here mutates.

pub mod health; // GET /health
pub mod items; // GET /api/items, GET /api/items/:id
pub mod meta; // GET /api/meta
pub mod team; // GET /api/team

pub use health::health;
pub use items::{item_get, items_get};
pub use meta::meta_get;
pub use team::team_get;
