// handlers/protected/mod.rs - Protected handlers (Basic authentication required)
//
// Route Prefix: /api/items
// Middleware: basic_auth_middleware, applied with route_layer so it only wraps these routes

pub mod items; // POST /api/items, PUT/DELETE /api/items/:id

pub use items::{item_delete, item_put, items_post};
