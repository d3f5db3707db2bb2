pub mod item;
pub mod team;

pub use item::{coerce_price, Category, Item, ItemDraft, ItemPayload, UnknownCategory};
pub use team::TeamMember;
