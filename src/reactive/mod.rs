pub mod owner;

pub use owner::{current_owner, dispose_owner, on_cleanup, with_owner, OwnerId};
