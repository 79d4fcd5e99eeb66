pub mod root;

pub use root::{db_time, greeting};
