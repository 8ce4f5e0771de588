// Signup, login and progress tracking over the flat-file user store.

pub mod handlers;
pub mod store;
