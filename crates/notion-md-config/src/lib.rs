mod schema;
mod loader;

pub use schema::*;
pub use loader::load;
