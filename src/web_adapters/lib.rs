mod admin;
mod middlewares;
mod push;
mod utils;

pub use admin::admin_routes;
pub use middlewares::auth::{AdminIdentity, AuthenticateAdmin};
pub use push::push_routes;
pub use utils::ErrorResponse;
