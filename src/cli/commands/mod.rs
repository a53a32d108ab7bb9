mod accounts;
mod cars;
mod seed;

pub use accounts::{cmd_create_admin, cmd_promote};
pub use cars::cmd_list_cars;
pub use seed::cmd_seed;
