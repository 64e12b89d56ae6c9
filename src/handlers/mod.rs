// handlers/mod.rs - resource handlers behind the front controller
//
// Each resource module exposes its actions and a `resource()` builder;
// `route_table()` assembles them into the table the dispatcher resolves against.
pub mod auth;
pub mod ingredient;
pub mod not_found;
pub mod recipe;
pub mod utils;

use crate::router::{action, RouteTable};

pub fn route_table() -> RouteTable {
    RouteTable::new(action(not_found::not_found))
        .resource(auth::resource())
        .resource(ingredient::resource())
        .resource(recipe::resource())
}
