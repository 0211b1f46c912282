mod support;

mod list_concat;
mod list_search;
mod list_traits;
mod map_update;
mod stress;
