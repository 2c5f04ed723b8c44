// Stateful managers: cookie jars and the history store built on top of them.

pub mod cookie_jar;
pub mod history_store;
pub mod sqlite_cookie_jar;
