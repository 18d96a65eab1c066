// Library for tests and demos to access modules

pub mod acquisition;
pub mod classify;
pub mod config;
pub mod models;
pub mod routes;
pub mod series;
pub mod source;
pub mod version;
pub mod view;
