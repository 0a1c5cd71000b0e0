//! REST datastore adapter modules

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::RestDatastore;
pub use client::DatastoreClient;
