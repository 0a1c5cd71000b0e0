//! External collaborator adapters
//!
//! Everything the core reads or writes outside its own process lives behind a
//! trait here: the hosted datastore ([`datastore`]), object storage
//! ([`storage`]), and the PDF render service ([`render`]). The workflow and
//! reporting layers depend only on the traits.

pub mod datastore;
pub mod render;
pub mod storage;
