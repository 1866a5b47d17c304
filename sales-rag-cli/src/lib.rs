//! Console front end for the `sales-rag` assistant.

pub mod args;
pub mod console;
pub mod logging;
pub mod startup;
