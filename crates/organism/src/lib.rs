//! Top-level facade crate for organism.
//!
//! Re-exports the metrics core and the service library so users can depend on a single crate.

pub mod core {
    pub use organism_core::*;
}

pub mod service {
    pub use organism_service::*;
}
