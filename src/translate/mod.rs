pub mod client;
pub mod error;
pub mod interface;
pub mod parse;
pub mod prompt;
pub mod provenance;
pub mod service;

pub use client::{HttpTransport, TranslationClient, TranslationTransport, TransportError};
pub use error::TranslateError;
pub use interface::*;
pub use provenance::ProvenanceTriple;
pub use service::TranslationService;
