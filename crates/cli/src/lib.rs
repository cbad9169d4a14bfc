//! Incremental font client CLI library.

pub mod cli;
pub mod envelope;
pub mod inspect;
pub mod io;
pub mod resolve;

pub use envelope::Envelope;
pub use io::DirectoryInstaller;
