//! Client side of Incremental Font Transfer.
//!
//! Each logical font has an [`IftState`] that accumulates a monotonically
//! growing [`SubsetDefinition`] and fetches, decodes and applies patches until
//! the held font binary covers it.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use std::path::Path;
//!
//! use ift_client_core::{FontRequest, IdentityDecoder, IftClient, PatchCatalog, ResolveOptions};
//!
//! let catalog = PatchCatalog::from_dir(Path::new("patches"), "*.iftk", &IdentityDecoder)?;
//! let client = IftClient::new(ResolveOptions::default());
//! let request = FontRequest::new("Roboto").text("Hello, world");
//! let font = client.request_font(&request, &IdentityDecoder, &catalog).await?;
//! std::fs::write("Roboto.otf", &*font)?;
//! # Ok(())
//! # }
//! ```

mod channel;
pub mod config;
mod coverage;
mod decoder;
mod error;
mod install;
pub mod patch;
mod registry;
mod request;
mod state;
mod subset;

pub use channel::{CatalogEntry, PatchCatalog, PatchChannel};
pub use config::ResolveOptions;
pub use coverage::Coverage;
pub use decoder::{Decoder, IdentityDecoder};
pub use error::{DecodeError, Error, PatchError, Result};
pub use install::{FontDescriptor, FontInstaller};
pub use patch::{CompatibilityId, Patch, PatchBuilder, TableEdit};
pub use read_fonts::types::Tag;
pub use registry::StateRegistry;
pub use request::{FontRequest, IftClient};
pub use state::{FontBinary, IftState, Phase};
pub use subset::{AxisRange, SubsetDefinition};
