#![doc = include_str!("../README.md")]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

mod export;
#[cfg(feature = "implib")]
mod implib;
mod lines;
mod manifest;
mod symbol;

#[cfg(feature = "implib")]
pub(crate) use std::path::{Path, PathBuf};

pub use anyhow::{Error, Result};
pub use export::{generate, DefWriter, LIBRARY_NAME, MIN_SYMBOLS};
#[cfg(feature = "implib")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "implib")))]
pub use implib::ImportLibraryGenerator;
pub use lines::SymbolLines;
pub use manifest::{Manifest, ManifestFormat};
pub use symbol::{Symbol, SymbolKind};
