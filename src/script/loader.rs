//! Asset loader for dialog scripts from "dialog.ron" files.

use bevy::{
    asset::{io::Reader, AssetLoader, AsyncReadExt, LoadContext},
    utils::BoxedFuture,
};
use serde_ron::de::from_bytes;
use thiserror::Error;

use crate::prelude::RawDialogScript;

/// Loads [`RawDialogScript`]s from `.dialog.ron` assets.
#[derive(Default)]
pub struct DialogScriptLoader;

/// Errors when loading a dialog script asset.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ScriptLoaderError {
    /// An [IO Error](std::io::Error)
    #[error("Could not read the file: {0}")]
    Io(#[from] std::io::Error),
    /// A [RON Error](serde_ron::error::SpannedError)
    #[error("Could not parse RON: {0}")]
    Ron(#[from] serde_ron::error::SpannedError),
}

impl AssetLoader for DialogScriptLoader {
    type Asset = RawDialogScript;
    type Settings = ();
    type Error = ScriptLoaderError;

    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a Self::Settings,
        _load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let raw = from_bytes::<RawDialogScript>(&bytes)?;
            Ok(raw)
        })
    }

    fn extensions(&self) -> &[&str] {
        &["dialog.ron"]
    }
}
