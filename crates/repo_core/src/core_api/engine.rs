use std::fs;
use std::path::Path;

use crate::codec::CipherCodec;
use crate::document::SaveDocument;
use crate::framing;
use crate::kdf::KeyDerivation;
use crate::validate;

use super::error::{SaveError, SaveErrorKind};
use super::types::{FileInfo, PlayerRoster, PlayerUpgrades, WorldRecord};

/// Facade over one save file: open, inspect, mutate, validate, save.
///
/// Owns at most one document at a time. Opening a new file replaces the
/// current document only once the whole load pipeline succeeds; unsaved
/// edits in the previous document are discarded at that point.
#[derive(Debug)]
pub struct Editor {
    codec: CipherCodec,
    document: Option<SaveDocument>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_key_derivation(KeyDerivation::game_default())
    }

    /// Editor using an alternate passphrase, mainly for tests against
    /// containers not written by the game.
    pub fn with_passphrase(passphrase: impl Into<String>) -> Self {
        Self::with_key_derivation(KeyDerivation::new(passphrase))
    }

    fn with_key_derivation(kdf: KeyDerivation) -> Self {
        Self {
            codec: CipherCodec::new(kdf),
            document: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Read, decrypt, de-frame, and parse `path`. On any stage failure the
    /// previously loaded state is left untouched.
    pub fn open_save_file(&mut self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let container = fs::read(path).map_err(|e| {
            SaveError::new(
                SaveErrorKind::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let plaintext = self.codec.decrypt(&container)?;
        let plaintext = framing::maybe_decompress(plaintext)?;
        let document = SaveDocument::parse(&plaintext)?;
        self.document = Some(document);
        Ok(())
    }

    /// Serialize, encrypt, and write the current document. The plaintext is
    /// fully built in memory before any disk write; on failure the in-memory
    /// document is unchanged and the editor stays loaded.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        self.write_container(path.as_ref(), false)
    }

    /// Same as `save_file` but gzip-frames the plaintext before encryption.
    pub fn save_file_compressed(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        self.write_container(path.as_ref(), true)
    }

    pub fn world(&self) -> Result<Option<WorldRecord>, SaveError> {
        Ok(self.loaded()?.world())
    }

    pub fn players(&self) -> Result<PlayerRoster, SaveError> {
        Ok(self.loaded()?.players())
    }

    pub fn file_info(&self) -> Result<Option<FileInfo>, SaveError> {
        Ok(self.loaded()?.file_info())
    }

    /// The serialized document text, for on-screen display.
    pub fn dump_plaintext(&self) -> Result<String, SaveError> {
        let bytes = self.loaded()?.serialize()?;
        String::from_utf8(bytes).map_err(|e| {
            SaveError::new(
                SaveErrorKind::MalformedDocument,
                format!("serialized document is not UTF-8: {e}"),
            )
        })
    }

    pub fn validate_world(&self, record: &WorldRecord) -> Result<(), SaveError> {
        self.loaded()?;
        validate::validate_world(record)
    }

    pub fn validate_player(
        &self,
        id: &str,
        health: i64,
        upgrades: &PlayerUpgrades,
    ) -> Result<(), SaveError> {
        validate::validate_player(self.loaded()?, id, health, upgrades)
    }

    /// Validates, then writes all six world fields.
    pub fn update_world(&mut self, record: &WorldRecord) -> Result<(), SaveError> {
        let Some(document) = self.document.as_mut() else {
            return Err(no_document());
        };
        validate::validate_world(record)?;
        document.update_world(record)
    }

    /// Validates, then writes the ten per-player values for `id`.
    pub fn update_player(
        &mut self,
        id: &str,
        health: i64,
        upgrades: &PlayerUpgrades,
    ) -> Result<(), SaveError> {
        let Some(document) = self.document.as_mut() else {
            return Err(no_document());
        };
        validate::validate_player(document, id, health, upgrades)?;
        document.update_player(id, health, upgrades)
    }

    fn write_container(&self, path: &Path, compress: bool) -> Result<(), SaveError> {
        let document = self.loaded()?;
        let mut plaintext = document.serialize()?;
        if compress {
            plaintext = framing::compress(&plaintext)?;
        }
        let container = self.codec.encrypt(&plaintext);
        fs::write(path, container).map_err(|e| {
            SaveError::new(
                SaveErrorKind::Io,
                format!("failed to write {}: {e}", path.display()),
            )
        })
    }

    fn loaded(&self) -> Result<&SaveDocument, SaveError> {
        self.document.as_ref().ok_or_else(no_document)
    }
}

fn no_document() -> SaveError {
    SaveError::new(SaveErrorKind::NoDocument, "no save file is loaded")
}
