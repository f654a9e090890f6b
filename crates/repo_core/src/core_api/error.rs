use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveErrorKind {
    /// File missing, unreadable, or unwritable.
    Io,
    /// Wrong key material or corrupted/tampered ciphertext. A fixed,
    /// non-secret key cannot distinguish the two, so both collapse here.
    Decode,
    /// Decryption succeeded but the plaintext is not a valid save document.
    MalformedDocument,
    /// A proposed mutation violates a range/type/existence rule.
    Validation,
    /// An operation that needs a loaded document was called while unloaded.
    NoDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveError {
    pub kind: SaveErrorKind,
    pub message: String,
}

impl SaveError {
    pub fn new(kind: SaveErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SaveError {}
