//! Contains types to abstract over the binary representation of the RILL format.

/// The magic number that is the start of all RILL module files.
pub const MAGIC: &[u8; 4] = b"RILL";

/// Represents an array of bytes that make up a RILL module.
#[derive(Clone)]
#[repr(transparent)]
pub struct RawModule {
    contents: Vec<u8>,
}

impl RawModule {
    pub(crate) fn from_vec(contents: Vec<u8>) -> Self {
        Self { contents }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.contents
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.contents
    }
}

impl std::ops::Deref for RawModule {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes()
    }
}

impl AsRef<[u8]> for RawModule {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}

impl std::fmt::Debug for RawModule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "RawModule({} bytes)", self.contents.len())
    }
}
