//! Contains the trait used to obtain the contents of a module during loading.

use rill::module::Contents;
use rill::reader::{self, Reader};
use std::io::Read;

/// Trait for anything that can yield the contents of a RILL module: a binary image, an in-memory value produced by a
/// front-end, or a builder used in tests.
pub trait Source {
    type Error;

    fn read_contents(self) -> Result<Contents, Self::Error>;
}

impl Source for Contents {
    type Error = std::convert::Infallible;

    #[inline]
    fn read_contents(self) -> Result<Contents, Self::Error> {
        Ok(self)
    }
}

impl Source for rill::builder::Builder {
    type Error = std::convert::Infallible;

    #[inline]
    fn read_contents(self) -> Result<Contents, Self::Error> {
        Ok(self.into_contents())
    }
}

impl<R: Read> Source for Reader<R> {
    type Error = reader::Error;

    fn read_contents(self) -> Result<Contents, Self::Error> {
        Reader::read_contents(self)
    }
}

impl Source for &[u8] {
    type Error = reader::Error;

    fn read_contents(self) -> Result<Contents, Self::Error> {
        Reader::new(self).read_contents()
    }
}
