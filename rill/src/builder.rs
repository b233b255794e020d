//! Low-level API for building RILL binary modules.

use crate::binary::RawModule;
use crate::module;
use crate::record::{ModuleIdentifier, SymbolRecord};
use crate::versioning;
use crate::writer::Writer;
use std::io::Write;

/// Allows constructing a RILL module and writing its contents to a destination.
#[derive(Clone, Debug)]
pub struct Builder {
    format_version: versioning::SupportedFormat,
    identifier: ModuleIdentifier<'static>,
    symbols: Vec<SymbolRecord<'static>>,
}

impl Builder {
    pub fn with_format_version(identifier: ModuleIdentifier<'static>, format_version: versioning::SupportedFormat) -> Self {
        Self {
            format_version,
            identifier,
            symbols: Vec::default(),
        }
    }

    pub fn new(identifier: ModuleIdentifier<'static>) -> Self {
        Self::with_format_version(identifier, versioning::SupportedFormat::CURRENT)
    }

    #[inline]
    pub fn format_version(&self) -> &versioning::SupportedFormat {
        &self.format_version
    }

    #[inline]
    pub fn identifier(&self) -> &ModuleIdentifier<'static> {
        &self.identifier
    }

    /// Appends a symbol summary to this module. Emission preserves the order in which summaries were appended.
    pub fn add_symbol<S: Into<SymbolRecord<'static>>>(&mut self, symbol: S) {
        self.symbols.push(symbol.into());
    }

    /// Retrieves the symbol summaries that are currently in this module.
    #[inline]
    pub fn symbols(&self) -> &[SymbolRecord<'static>] {
        &self.symbols
    }

    /// Writes the binary contents of the RILL module to the specified destination.
    pub fn write_to<W: Write>(&self, destination: W) -> std::io::Result<()> {
        let mut out = Writer::new(destination);

        out.write_all(crate::binary::MAGIC)?;
        out.write_all(&[self.format_version.major, self.format_version.minor])?;
        out.write_identifier(self.identifier.name())?;
        out.write_identifier(self.identifier.link_name())?;
        out.write_length(self.symbols.len())?;

        for symbol in &self.symbols {
            out.write_byte(symbol.flags().bits())?;
            out.write_identifier(symbol.name())?;
            if let Some(body) = symbol.body() {
                out.write_length(body.bytes().len())?;
                out.write_all(body.bytes())?;
            }
        }

        out.flush()
    }

    /// Writes the module into an owned byte image.
    pub fn to_raw_module(&self) -> std::io::Result<RawModule> {
        let mut contents = Vec::with_capacity(64);
        self.write_to(&mut contents)?;
        Ok(RawModule::from_vec(contents))
    }

    pub fn into_contents(self) -> module::Contents {
        module::Contents {
            format_version: self.format_version,
            identifier: self.identifier,
            symbols: self.symbols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use crate::linkage::InlinePolicy;
    use crate::reader::Reader;
    use crate::record::{Body, Linkage, ModuleIdentifier, SymbolRecord};
    use std::borrow::Cow;

    #[test]
    fn written_module_reads_back_with_identical_contents() {
        let name = crate::Identifier::try_from("core").unwrap();
        let link_name = crate::Identifier::try_from("rillCore").unwrap();
        let mut builder = Builder::new(ModuleIdentifier::new_owned(name, link_name));

        let exported = crate::Identifier::try_from("$s4core3fooyyF").unwrap();
        builder.add_symbol(
            SymbolRecord::function(Cow::Owned(exported), Linkage::Public)
                .with_inline_policy(InlinePolicy::NoInline)
                .with_body(Body::from_instructions(&[crate::instruction::Instruction::Ret]).unwrap()),
        );

        let thin = crate::Identifier::try_from("$s4core3baryyF").unwrap();
        builder.add_symbol(SymbolRecord::function(Cow::Owned(thin), Linkage::Private));

        let image = builder.to_raw_module().unwrap();
        let contents = Reader::new(image.bytes()).read_contents().unwrap();

        assert_eq!(&contents.identifier, builder.identifier());
        assert_eq!(contents.symbols.as_slice(), builder.symbols());
    }
}
