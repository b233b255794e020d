//! Module for emitting the output of a link session in textual and binary form.
//!
//! Both emitters consume an [`Output`] and are expected not to fail for any output a session actually produced;
//! serialized bodies were already decoded during annotation, so the only errors surfaced here come from the
//! destination writer.

use crate::annotate::Linked;
use crate::state::Output;
use rill::record::{Linkage, SymbolKind, SymbolRecord};
use std::borrow::Cow;
use std::io::{Error, ErrorKind, Write};

fn keyword(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Function => "function",
        SymbolKind::Type => "type",
        SymbolKind::Global => "global",
    }
}

fn body_is_shipped(entry: &Linked) -> bool {
    match entry {
        Linked::Symbol { symbol, attributes } => {
            attributes.serialized || (symbol.origin() == crate::symbol::Origin::Local && symbol.body_present())
        }
        Linked::Stub { .. } => false,
    }
}

/// Writes a human readable dump of a linked module.
///
/// Local definitions and serialized external symbols are printed with their instructions; thin symbols are printed as
/// bare declarations, and unresolved references appear as `@unknown` stubs naming the missing symbol.
pub fn write_textual<W: Write>(output: &Output, mut destination: W) -> std::io::Result<()> {
    writeln!(destination, "module {} // links as {}", output.identifier.name(), output.identifier.link_name())?;

    for entry in &output.symbols {
        match entry {
            Linked::Symbol { symbol, attributes } => {
                write!(destination, "{} {} @{}", keyword(symbol.kind()), attributes, symbol.name())?;

                if body_is_shipped(entry) {
                    let instructions = symbol
                        .instructions()
                        .map_err(|error| Error::new(ErrorKind::InvalidData, error))?;

                    writeln!(destination, " {{")?;
                    for instruction in instructions {
                        writeln!(destination, "  {}", instruction)?;
                    }
                    writeln!(destination, "}}")?;
                } else {
                    writeln!(destination)?;
                }
            }
            Linked::Stub { reference } => {
                writeln!(destination, "function @unknown // {}", reference)?;
            }
        }
    }

    Ok(())
}

/// Rebuilds a module builder from a linked output.
///
/// Bodies are shipped only for local definitions and for external symbols marked serialized. The binary form has no
/// notion of external visibility, so serialized externals are encoded as exported definitions with bodies, and stubs
/// for unresolved references are omitted entirely.
pub fn to_builder(output: &Output) -> rill::builder::Builder {
    let mut builder = rill::builder::Builder::new(output.identifier.clone());

    for entry in &output.symbols {
        let (symbol, attributes) = match entry {
            Linked::Symbol { symbol, attributes } => (symbol, attributes),
            Linked::Stub { .. } => continue,
        };

        let linkage = if attributes.visibility == rill::linkage::Visibility::Private {
            Linkage::Private
        } else {
            Linkage::Public
        };

        let mut record = SymbolRecord::new(
            Cow::Owned(symbol.name().to_owned()),
            symbol.kind(),
            linkage,
            attributes.inline_policy,
            None,
        );

        if body_is_shipped(entry) {
            if let Some(body) = symbol.record().body() {
                record = record.with_body(body.clone());
            }
        }

        builder.add_symbol(record);
    }

    builder
}

/// Writes the binary form of a linked module.
pub fn write_binary<W: Write>(output: &Output, destination: W) -> std::io::Result<()> {
    to_builder(output).write_to(destination)
}
