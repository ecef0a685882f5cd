//! Purpose: The contract every JSON implementation under test satisfies.
//! Exports: `JsonBackend`.
//! Role: Monomorphized seam between the harness and a JSON library.
//! Invariants: A `Document` never leaves the backend that produced it (associated type).
//! Invariants: `statistics` is deterministic and never mutates the document.
//! Invariants: `free` consumes the handle, so double release and null release cannot be written.

use crate::core::error::Error;
use crate::core::stat::Stat;

pub trait JsonBackend {
    /// The backend's in-memory representation of one parsed document.
    type Document;

    /// Stable label used for ordering and reporting.
    fn name(&self) -> &str;

    /// Builds a document from JSON text. Malformed input is an `Err`, never a panic.
    fn parse(&self, text: &[u8]) -> Result<Self::Document, Error>;

    /// Compact JSON text.
    fn stringify(&self, doc: &Self::Document) -> Result<Vec<u8>, Error>;

    /// Human-formatted JSON text; indentation is up to the backend.
    fn prettify(&self, doc: &Self::Document) -> Result<Vec<u8>, Error>;

    fn statistics(&self, doc: &Self::Document) -> Stat;

    /// Releases everything owned by `doc`.
    ///
    /// Backends that own foreign resources override this; the default drops the value.
    fn free(&self, doc: Self::Document) {
        drop(doc);
    }
}
