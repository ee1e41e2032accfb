//! ngdoc — extract `@ngdoc` documentation records from annotated sources.
//!
//! Files are parsed into per-file record lists, collected in a
//! [`DocIndexBuilder`], sealed into a [`DocIndex`], and then have their missing
//! module links back-filled from the nearest `@ngdoc module` declaration.
//!
//! ```
//! use ngdoc::{build_index, SourceFile};
//!
//! let files = [
//!     SourceFile::new("app/index.js", "js", "/**\n * @ngdoc module\n * @name app\n */"),
//!     SourceFile::new("app/ui/tabs.js", "js", "/**\n * @ngdoc directive\n * @name tabs\n */"),
//! ];
//! let index = build_index(&files);
//! let tabs = &index.docs("app/ui/tabs.js").unwrap()[0];
//! assert_eq!(tabs.module.as_deref(), Some("app"));
//! ```

pub mod index;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;

pub use index::{DocIndex, DocIndexBuilder, FileDocs};
pub use model::*;

/// Parse every file, seal the index, and resolve modules.
pub fn build_index(files: &[SourceFile]) -> DocIndex {
    let mut builder = DocIndexBuilder::new();
    for file in files {
        builder.add_file(file);
    }
    let mut index = builder.seal();
    index.backfill_all();
    index
}
