//! cenykatalog - Daily apartment price publication for the dane.gov.pl harvester
//!
//! This crate reads a developer's apartment price spreadsheet, stores it as a
//! dated CSV partitioned by year, and maintains a harvester XML catalog (plus
//! its MD5 digest) that references every published CSV.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cenykatalog::{PipelineBuilder, RunOutcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Run with the built-in defaults in the current directory
//!     let pipeline = PipelineBuilder::new().build()?;
//!
//!     match pipeline.run()? {
//!         RunOutcome::Completed(summary) => {
//!             println!("{} resources, md5 {}", summary.resource_dates.len(), summary.catalog.digest);
//!         }
//!         RunOutcome::InputMissing(path) => {
//!             eprintln!("missing input: {}", path.display());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use cenykatalog::{CatalogConfig, CatalogMode, PipelineBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CatalogConfig::from_json_file("acme.json")?;
//!
//!     let pipeline = PipelineBuilder::new()
//!         .with_config(config)
//!         .with_root("/srv/ceny-mieszkan")
//!         .with_mode(CatalogMode::Merge)      // Append missing dates only
//!         .with_date("2025-06-01".parse()?)   // Fixed processing date
//!         .build()?;
//!
//!     pipeline.run()?;
//!     Ok(())
//! }
//! ```
//!
//! # Building Blocks
//!
//! The individual stages can be used on their own:
//!
//! ```rust
//! use cenykatalog::{xml, CatalogBuilder, CatalogConfig, PathResolver};
//!
//! # fn main() -> Result<(), cenykatalog::CatalogError> {
//! let resolver = PathResolver::new(".", CatalogConfig::default());
//! let catalog = CatalogBuilder::new(resolver).rebuild(&["2025-06-01".parse()?], 2025);
//!
//! let bytes = xml::serialize(&catalog)?;
//! assert!(bytes.starts_with(b"<?xml version='1.0' encoding='utf-8'?>\n<ns2:datasets"));
//! assert_eq!(cenykatalog::md5_hex(&bytes).len(), 32);
//! # Ok(())
//! # }
//! ```

mod builder;
mod catalog;
mod config;
mod digest;
mod discovery;
mod error;
mod export;
mod formatter;
mod parser;
mod paths;
mod pipeline;
mod store;
mod types;
pub mod xml;

// Public API exports
pub use builder::PipelineBuilder;
pub use catalog::{
    insert_resource, resource_dates, resource_identifier, CatalogBuilder, MergeOutcome,
    MAX_IDENT_LEN,
};
pub use config::{CatalogConfig, CatalogMode};
pub use digest::md5_hex;
pub use discovery::{CsvDiscovery, Discovery};
pub use error::CatalogError;
pub use export::{CsvExporter, ExportOutcome};
pub use parser::load_table;
pub use paths::{PathResolver, PublicationDate};
pub use pipeline::{Pipeline, RunOutcome, RunSummary};
pub use store::{write_catalog, WrittenFiles};
pub use types::Table;
pub use xml::Element;
