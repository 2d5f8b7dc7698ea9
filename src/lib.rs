// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! # dsgen
//!
//! Typed dataset code generation: from an annotated XML Schema to strongly typed data-access
//! classes.
//!
//! A dataset schema describes tables, columns, keys and relations, and (through a designer
//! annotation) the connections and SQL commands used to fill and update them. `dsgen` reads
//! such a schema into an in-memory design model, builds a code document holding the typed
//! dataset and its table adapters, and records which assemblies the generated code needs. The
//! code document is rendered by a [`codedom::CodeEmitter`]; a C# emitter is included.
//!
//! ## Features
//!
//! - **Design model** - tables, columns, constraints, relations, mappings and command sources
//!   with the invariants dataset designers rely on
//! - **Typed datasets** - dataset, table and row classes, optionally LINQ-enabled
//! - **Table adapters** - Fill/Get/paging methods, functions, updates and a hierarchical
//!   update manager
//! - **Signatures** - the one-line declaration of a single accessor method
//! - **Schema importer bridge** - datasets referenced from web-service schemas
//! - **Property references** - the compact persisted form of connection-string expressions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dsgen::prelude::*;
//!
//! let schema = std::fs::read_to_string("tests/samples/northwind.xsd")?;
//!
//! let mut unit = CodeCompileUnit::default();
//! let mut namespace = CodeNamespace::new("Northwind.Data");
//! let result = TypedDataSetGenerator::new()
//!     .options(GenerateOption::HIERARCHICAL_UPDATE)
//!     .generate(&schema, &mut unit, &mut namespace, &CSharpEmitter::new())?;
//! unit.namespaces.insert(0, namespace);
//!
//! println!("// {}", result.dataset_name);
//! println!("{}", CSharpEmitter::new().emit_compile_unit(&unit)?);
//! # Ok::<(), dsgen::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! - [`xml`] and [`schema`] - namespace-aware XML and the XML Schema object model
//! - [`codedom`] - the code document and its emitters
//! - [`assembly`] - assembly identities and the resolver seam
//! - [`design`] - the design model and its schema loader
//! - [`codegen`] - generators and the [`codegen::TypedDataSetGenerator`] front end
//! - [`importer`] - the schema importer bridge
//! - [`serializer`] - the property-reference format
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Failures while reading a schema or
//! generating code are reported as one error carrying the whole chain of causes:
//!
//! ```rust
//! use dsgen::{Error, codegen::TypedDataSetGenerator};
//!
//! match TypedDataSetGenerator::new().get_provider_name("<not a schema", None) {
//!     Err(Error::SchemaConversion(message)) => assert!(!message.is_empty()),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run schema --release
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dsgen::prelude::*;
///
/// let generator = TypedDataSetGenerator::new().options(GenerateOption::LINQ_OVER_TYPED_DATASETS);
/// assert!(generator.generate_options().contains(GenerateOption::LINQ_OVER_TYPED_DATASETS));
/// ```
pub mod prelude;

/// Namespace-aware XML reading on top of `quick-xml`.
pub mod xml;

/// XML Schema object model for dataset schemas.
pub mod schema;

/// The code document model and code emitters.
pub mod codedom;

/// Assembly identities and resolution of referenced assemblies.
pub mod assembly;

/// The design model of a typed dataset.
///
/// # Key Components
///
/// - [`design::DesignDataSource`] - the dataset: tables, relations, connections, sources
/// - [`design::DesignTable`] - columns, mappings, constraints and adapter sources
/// - [`design::DesignColumn`] - one column and its generator hints
/// - [`design::DbSource`] - one data-access command and its method naming
pub mod design;

/// Code generation from the design model.
pub mod codegen;

/// The schema importer bridge.
pub mod importer;

/// The persisted form of property-reference expressions.
pub mod serializer;

/// `dsgen` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use dsgen::{Result, design::DesignDataSource};
///
/// fn table_count(schema: &str) -> Result<usize> {
///     Ok(DesignDataSource::from_schema(schema)?.tables().len())
/// }
/// assert!(table_count("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dsgen` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;
