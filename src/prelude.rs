//! # dsgen Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dsgen library. Import this module to get quick access to the essential
//! types for generating typed datasets.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dsgen operations
pub use crate::Error;

/// The result type used throughout dsgen
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Generation front end and its options
pub use crate::codegen::{GenerateOption, GenerationResult, TypedDataSetGenerator};

/// Single-method signatures
pub use crate::codegen::{ContainerType, MethodSignatureGenerator, ParameterGenerationOption};

/// Schema importer bridge
pub use crate::importer::{ImportTarget, TypedDataSetSchemaImporterExtension};

/// Property-reference persistence
pub use crate::serializer::{PropertyReference, PropertyReferenceSerializer};

// ================================================================================================
// Design Model
// ================================================================================================

/// Tables, columns and the data source
pub use crate::design::{
    DataColumn, DesignColumn, DesignConnection, DesignDataSource, DesignRelation, DesignTable,
};

/// Data-access commands
pub use crate::design::{DbCommand, DbSource, DbType, DesignParameter, QueryType};

// ================================================================================================
// Code Document
// ================================================================================================

/// Compile units, namespaces and types
pub use crate::codedom::{
    CodeCompileUnit, CodeExpression, CodeNamespace, CodeTypeDeclaration, CodeTypeReference,
};

/// Emitters
pub use crate::codedom::{emitter_for_language, CSharpEmitter, CodeEmitter};

// ================================================================================================
// Schemas and Assemblies
// ================================================================================================

/// XML Schema documents
pub use crate::schema::{Schema, SchemaSet};

/// Assembly identities and resolution
pub use crate::assembly::{AssemblyIdentity, AssemblyResolver, AssemblyVersion, KnownAssemblies};
