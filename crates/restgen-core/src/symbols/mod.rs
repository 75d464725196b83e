//! Host symbol model.
//!
//! The generator never inspects source code. It works from a symbol table
//! exported by the host compiler: type declarations with their attributes and
//! members. [`TypeQuery`] is the only capability the rest of the pipeline needs
//! from the host; [`SymbolTable`] is the file-backed implementation.
//!
//! # Examples
//!
//! ```
//! use restgen_core::symbols::{SymbolTable, TypeQuery};
//!
//! let table = SymbolTable::from_str(
//!     r#"
//! types:
//!   - name: UserClient
//!     namespace: Sample
//!     is_partial: true
//! "#,
//! )
//! .unwrap();
//!
//! assert!(table.lookup("Sample", "UserClient", 0).is_some());
//! // Core library types are always present.
//! assert!(table.lookup("System.Threading.Tasks", "Task", 1).is_some());
//! ```

pub mod corlib;
pub mod shape;
pub mod types;

// Internal imports (std, crate)
use std::collections::HashMap;
use std::path::Path;

use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

pub use types::{
    AttrValue, AttributeData, FieldDef, MemberDef, MethodDef, NullableAnnotation, ParameterDef,
    PropertyDef, TypeDef, TypeDefKind, TypeRef, TypeRefKind,
};

/// Capability to resolve type declarations by identity.
pub trait TypeQuery {
    /// Finds the declaration of `namespace.name` with `arity` type parameters.
    fn lookup(&self, namespace: &str, name: &str, arity: usize) -> Option<&TypeDef>;

    /// Finds the declaration a named reference points at.
    fn resolve(&self, ty: &TypeRef) -> Option<&TypeDef> {
        match ty.kind {
            TypeRefKind::Named => self.lookup(&ty.namespace, &ty.name, ty.arity()),
            _ => None,
        }
    }
}

/// Serialized form of a symbol table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolFile {
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

/// Indexed set of type declarations, seeded with the core library.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    types: Vec<TypeDef>,
    index: HashMap<(String, String, usize), usize>,
    declared: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SymbolTable {
    /// Builds a table from user declarations. Declarations sharing an identity
    /// with a core library type replace it.
    pub fn new(declared: Vec<TypeDef>) -> Self {
        let mut table = Self {
            types: Vec::new(),
            index: HashMap::new(),
            declared: 0,
        };
        for def in declared {
            table.insert(def);
        }
        table.declared = table.types.len();
        for def in corlib::types() {
            let key = (def.namespace.clone(), def.name.clone(), def.type_params.len());
            if !table.index.contains_key(&key) {
                table.insert(def);
            }
        }
        table
    }

    fn insert(&mut self, def: TypeDef) {
        let key = (def.namespace.clone(), def.name.clone(), def.type_params.len());
        match self.index.get(&key) {
            Some(&slot) => self.types[slot] = def,
            None => {
                self.index.insert(key, self.types.len());
                self.types.push(def);
            }
        }
    }

    /// Declarations that came from the host, in document order.
    pub fn declared_types(&self) -> &[TypeDef] {
        &self.types[..self.declared]
    }

    /// Load a symbol table from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::from_str(&content).map_err(|e| {
            Error::symbols(format!(
                "Failed to parse symbol table at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse content as either JSON or YAML
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> crate::Result<Self> {
        // Try to parse as JSON first
        if let Ok(file) = serde_json::from_str::<SymbolFile>(content) {
            return Ok(Self::new(file.types));
        }

        // YAML is a superset, so its error is the one worth reporting
        let file: SymbolFile = serde_yaml::from_str(content)?;
        Ok(Self::new(file.types))
    }
}

impl TypeQuery for SymbolTable {
    fn lookup(&self, namespace: &str, name: &str, arity: usize) -> Option<&TypeDef> {
        self.index
            .get(&(namespace.to_string(), name.to_string(), arity))
            .map(|&slot| &self.types[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_user_declarations_replace_core_types() {
        let mut custom = TypeDef::new(TypeDefKind::Class, "System.Net.Http", "HttpClient");
        custom.is_partial = true;
        let table = SymbolTable::new(vec![custom]);

        let resolved = table
            .lookup("System.Net.Http", "HttpClient", 0)
            .expect("client type");
        assert!(resolved.is_partial);
        assert_eq!(table.declared_types().len(), 1);
    }

    #[test]
    fn test_lookup_distinguishes_arity() {
        let table = SymbolTable::default();
        let task = table.lookup("System.Threading.Tasks", "Task", 0).unwrap();
        let generic = table.lookup("System.Threading.Tasks", "Task", 1).unwrap();
        assert!(task.type_params.is_empty());
        assert_eq!(generic.type_params.len(), 1);
    }

    #[tokio::test]
    async fn test_load_json_file() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("symbols.json");
        fs::write(
            &path,
            r#"{"types":[{"name":"Api","namespace":"Sample","is_partial":true}]}"#,
        )
        .await?;

        let table = SymbolTable::from_file(&path).await?;
        assert_eq!(table.declared_types()[0].full_name(), "Sample.Api");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_reports_path_on_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "types: [").await.unwrap();

        let err = SymbolTable::from_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::Symbols(_)), "{err:?}");
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = SymbolTable::from_file(dir.path().join("absent.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err:?}");
    }
}
