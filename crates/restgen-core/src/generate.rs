//! Code generation entry points

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    builders::ClassModelBuilder,
    config::{Config, GenerationOptions},
    emit,
    error::{Error, Result},
    model::ClassModel,
    support,
    symbols::{SymbolTable, TypeQuery},
};

/// One generated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSource {
    /// File name, e.g. `Sample.UserApi.g.cs`
    pub hint_name: String,
    pub text: String,
}

/// Models of every annotated partial client among the declared types.
pub fn discover(table: &SymbolTable, options: &GenerationOptions) -> Vec<ClassModel> {
    let host: &dyn TypeQuery = table;
    let builder = ClassModelBuilder::new(host, options);
    table
        .declared_types()
        .iter()
        .filter(|def| builder.is_client(def))
        .map(|def| builder.build(def))
        .collect()
}

/// One unit per client plus, when any client needs it, the runtime support unit.
pub fn generate_sources(
    table: &SymbolTable,
    options: &GenerationOptions,
) -> Result<Vec<GeneratedSource>> {
    let classes = discover(table, options);
    let mut sources: Vec<GeneratedSource> = classes
        .iter()
        .map(|class| GeneratedSource {
            hint_name: format!("{}.g.cs", class.full_name()),
            text: emit::emit_class(class, options),
        })
        .collect();

    if options.emit_runtime && classes.iter().any(emit::uses_runtime) {
        sources.push(support::url_builder(options)?);
    }
    log::info!("generated {} unit(s) for {} client(s)", sources.len(), classes.len());
    Ok(sources)
}

/// Writes `sources` into `output_dir`, returning the written paths.
pub async fn write_sources(
    sources: &[GeneratedSource],
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    tokio::fs::create_dir_all(output_dir).await?;

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let path = output_dir.join(&source.hint_name);
        tokio::fs::write(&path, &source.text).await?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Main entry point for code generation
pub async fn generate(config: &Config) -> Result<Vec<PathBuf>> {
    if config.symbols_path.trim().is_empty() {
        return Err(Error::config("symbols_path is empty"));
    }

    // 1. Load the exported symbol table
    let table = SymbolTable::from_file(&config.symbols_path).await?;

    // 2. Build, plan and emit every client
    let sources = generate_sources(&table, &config.options)?;

    // 3. Write the units
    write_sources(&sources, &config.output_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SYMBOLS: &str = r#"
types:
  - name: PingApi
    namespace: Sample
    is_partial: true
    attributes:
      - name: RestClient
        namespace: RestGen.Attributes
    members:
      - member: method
        name: Ping
        return_type: System.Threading.Tasks.Task<string>
        is_partial_definition: true
        attributes:
          - name: Get
            namespace: RestGen.Attributes
            args: ["ping"]
        parameters:
          - name: page
            type: int?
  - name: NotAClient
    namespace: Sample
    is_partial: true
"#;

    #[test]
    fn test_only_annotated_partials_are_generated() -> Result<()> {
        let table = SymbolTable::from_str(SYMBOLS)?;
        let sources = generate_sources(&table, &GenerationOptions::default())?;

        let names: Vec<&str> = sources.iter().map(|s| s.hint_name.as_str()).collect();
        assert_eq!(names, ["Sample.PingApi.g.cs", "UrlBuilder.g.cs"]);
        assert!(sources[0].text.contains("partial class PingApi"));
        Ok(())
    }

    #[test]
    fn test_runtime_can_be_disabled() -> Result<()> {
        let table = SymbolTable::from_str(SYMBOLS)?;
        let options = GenerationOptions {
            emit_runtime: false,
            ..Default::default()
        };
        assert_eq!(generate_sources(&table, &options)?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_requires_symbols_path() {
        let config = Config::new(" ", "out");
        assert!(matches!(generate(&config).await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_generate_writes_units() -> Result<()> {
        let dir = TempDir::new()?;
        let symbols = dir.path().join("symbols.yaml");
        tokio::fs::write(&symbols, SYMBOLS).await?;
        let out = dir.path().join("Generated");

        let config = Config::new(symbols.to_string_lossy(), out.to_string_lossy());
        let written = generate(&config).await?;

        assert_eq!(written.len(), 2);
        let text = tokio::fs::read_to_string(out.join("Sample.PingApi.g.cs")).await?;
        assert!(text.contains("public async partial Task<string> Ping(int? page)"));
        Ok(())
    }
}
