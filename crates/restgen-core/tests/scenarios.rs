//! End-to-end generation scenarios over a fixture symbol table.

use restgen_core::{generate_sources, GeneratedSource, GenerationOptions, Result, SymbolTable};

async fn sources() -> Result<Vec<GeneratedSource>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/scenarios.yaml");
    let table = SymbolTable::from_file(path).await?;
    generate_sources(&table, &GenerationOptions::default())
}

fn unit<'a>(sources: &'a [GeneratedSource], hint: &str) -> &'a str {
    sources
        .iter()
        .find(|s| s.hint_name == hint)
        .map(|s| s.text.as_str())
        .unwrap_or_else(|| panic!("missing unit {hint}"))
}

/// Body of one generated method, from its signature to the next blank-line-separated member.
fn method<'a>(text: &'a str, name: &str) -> &'a str {
    let start = text
        .find(&format!(" {name}("))
        .unwrap_or_else(|| panic!("missing method {name}"));
    let rest = &text[start..];
    let end = rest.find("\n\n\t/// ").unwrap_or(rest.len());
    &rest[..end]
}

#[tokio::test]
async fn test_one_unit_per_client_plus_runtime() -> Result<()> {
    let sources = sources().await?;
    let mut names: Vec<&str> = sources.iter().map(|s| s.hint_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "Shop.CountApi.g.cs",
            "Shop.OwnedApi.g.cs",
            "Shop.ScenarioApi.g.cs",
            "UrlBuilder.g.cs"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_static_query_is_inlined_without_builder() -> Result<()> {
    let sources = sources().await?;
    let body = method(unit(&sources, "Shop.ScenarioApi.g.cs"), "GetUser");

    assert!(
        body.contains("await Client.GetAsync($\"User?id={id}\", CancellationToken.None);"),
        "{body}"
    );
    assert!(!body.contains("CreatePath"));
    assert!(!body.contains("ThrowIfNull"));
    Ok(())
}

#[tokio::test]
async fn test_nullable_query_map_of_lists() -> Result<()> {
    let sources = sources().await?;
    let body = method(unit(&sources, "Shop.ScenarioApi.g.cs"), "Filter");

    let guard = body.find("if (filters is not null)").expect("map guard");
    let entries = body.find("foreach (var _entry in filters)").expect("entry loop");
    let skip = body.find("if (_entry.Value is null) continue;").expect("presence check");
    let values = body.find("foreach (var _value in _entry.Value)").expect("inner loop");
    assert!(guard < entries && entries < skip && skip < values);
    assert!(body.contains(
        "_builder.AppendQuery(Uri.EscapeDataString(_entry.Key), _value.ToString());"
    ));
    // `filters` is optional, so it is never null-guarded
    assert!(!body.contains("ThrowIfNull(filters)"));
    Ok(())
}

#[tokio::test]
async fn test_query_serializer_replaces_default_formatting() -> Result<()> {
    let sources = sources().await?;
    let body = method(unit(&sources, "Shop.CountApi.g.cs"), "Count");

    assert!(body.contains("foreach (var _pair in SerializeInt(\"n\", n))"), "{body}");
    assert!(body.contains(
        "_builder.AppendQuery(Uri.EscapeDataString(_pair.Key), Uri.EscapeDataString(_pair.Value));"
    ));
    assert!(!body.contains("n.ToString()"));
    assert!(body.contains("await Client.GetAsync(CreatePath(), token);"));
    Ok(())
}

#[tokio::test]
async fn test_guard_precedes_request_construction() -> Result<()> {
    let sources = sources().await?;
    let body = method(unit(&sources, "Shop.ScenarioApi.g.cs"), "Save");

    let id = body.find("ArgumentNullException.ThrowIfNull(id);").expect("id guard");
    let item = body.find("ArgumentNullException.ThrowIfNull(item);").expect("item guard");
    let request = body.find("new HttpRequestMessage(HttpMethod.Put").expect("request");
    assert!(id < request && item < request);
    assert!(!body.contains("ThrowIfNull(note)"));

    assert!(body.contains("Uri.EscapeDataString(id)"));
    assert!(body.contains("request.Content = JsonContent.Create(item);"));
    assert!(body.contains("request.Headers.Add(\"X-Note\", note);"));
    assert!(body.contains("response.EnsureSuccessStatusCode();"));
    Ok(())
}

#[tokio::test]
async fn test_dispose_only_for_generator_owned_client() -> Result<()> {
    let sources = sources().await?;

    let owned_here = unit(&sources, "Shop.ScenarioApi.g.cs");
    assert_eq!(owned_here.matches("public void Dispose()").count(), 1);
    assert_eq!(owned_here.matches(".Dispose();").count(), 1);
    assert!(owned_here.contains("Client.Dispose();"));

    let user_owned = unit(&sources, "Shop.OwnedApi.g.cs");
    assert!(!user_owned.contains("public void Dispose()"));
    assert!(!user_owned.contains("public HttpClient Http"));
    assert!(user_owned.contains("await Http.SendAsync(request, CancellationToken.None);"));
    Ok(())
}

#[tokio::test]
async fn test_units_are_self_contained() -> Result<()> {
    let sources = sources().await?;
    let text = unit(&sources, "Shop.ScenarioApi.g.cs");

    assert!(text.starts_with("// <auto-generated/>\n"));
    assert!(text.contains("\nnamespace Shop;\n"));
    assert!(text.contains("#nullable enable"));
    assert!(text.contains("using Shop.Models;"));
    assert!(text.contains("using RestGen.Runtime;"));
    assert!(!text.contains("using Shop;"));
    assert!(text.contains("/// Sends a GET request to <see href=\"User\" />"));
    Ok(())
}
