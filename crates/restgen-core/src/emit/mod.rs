//! C# source emission.
//!
//! [`emit_class`] turns one [`ClassModel`] into the text of its generated
//! partial class. Output is a pure function of the model and the options, so
//! repeated runs produce identical files.

pub mod body;
pub mod comments;
pub mod headers;
pub mod path;
pub mod writer;

// Internal imports (std, crate)
use std::collections::BTreeSet;

use crate::config::GenerationOptions;
use crate::model::{ClassModel, HttpLocation, LocationAttribute, MethodModel, TypedSite, WellKnown};
use crate::planner::{self, PathPlan};
use crate::utils::quote;

use body::{BodyContent, ResponseReader};
use path::{write_create_path, CREATE_PATH};
use writer::SourceWriter;

/// Namespaces every generated unit imports.
const FIXED_USINGS: &[&str] = &[
    "System",
    "System.Net.Http",
    "System.Net.Http.Json",
    "System.Net.Http.Headers",
    "System.Linq",
    "System.Threading",
    "System.Threading.Tasks",
    "System.Runtime.CompilerServices",
];

const NO_TOKEN: &str = "CancellationToken.None";

/// Whether any endpoint of `class` composes its URL at call time.
pub fn uses_runtime(class: &ClassModel) -> bool {
    class
        .methods
        .iter()
        .filter(|m| m.is_awaitable)
        .any(|m| planner::plan(m, class).needs_builder())
}

fn sites<'a>(method: &'a MethodModel, class: &'a ClassModel) -> Vec<&'a dyn TypedSite> {
    method
        .parameters
        .iter()
        .map(|p| p as &dyn TypedSite)
        .chain(class.properties.iter().map(|p| p as &dyn TypedSite))
        .collect()
}

/// First cancellation token among the sites, else the non-cancellable sentinel.
fn token(sites: &[&dyn TypedSite]) -> String {
    sites
        .iter()
        .find(|s| s.descriptor().is(WellKnown::CancellationToken))
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| NO_TOKEN.to_string())
}

/// Whether class headers are applied per request instead of at client creation.
fn class_headers_per_request(class: &ClassModel) -> bool {
    !class.needs_client || class.http_client_initializer.is_some()
}

/// Static headers for one request; method-level entries shadow class-level ones.
fn request_defaults<'a>(
    method: &'a MethodModel,
    class: &'a ClassModel,
) -> Vec<&'a LocationAttribute> {
    let mut defaults: Vec<&LocationAttribute> = method.default_headers().collect();
    if class_headers_per_request(class) {
        for header in class.default_headers() {
            let shadowed = defaults.iter().any(|d| {
                matches!((&d.name, &header.name), (Some(a), Some(b)) if a.eq_ignore_ascii_case(b))
            });
            if !shadowed {
                defaults.push(header);
            }
        }
    }
    defaults
}

fn write_usings(w: &mut SourceWriter, class: &ClassModel, options: &GenerationOptions) {
    let mut usings: BTreeSet<&str> = FIXED_USINGS.iter().copied().collect();
    for method in &class.methods {
        usings.extend(method.namespaces.iter().map(String::as_str));
    }
    if uses_runtime(class) {
        usings.insert(&options.runtime_namespace);
    }
    for using in usings {
        if !using.is_empty() && using != class.namespace {
            w.line(format!("using {using};"));
        }
    }
}

fn write_client(w: &mut SourceWriter, class: &ClassModel) {
    if !class.needs_client {
        return;
    }
    let name = &class.client_name;
    let base = (!class.base_address.is_empty()).then(|| quote(&class.base_address));
    let headers: Vec<String> = class
        .default_headers()
        .filter_map(|h| headers::static_header("client.DefaultRequestHeaders", h))
        .collect();

    if let Some(initializer) = &class.http_client_initializer {
        w.line(format!("public HttpClient {name} {{ get; }} = {initializer}();"));
        return;
    }
    if headers.is_empty() {
        match base {
            Some(base) => w.line(format!(
                "public HttpClient {name} {{ get; }} = new HttpClient {{ BaseAddress = new Uri({base}) }};"
            )),
            None => w.line(format!("public HttpClient {name} {{ get; }} = new HttpClient();")),
        }
        return;
    }

    w.line(format!("public HttpClient {name} {{ get; }} = Create{name}();"));
    w.blank();
    w.open(format!("private static HttpClient Create{name}()"));
    w.line("var client = new HttpClient();");
    if let Some(base) = base {
        w.line(format!("client.BaseAddress = new Uri({base});"));
    }
    w.blank();
    for header in headers {
        w.line(header);
    }
    w.blank();
    w.line("return client;");
    w.close();
}

fn signature(method: &MethodModel) -> String {
    let parameters = method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.descriptor.type_name, p.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let modifiers = if method.is_awaitable {
        "async partial"
    } else {
        "partial"
    };
    format!(
        "{} {modifiers} {} {}({parameters})",
        method.accessibility, method.return_type_name, method.name
    )
}

fn write_body(w: &mut SourceWriter, method: &MethodModel, class: &ClassModel, plan: &PathPlan) {
    let sites = sites(method, class);
    let token = token(&sites);
    let client = &class.client_name;

    let guarded: Vec<&str> = sites
        .iter()
        .filter(|s| s.descriptor().requires_null_guard())
        .map(|s| s.name())
        .collect();
    for name in &guarded {
        w.line(format!("ArgumentNullException.ThrowIfNull({name});"));
    }
    w.blank();

    let path = if plan.needs_builder() {
        format!("{CREATE_PATH}()")
    } else {
        plan.template.to_csharp()
    };
    let returns_void = method.returns(WellKnown::Void);
    let reader = (!returns_void).then(|| ResponseReader::select(class, &method.return_type));
    let response = match reader {
        Some(reader) if reader.keeps_response() => "var response",
        _ => "using var response",
    };

    let defaults = request_defaults(method, class);
    let has_headers = sites.iter().any(|s| s.located(HttpLocation::Header));
    let body = sites.iter().find(|s| s.located(HttpLocation::Body));
    let simplified = !has_headers
        && body.is_none()
        && defaults.is_empty()
        && class.request_modifiers.is_empty()
        && method.method.has_shortcut();

    if simplified {
        w.line(format!(
            "{response} = await {client}.{}Async({path}, {token});",
            method.method.as_str()
        ));
    } else {
        w.line(format!(
            "using var request = new HttpRequestMessage(HttpMethod.{}, {path});",
            method.method.as_str()
        ));
        w.blank();
        headers::write_request_headers(w, &sites, &defaults);

        if let Some(body) = body {
            let ty = body.descriptor();
            let content = BodyContent::select(class, ty).expression(body.name(), &token);
            w.blank();
            w.open_if(ty.is_optional(), format!("if ({} is not null)", body.name()));
            w.line(format!("request.Content = {content};"));
            w.close();
        }

        w.blank();
        for modifier in &class.request_modifiers {
            let call = if modifier.has_cancellation {
                format!("{}(request, {token});", modifier.name)
            } else {
                format!("{}(request);", modifier.name)
            };
            if modifier.is_async {
                w.line(format!("await {call}"));
            } else {
                w.line(call);
            }
        }

        w.blank();
        w.line(format!("{response} = await {client}.SendAsync(request, {token});"));
    }

    if !method.allow_any_status_code {
        w.blank();
        w.line("response.EnsureSuccessStatusCode();");
    }

    if let Some(reader) = reader {
        w.blank();
        w.line(format!(
            "return {};",
            reader.expression(&method.return_type, &token)
        ));
    }

    if plan.needs_builder() {
        w.blank();
        write_create_path(w, plan);
    }
}

fn write_method(
    w: &mut SourceWriter,
    method: &MethodModel,
    class: &ClassModel,
    options: &GenerationOptions,
) {
    if options.doc_comments {
        comments::write_method_comment(w, method, class);
    }
    w.open(signature(method));
    if method.is_awaitable {
        let plan = planner::plan(method, class);
        write_body(w, method, class, &plan);
    }
    w.close();
}

/// The generated partial class for `class`.
pub fn emit_class(class: &ClassModel, options: &GenerationOptions) -> String {
    let mut w = SourceWriter::new(options.indent.clone());
    w.line("// <auto-generated/>");
    write_usings(&mut w, class, options);

    if !class.namespace.is_empty() {
        w.blank();
        w.line(format!("namespace {};", class.namespace));
    }
    if !options.nullable_enabled {
        w.blank();
        w.line("#nullable enable");
    }

    w.blank();
    w.open(format!("partial class {}", class.name));
    write_client(&mut w, class);

    for method in &class.methods {
        w.blank();
        write_method(&mut w, method, class, options);
    }

    if class.is_disposable && class.needs_client {
        w.blank();
        w.line("/// <summary>");
        w.line(format!("/// Disposes the <see cref=\"{}\" />.", class.client_name));
        w.line("/// </summary>");
        w.open("public void Dispose()");
        w.line(format!("{}.Dispose();", class.client_name));
        w.close();
    }
    w.finish()
}
