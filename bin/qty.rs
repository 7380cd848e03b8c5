use anyhow::{Context, Result};
use clap::Parser;
use qty_qparser::query::{QueryContext, QueryExecutor};
use qty_qparser::{
    BuilderKind, CatalogueSource, HostParser, ParserRegistry, ParserSettings, PluginConfig,
    QueryRequest,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "qty")]
#[command(about = "Detect quantities in a query and show the synthesized boost query", long_about = None)]
struct Args {
    /// Query text, e.g. `42 inch tv`
    #[arg(required = true)]
    query: Vec<String>,

    /// Plugin configuration file (name, kind, catalogue, parser settings)
    #[arg(long, env = "QTY_CONFIG", conflicts_with = "catalogue")]
    config: Option<PathBuf>,

    /// Catalogue file, used when no plugin configuration is given
    #[arg(long, env = "QTY_CATALOGUE", required_unless_present = "config")]
    catalogue: Option<PathBuf>,

    /// Builder kind (boost, filter)
    #[arg(long, env = "QTY_KIND", default_value = "boost")]
    kind: String,

    /// Name to register the parser under
    #[arg(long, default_value = "qty")]
    name: String,

    /// Default field for unqualified terms
    #[arg(long)]
    default_field: Option<String>,

    /// JSON documents to run the parsed query against
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Number of hits to print
    #[arg(long, default_value = "10")]
    top_k: usize,
}

/// One document of the `--docs` file: `{"id": 1, "fields": {"size": 42}}`
#[derive(Deserialize)]
struct DocFile {
    id: u64,
    #[serde(default)]
    fields: HashMap<String, f64>,
}

fn plugin_config(args: &Args) -> Result<PluginConfig> {
    if let Some(path) = &args.config {
        return PluginConfig::from_path(path)
            .with_context(|| format!("loading plugin configuration {}", path.display()));
    }

    let kind = match args.kind.to_lowercase().as_str() {
        "boost" => BuilderKind::Boost,
        "filter" => BuilderKind::Filter,
        _ => {
            warn!("Unknown builder kind '{}', using 'boost'", args.kind);
            BuilderKind::Boost
        }
    };

    let mut parser = ParserSettings::default();
    if let Some(field) = &args.default_field {
        parser = parser.with_default_field(field.clone());
    }

    let catalogue = args
        .catalogue
        .clone()
        .context("either --config or --catalogue is required")?;

    Ok(PluginConfig::new(args.name.clone(), CatalogueSource::Path(catalogue))
        .with_kind(kind)
        .with_parser(parser))
}

fn load_docs(path: &Path) -> Result<QueryContext> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading documents {}", path.display()))?;
    let docs: Vec<DocFile> = serde_json::from_str(&json)?;

    let mut builder = QueryContext::builder();
    for doc in docs {
        builder = builder.document(doc.id, doc.fields);
    }
    Ok(builder.build())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    info!("qty v{}", qty_qparser::VERSION);

    let config = plugin_config(&args)?;
    let registry = ParserRegistry::with_defaults();
    let detector = registry.register_detector(&config)?;

    let mut request = QueryRequest::new(args.query.join(" "));
    if let Some(field) = &args.default_field {
        request = request.with_param(qty_qparser::DEFAULT_FIELD_PARAM, field.clone());
    }

    for occurrence in detector.detect(request.query()) {
        println!(
            "detected: {} {} -> {}",
            occurrence.amount(),
            occurrence.unit().name(),
            occurrence.field_name()
        );
    }
    println!("expression: {}", detector.synthesize(request.query()));

    let query = registry.parse(detector.name(), &request)?;
    println!("parsed: {:?}", query);

    if let Some(path) = &args.docs {
        let ctx = load_docs(path)?;
        let result = QueryExecutor::execute(query.as_ref(), &ctx, args.top_k)?;
        println!(
            "{} hits in {}us",
            result.total_hits, result.stats.execution_time_us
        );
        for hit in result.hits {
            println!("  {}\t{:.3}", hit.doc_id, hit.score);
        }
    }

    Ok(())
}
