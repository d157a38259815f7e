use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use pathmap::config::{CliConfig, ResolverConfig};
use pathmap::path_parser::PathBinder;
use pathmap::resolver::ModelPartResolver;
use pathmap::sql_ast::FromClauseIndex;
use pathmap::Catalog;

/// Pathmap - resolve query paths against a model definition
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model definition (.yaml, .yml or .json)
    #[arg(long)]
    model: Option<String>,

    /// Query root as `Entity=alias`; repeatable
    #[arg(long = "root", value_parser = parse_assignment)]
    roots: Vec<(String, String)>,

    /// Explicit join as `alias.attribute=alias`; repeatable
    #[arg(long = "join", value_parser = parse_assignment)]
    joins: Vec<(String, String)>,

    /// Deepest path chain resolved before giving up
    #[arg(long)]
    max_path_depth: Option<usize>,

    /// Reject treat steps that do not narrow to an entity subtype
    #[arg(long)]
    validate_treat: bool,

    /// Log filter, e.g. `debug` or `pathmap::resolver=trace`
    #[arg(long)]
    log: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path expressions to resolve, e.g. `element(a.bids).amount`
    #[arg(required = true)]
    paths: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_assignment(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((lhs, rhs)) if !lhs.trim().is_empty() && !rhs.trim().is_empty() => {
            Ok((lhs.trim().to_string(), rhs.trim().to_string()))
        }
        _ => Err(format!("expected `name=alias`, got `{}`", value)),
    }
}

impl Cli {
    /// CLI values, falling back to the environment for anything not given
    fn config(&self, env: &ResolverConfig) -> CliConfig {
        CliConfig {
            max_path_depth: self.max_path_depth.unwrap_or(env.max_path_depth),
            validate_treat_targets: self.validate_treat || env.validate_treat_targets,
            log_filter: self.log.clone().unwrap_or_else(|| env.log_filter.clone()),
            model_path: self.model.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ResolverConfig::from_env().context("Invalid environment configuration")?;
    let cli_config = ResolverConfig::from_cli(cli.config(&config))
        .context("Invalid command line configuration")?;
    config.merge(cli_config);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let Some(model_path) = config.model_path.as_deref() else {
        bail!("No model definition given; pass --model or set PATHMAP_MODEL");
    };
    let catalog = Catalog::from_file(model_path)
        .with_context(|| format!("Failed to load model `{}`", model_path))?;

    let mut binder = PathBinder::new(catalog.path_sources());
    let mut from_clause = FromClauseIndex::new(catalog.metamodel());
    for (entity_name, alias) in &cli.roots {
        let root = binder.add_root(entity_name, alias)?;
        let group = from_clause.add_root(&root)?;
        log::debug!("Root table group {}", group);
    }
    for (expression, alias) in &cli.joins {
        let join = binder.add_join(expression, alias)?;
        let group = from_clause.add_join(&join)?;
        log::debug!("Join table group {}", group);
    }

    let resolver = ModelPartResolver::new(catalog.metamodel(), &from_clause).with_config(&config);

    let mut failures = 0;
    for expression in &cli.paths {
        let resolved = binder
            .bind_str(expression)
            .map_err(anyhow::Error::from)
            .and_then(|path| {
                let part = resolver.try_resolve_model_part(&path)?;
                Ok((path, part))
            });

        match (resolved, cli.format) {
            (Ok((path, part)), OutputFormat::Text) => {
                let part = part.map_or_else(|| "unresolved".to_string(), |part| part.to_string());
                println!("{}\t{}\t{}", expression, path.navigable_path(), part);
            }
            (Ok((path, part)), OutputFormat::Json) => {
                let value = serde_json::json!({
                    "expression": expression,
                    "navigable_path": path.navigable_path().full_path(),
                    "model_part": part.map(|part| part.to_string()),
                    "jdbc_type": part
                        .and_then(|part| part.jdbc_mapping())
                        .map(|jdbc| jdbc.name),
                });
                println!("{}", value);
            }
            (Err(e), _) => {
                failures += 1;
                eprintln!("{}: {:#}", expression, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} paths failed", failures, cli.paths.len());
    }
    Ok(())
}
