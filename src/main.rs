use anyhow::Context;
use clap::{Parser, Subcommand};
use condition_dsl::condition::{
    AliasResolver, ConditionEvaluator, ConditionNode, OperatorKind, OperatorResolver,
};
use condition_dsl::config::{EvaluatorConfig, OrderingMode};
use condition_dsl::loader::DocumentLoader;
use dotenv::dotenv;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a condition tree against a data record
    Eval {
        /// Path to the condition document (JSON or YAML)
        #[arg(short, long)]
        condition: PathBuf,

        /// Path to the data record (JSON or YAML)
        #[arg(short, long)]
        data: PathBuf,

        /// Path to an evaluator config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ordering mode override: loose or strict
        #[arg(long)]
        ordering: Option<OrderingMode>,
    },
    /// Show which operator kind a token resolves to
    Resolve {
        /// The operator token
        token: String,

        /// Path to an evaluator config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the JSON schema of a condition document
    Schema,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EvaluatorConfig> {
    let config = match path {
        Some(path) => EvaluatorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EvaluatorConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Eval {
            condition,
            data,
            config,
            ordering,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(ordering) = ordering {
                config.ordering = ordering;
            }
            log::info!("Using {:?} ordering", config.ordering);

            let loader = DocumentLoader::new();
            let node = loader
                .load_condition(&condition)
                .with_context(|| format!("Failed to load condition {}", condition.display()))?;
            let record = loader
                .load_record(&data)
                .with_context(|| format!("Failed to load record {}", data.display()))?;

            let resolver = AliasResolver::from_config(&config.resolver)?;
            let evaluator = ConditionEvaluator::with_config(resolver, config);
            let verdict = evaluator.evaluate(&node, &record)?;
            println!("{}", verdict);
        }
        Commands::Resolve { token, config } => {
            let config = load_config(config.as_ref())?;
            let resolver = AliasResolver::from_config(&config.resolver)?;
            match resolver.resolve(&token)? {
                OperatorKind::Unrecognized(token) => {
                    println!("{} (unrecognized, evaluates to false)", token)
                }
                kind => println!("{}", kind),
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(ConditionNode);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}
