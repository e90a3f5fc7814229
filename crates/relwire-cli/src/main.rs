//! relwire CLI: compile YAML pipelines into Substrait plans.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relwire_core::config::{OutputFormat, PlanConfig, PlanConfigOverrides};
use relwire_plan::{parse_yaml_pipeline, PlanNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "relwire")]
#[command(about = "Encode relational pipelines as Substrait plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a pipeline and write the plan
    Encode {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format: binary, hex or json (overrides config)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Producer recorded in the plan version (overrides config)
        #[arg(long)]
        producer: Option<String>,

        /// Extension URI for function declarations (overrides config)
        #[arg(long)]
        extension_uri: Option<String>,
    },

    /// Check that a pipeline parses and builds
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Print the operator tree and plan hash
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            pipeline,
            out,
            format,
            producer,
            extension_uri,
        } => {
            let overrides = PlanConfigOverrides {
                extension_uri,
                producer,
                output_format: format,
            };
            encode_pipeline(&pipeline, out.as_deref(), &overrides)
        }
        Commands::Validate { pipeline } => validate_pipeline(&pipeline).map(|plan| {
            println!(
                "✓ Pipeline is valid ({} operators)",
                plan.roots().iter().map(|r| r.rel.node_count()).sum::<usize>()
            );
        }),
        Commands::Explain { pipeline } => explain_pipeline(&pipeline),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Env, then the pipeline's `config:` block, then command-line flags.
fn load_plan(path: &Path, cli: &PlanConfigOverrides) -> Result<PlanNode> {
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("reading pipeline {}", path.display()))?;
    let mut parsed = parse_yaml_pipeline(&yaml)
        .with_context(|| format!("parsing pipeline {}", path.display()))?;

    apply_cli_overrides(&mut parsed.config, cli);
    let plan = parsed.into_plan(PlanConfig::from_env())?;
    tracing::debug!(config = ?plan.config(), "resolved config");
    Ok(plan)
}

fn apply_cli_overrides(doc: &mut PlanConfigOverrides, cli: &PlanConfigOverrides) {
    if let Some(uri) = &cli.extension_uri {
        doc.extension_uri = Some(uri.clone());
    }
    if let Some(producer) = &cli.producer {
        doc.producer = Some(producer.clone());
    }
    if let Some(fmt) = cli.output_format {
        doc.output_format = Some(fmt);
    }
}

fn encode_pipeline(path: &Path, out: Option<&Path>, cli: &PlanConfigOverrides) -> Result<()> {
    let plan = load_plan(path, cli)?;
    let bytes = render(&plan)?;
    match out {
        Some(p) => {
            fs::write(p, &bytes).with_context(|| format!("writing {}", p.display()))?;
            tracing::info!(path = %p.display(), bytes = bytes.len(), "wrote plan");
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    eprintln!("Plan hash: {}", plan.fingerprint());
    Ok(())
}

fn render(plan: &PlanNode) -> Result<Vec<u8>> {
    Ok(match plan.config().output_format {
        OutputFormat::Binary => plan.to_bytes(),
        OutputFormat::Hex => {
            let mut hex: String = plan.to_bytes().iter().map(|b| format!("{b:02x}")).collect();
            hex.push('\n');
            hex.into_bytes()
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_vec_pretty(&plan.encode())?;
            json.push(b'\n');
            json
        }
    })
}

fn validate_pipeline(path: &Path) -> Result<PlanNode> {
    load_plan(path, &PlanConfigOverrides::default())
}

fn explain_pipeline(path: &Path) -> Result<()> {
    let plan = load_plan(path, &PlanConfigOverrides::default())?;
    println!("Plan");
    println!("====");
    print!("{}", plan.explain());
    println!();
    println!("Producer: {}", plan.config().producer);
    println!("Encoded size: {} bytes", plan.to_bytes().len());
    println!("Plan hash: {}", plan.fingerprint());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_win_over_pipeline_block() {
        let mut doc = PlanConfigOverrides {
            producer: Some("pipeline".into()),
            output_format: Some(OutputFormat::Json),
            ..Default::default()
        };
        let cli = PlanConfigOverrides {
            producer: Some("cli".into()),
            ..Default::default()
        };
        apply_cli_overrides(&mut doc, &cli);
        assert_eq!(doc.producer.as_deref(), Some("cli"));
        assert_eq!(doc.output_format, Some(OutputFormat::Json));
        assert_eq!(doc.extension_uri, None);
    }

    #[test]
    fn hex_rendering_matches_wire_bytes() {
        let yaml = r#"
config: { output_format: hex }
steps:
  - op: scan
    table: "t"
    schema: [ { name: "a", type: "Int32" } ]
"#;
        let plan = parse_yaml_pipeline(yaml)
            .unwrap()
            .into_plan(PlanConfig::default())
            .unwrap();
        let rendered = String::from_utf8(render(&plan).unwrap()).unwrap();
        let expected: String = plan.to_bytes().iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(rendered.trim_end(), expected);
    }
}
