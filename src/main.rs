use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resume_builder::core::{DocxPackage, FsOps};
use resume_builder::utils::load_form_input;
use resume_builder::web::ServerConfig;
use resume_builder::{
    start_web_server, ConfigManager, FormSource, GeneratedResume, GenerationError,
    ResumeGenerator, ResumeSource, SampleSource,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "resume-builder")]
#[command(about = "Build DOCX resumes from structured form data")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding resume_template.docx
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// Directory generated documents are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a resume from a form input file (.toml, .yaml or .json)
    Generate {
        #[arg(short, long)]
        input: PathBuf,
        /// Also write the HTML preview next to the document
        #[arg(long)]
        preview: bool,
    },
    /// Generate a resume from built-in sample data
    Sample {
        #[arg(long)]
        preview: bool,
    },
    /// Only validate a form input file
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Write a starter resume_template.docx into the templates directory
    InitTemplate {
        #[arg(long)]
        force: bool,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "RESUME_BUILDER_PORT", default_value_t = 8000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resume_builder=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigManager::load()?
        .with_templates_path(cli.templates_dir)
        .with_output_path(cli.output_dir);

    match cli.command {
        Command::Generate { input, preview } => {
            let form = load_form_input(&input).await?;
            run_generation(&config, &FormSource::new(form), preview).await
        }
        Command::Sample { preview } => run_generation(&config, &SampleSource, preview).await,
        Command::Validate { input } => {
            let form = load_form_input(&input).await?;
            let errors = ResumeGenerator::new(config.template_file()).check(&FormSource::new(form));
            if errors.is_empty() {
                println!("✓ {} is complete", input.display());
                Ok(())
            } else {
                for message in &errors {
                    println!("✗ {}", message);
                }
                anyhow::bail!("{} field rule(s) failed", errors.len())
            }
        }
        Command::InitTemplate { force } => {
            let path = config.template_file();
            if path.exists() && !force {
                anyhow::bail!(
                    "Template already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            let bytes = DocxPackage::starter_template().to_bytes()?;
            FsOps::write_bytes_safe(&path, &bytes).await?;
            println!("✓ Wrote starter template to {}", path.display());
            Ok(())
        }
        Command::Serve { port } => {
            config.ensure_directories().await?;
            info!("Environment: {}", config.environment_name);
            start_web_server(ServerConfig::new(config.template_file()), port).await
        }
    }
}

async fn run_generation(
    config: &ConfigManager,
    source: &dyn ResumeSource,
    preview: bool,
) -> Result<()> {
    let generator = ResumeGenerator::new(config.template_file()).with_preview(preview);

    let generated = match generator.generate(source) {
        Ok(generated) => generated,
        Err(GenerationError::Validation(messages)) => {
            for message in &messages {
                println!("✗ {}", message);
            }
            anyhow::bail!("Resume data is incomplete");
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            return Err(e.into());
        }
    };

    write_outputs(config, generated).await
}

async fn write_outputs(config: &ConfigManager, mut generated: GeneratedResume) -> Result<()> {
    let output_dir = &config.environment.output_path;
    FsOps::ensure_dir_exists(output_dir).await?;

    if let Some(err) = &generated.preview_error {
        println!("⚠ {}", err);
    }
    if let Some(html) = &generated.preview_html {
        let preview_path = output_dir
            .join(generated.document.filename())
            .with_extension("html");
        FsOps::write_bytes_safe(&preview_path, html.as_bytes()).await?;
        println!("  Preview: {}", preview_path.display());
    }

    let document_path = output_dir.join(generated.document.filename());
    let mut bytes = Vec::with_capacity(generated.document.len());
    std::io::Read::read_to_end(generated.document.reader(), &mut bytes)
        .context("Failed to read rendered document")?;
    FsOps::write_bytes_safe(&document_path, &bytes).await?;

    println!(
        "✓ Generated {} at {}",
        document_path.display(),
        generated.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}
