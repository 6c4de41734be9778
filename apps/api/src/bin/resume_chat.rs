use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_chat::chat::agent::{AgentConfig, ModelBackend, ResumeAgent, DEFAULT_SESSION_KEY};
use resume_chat::chat::ChatMode;
use resume_chat::config::Config;
use resume_chat::repl::run_repl;

#[derive(Parser)]
#[command(name = "resume-chat")]
#[command(about = "Chat with an assistant about your resume", long_about = None)]
struct Cli {
    /// enhance | interview
    #[arg(short, long, default_value = "enhance")]
    mode: ChatMode,

    /// Job summary text
    #[arg(short, long, env = "JOB_SUMMARY", conflicts_with = "job_file")]
    job: Option<String>,

    /// Read the job summary from a file
    #[arg(long)]
    job_file: Option<PathBuf>,

    /// Resume PDF (defaults to RESUME_PATH or ./sample_resume.pdf)
    #[arg(short, long)]
    resume: Option<PathBuf>,

    /// Generation model (defaults to LLM_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Embedding model (defaults to EMBED_MODEL)
    #[arg(long)]
    embed_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    // Logs go to stderr; stdout is the conversation.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_chat={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let job_summary = match (cli.job, cli.job_file) {
        (Some(job), _) => job,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read job summary from {}", path.display()))?,
        (None, None) => bail!("Provide a job summary with --job, --job-file or JOB_SUMMARY"),
    };

    if let Some(model) = cli.model {
        config.llm_model = model;
    }
    if let Some(embed_model) = cli.embed_model {
        config.embed_model = embed_model;
    }
    let resume_path = cli.resume.unwrap_or_else(|| config.resume_path.clone());

    let agent_config = AgentConfig::new(cli.mode, job_summary)
        .with_models(&config)
        .with_resume_path(resume_path);
    let backend = ModelBackend::ollama(&config.ollama_host, &agent_config);
    let agent = ResumeAgent::build(agent_config, backend)
        .await
        .context("Failed to prepare the resume assistant")?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_repl(&agent, DEFAULT_SESSION_KEY, stdin.lock(), &mut stdout).await?;
    Ok(())
}
