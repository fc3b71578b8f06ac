use clap::Parser;
use llama_instruct::llama::Llama;
use llama_instruct::Args;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    // install global collector configured based on RUST_LOG env var (info
    // when unset), logs go to stderr so stdout only carries the transcript
    tracing_subscriber::fmt()
        .with_env_filter(llama_instruct::log_filter())
        .with_writer(std::io::stderr)
        .init();

    // Parse arguments
    let args = Args::parse();
    debug!(name: "args", args = serde_json::to_string(&args)?);

    let stdout = std::io::stdout();
    llama_instruct::run::<Llama, _>(&args, &mut stdout.lock())
}
