use format_commit_core::{run, style, CliArgs, Parser};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args).await {
        eprintln!(
            "{} {}",
            style("format-commit failed:").red().bold(),
            style(&e).red()
        );
        std::process::exit(1);
    }
}
