use clap::{Parser, Subcommand};
use gallery_optimizer::config::{self, OptimizerConfig};
use gallery_optimizer::{output, process};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gallery-optimizer")]
#[command(about = "Resize, re-encode and SEO-rename a website's gallery images")]
#[command(long_about = "\
Resize, re-encode and SEO-rename a website's gallery images

Run from the site root or pass --root. The root defaults to the current
directory, not to the folder the binary lives in. Expected layout:

  .
  ├── index.html          # references rewritten: galeria/<old> and https://.../galeria/<old>
  ├── style.css           # references rewritten: galeria/<old>
  └── galeria/
      ├── a.jpg           # → art-show-galeria-campinas-01.webp
      ├── IMG_2041.png    # → art-show-galeria-campinas-02.webp
      └── 2934..._n.webp  # → curated name from the override table

Every image ends up at most 600px wide and, where possible, at most 200 KB.
Originals whose name changed are deleted after the references are rewritten.

Run 'gallery-optimizer plan' first to see the renames without touching anything.")]
#[command(version)]
struct Cli {
    /// Site root holding the markup, stylesheet and gallery folder.
    /// Defaults to the current directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log every encode attempt
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Optimize, rename, rewrite references and delete originals (the default)
    Run,
    /// Show the rename mapping without writing anything
    Plan {
        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add loading="lazy" to gallery images in the markup
    Lazy,
    /// Print the built-in settings as TOML
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = OptimizerConfig::default();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let report = process::run(&cli.root, &config, |event| {
                output::print_process_event(event, &config)
            })?;
            output::print_summary(&report.summary());
        }
        Command::Plan { json } => {
            let mapping = process::plan(&cli.root, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&mapping)?);
            } else {
                output::print_plan(&mapping);
            }
        }
        Command::Lazy => {
            let update = process::lazy_load(&cli.root, &config)?;
            output::print_lazy(&update);
        }
        Command::Config => {
            print!("{}", config::render_toml(&config)?);
        }
    }

    Ok(())
}

/// Console logging to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logger(verbose: bool) {
    let default = if verbose {
        "gallery_optimizer=debug"
    } else {
        "gallery_optimizer=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["gallery-optimizer"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn global_root_is_accepted_before_subcommand() {
        let args = ["gallery-optimizer", "--root", "site", "plan", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.root, PathBuf::from("site"));
        assert!(matches!(cli.command, Some(Command::Plan { json: true })));
    }

    #[test]
    fn global_root_is_accepted_after_subcommand() {
        let args = ["gallery-optimizer", "lazy", "--root", "/srv/site"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/site"));
        assert!(matches!(cli.command, Some(Command::Lazy)));
    }
}
