use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tmplpress::config::{self, Layout};
use tmplpress::output;
use tmplpress::prepare::{Confirm, ConsolePrompt};
use tmplpress::site::{self, BuildError};

#[derive(Parser)]
#[command(name = "tmplpress")]
#[command(about = "Splice articles into HTML templates")]
#[command(long_about = "\
Splice articles into HTML templates

Every file under articles/ is merged into a template from templates/ and
written to the same relative path under build/.

Site structure:

  site/
  ├── config.toml          # Optional (see 'tmplpress gen-config')
  ├── templates/           # Required
  │   ├── default.html     # Used when an article names no template
  │   └── post.html        # Contains <!-- insert body -->
  ├── articles/
  │   ├── a.html           # <!-- template: post.html --> anywhere in the text
  │   └── sub/b.html       # → build/sub/b.html
  ├── public/              # Optional, copied into build/ first
  └── build/               # Output, deleted and recreated every build

Exit codes: 1 templates/ missing, 2 deletion of build/ declined,
3 an article names a missing template, 4 any other failure.")]
#[command(version)]
struct Cli {
    /// Working root containing templates/, articles/ and friends
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the whole site into the build directory
    Build {
        /// Delete an existing build directory without asking
        #[arg(long, short)]
        yes: bool,
    },
    /// Report every missing or markerless template without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, BuildError> {
    match &cli.command {
        Command::Build { yes } => {
            let layout = load_layout(cli)?;
            let mut confirm: Box<dyn Confirm> = if *yes {
                Box::new(|_: &str| true)
            } else {
                Box::new(ConsolePrompt::stdio())
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let root = layout.root.clone();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event, &root);
                }
            });
            let result = site::build_site(&layout, &mut *confirm, Some(tx));
            // The sender is dropped with build_site's return, ending the printer.
            printer.join().unwrap();

            let summary = result?;
            output::print_build_summary(&summary, &layout.build, &layout.root);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let layout = load_layout(cli)?;
            let report = site::check_site(&layout)?;
            output::print_check_report(&report, &layout.root);
            if report.is_ok() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(3))
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_layout(cli: &Cli) -> Result<Layout, BuildError> {
    let site_config = config::load_config(&cli.root)?;
    Ok(Layout::new(&cli.root, &site_config))
}
