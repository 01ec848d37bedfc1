use chrono::Local;
use clap::{Args, Parser, Subcommand};
use incremental::update::{self, BumpRequest};
use incremental::UpdateError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Computes the next version of a package and rewrites the files that
    /// declare it.
    ///
    /// With no flags, finalizes the current release candidate. Exactly one of
    /// the flags below may be given instead.
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// The package whose version to update
    package: String,

    /// Directory holding the package's sources. Discovered from the current
    /// directory when omitted.
    #[arg(long)]
    path: Option<PathBuf>,

    /// Use VERSION verbatim instead of computing a bump
    #[arg(long, value_name = "VERSION")]
    newversion: Option<String>,

    /// Increment the micro version, dropping any rc/post/dev qualifiers
    #[arg(long)]
    patch: bool,

    /// Start a release candidate, or advance the current one
    #[arg(long)]
    rc: bool,

    /// Number a correction published after a final release
    #[arg(long)]
    post: bool,

    /// Mark a development snapshot, or advance the current one
    #[arg(long)]
    dev: bool,

    /// Write the first version file for a package
    #[arg(long)]
    create: bool,
}

fn main() {
    let cli = Cli::parse();

    match do_work(cli) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

fn do_work(cli: Cli) -> Result<Vec<String>, UpdateError> {
    match cli.command {
        Commands::Update(args) => {
            let request = BumpRequest {
                package: args.package,
                path: args.path,
                newversion: args.newversion,
                patch: args.patch,
                rc: args.rc,
                post: args.post,
                dev: args.dev,
                create: args.create,
            };
            let base = std::env::current_dir().map_err(|source| UpdateError::Io {
                path: PathBuf::from("."),
                source,
            })?;

            let outcome = update::run(&request, &base, Local::now().date_naive())?;

            let mut lines = vec![format!("Updating codebase to {}", outcome.version.describe())];
            lines.extend(
                outcome
                    .written
                    .iter()
                    .map(|path| format!("Updating {}", path.display())),
            );
            Ok(lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_flags() {
        let cli = Cli::try_parse_from([
            "incremental",
            "update",
            "widget",
            "--rc",
            "--path",
            "/tmp/widget",
        ])
        .unwrap();

        let Commands::Update(args) = cli.command;
        assert_eq!(args.package, "widget");
        assert!(args.rc);
        assert!(!args.patch);
        assert_eq!(args.path, Some(PathBuf::from("/tmp/widget")));
        assert_eq!(args.newversion, None);
    }

    #[test]
    fn test_parse_newversion() {
        let cli = Cli::try_parse_from([
            "incremental",
            "update",
            "widget",
            "--newversion",
            "1.2.3rc1",
        ])
        .unwrap();

        let Commands::Update(args) = cli.command;
        assert_eq!(args.newversion, Some("1.2.3rc1".to_owned()));
    }

    #[test]
    fn test_update_requires_package() {
        let cli = Cli::try_parse_from(["incremental", "update"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_requires_subcommand() {
        let cli = Cli::try_parse_from(["incremental"]);
        assert!(cli.is_err());
    }
}
