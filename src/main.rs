#[cfg(feature = "cli")]
mod cli {
    use anyhow::{Context, Result};
    use clap::{ArgAction, Args, Parser, Subcommand};
    use std::{
        fs,
        io::{self, Read},
        path::{Path, PathBuf},
    };
    use tracing::warn;

    use docpick::{
        core::{
            DEFAULT_BRANCH, DocFilter, FeatureFlags, PickerSession, parse_github_tree,
            render_tree, resolve_flags, scan_checkout,
        },
        logging::init_logging,
    };

    /// Pick repository documents for ingestion.
    #[derive(Parser, Debug)]
    #[command(name = "docpick", version, about, long_about = None)]
    pub struct Cli {
        /// Feature flags file (JSON)
        #[arg(long, global = true)]
        flags: Option<PathBuf>,

        /// Override the maximum number of selected files
        #[arg(long, global = true, conflicts_with = "no_limit")]
        max_files: Option<usize>,

        /// Ignore any configured selection limit
        #[arg(long, global = true)]
        no_limit: bool,

        /// Verbosity level (-v, -vv, -vvv)
        #[arg(short, long, action = ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Args, Debug)]
    struct SourceArgs {
        /// GitHub `git/trees` response body; `-` reads stdin
        #[arg(long, conflicts_with = "dir", required_unless_present = "dir")]
        github_tree: Option<PathBuf>,

        /// Local checkout to scan instead
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Branch the file list belongs to
        #[arg(long, default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Comma-separated extensions to offer
        #[arg(long, default_value = "md, mdx")]
        ext: String,

        /// Drop paths matching this regex
        #[arg(long)]
        exclude: Option<String>,

        /// Offer every file, dotfiles included
        #[arg(long, conflicts_with = "ext")]
        all: bool,
    }

    #[derive(Args, Debug)]
    struct SelectArgs {
        /// File or directory to select; repeatable, applied in order
        #[arg(long = "select", value_name = "PATH")]
        select: Vec<String>,

        /// Hierarchy text naming the files to select
        #[arg(long, value_name = "FILE")]
        selection_text: Option<PathBuf>,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Show the file tree with selection markers
        Tree {
            #[command(flatten)]
            source: SourceArgs,
            #[command(flatten)]
            select: SelectArgs,
            /// Print the tree as JSON instead
            #[arg(long)]
            json: bool,
        },
        /// Print the ingestion job for the selection
        Job {
            #[command(flatten)]
            source: SourceArgs,
            #[command(flatten)]
            select: SelectArgs,
            #[arg(long)]
            owner: String,
            #[arg(long)]
            repo: String,
            /// Repository URL; defaults to the github.com URL
            #[arg(long)]
            url: Option<String>,
            #[arg(long)]
            email: Option<String>,
        },
    }

    fn read_input(path: &Path) -> Result<Vec<u8>> {
        if path.as_os_str() == "-" {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading GitHub tree from stdin")?;
            return Ok(buf);
        }
        fs::read(path).with_context(|| format!("reading {}", path.display()))
    }

    fn load_paths(source: &SourceArgs) -> Result<Vec<String>> {
        let mut filter = if source.all {
            DocFilter::all()
        } else {
            DocFilter::from_extensions(&source.ext)
        };
        if let Some(pattern) = &source.exclude {
            filter = filter.with_exclude(pattern)?;
        }

        if let Some(dir) = &source.dir {
            return scan_checkout(dir, &filter)
                .with_context(|| format!("scanning {}", dir.display()));
        }
        let Some(tree) = &source.github_tree else {
            anyhow::bail!("either --github-tree or --dir is required");
        };
        let body = read_input(tree)?;
        Ok(parse_github_tree(&body, &filter)?)
    }

    fn limit_notice(limit: Option<usize>) {
        match limit {
            Some(max) => eprintln!("File limit reached: you can only select up to {max} files."),
            None => eprintln!("File limit reached."),
        }
    }

    fn open_session(
        flags: &FeatureFlags,
        source: &SourceArgs,
        select: &SelectArgs,
    ) -> Result<PickerSession> {
        let mut session = PickerSession::from_flags(flags);
        let ticket = session.begin_load(source.branch.clone());
        let paths = load_paths(source)?;
        session.finish_load(ticket, paths);

        if let Some(file) = &select.selection_text {
            let text = fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            if session.apply_text_selection(&text) {
                limit_notice(session.limit());
            }
        }

        for path in &select.select {
            if session.display_state(path).is_none() {
                warn!(path = %path, "not in the file tree; skipped");
                continue;
            }
            if session.toggle(path, true) {
                limit_notice(session.limit());
            }
        }
        Ok(session)
    }

    fn print_tree(session: &PickerSession, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(session.tree())?);
            return Ok(());
        }

        print!("{}", render_tree(session.tree(), session.selection()));
        let n = session.selection().len();
        match session.limit() {
            Some(max) => println!("{n} / {max} files selected"),
            None => println!("{n} files selected"),
        }
        if let Some(max) = session.limit()
            && session.at_limit()
        {
            eprintln!(
                "Maximum file limit reached ({max} files). Deselect some files to add more."
            );
        }
        if let Some(at) = session.last_refresh() {
            eprintln!("Last refresh: {}", at.format("%Y-%m-%d %H:%M:%S"));
        }
        Ok(())
    }

    pub fn run(cli: Cli) -> Result<()> {
        init_logging(cli.verbose);

        let mut flags =
            resolve_flags(cli.flags.as_deref()).context("loading feature flags")?;
        if cli.no_limit {
            flags.max_files_limit = None;
        } else if cli.max_files.is_some() {
            flags.max_files_limit = cli.max_files;
        }

        match cli.command {
            Command::Tree {
                source,
                select,
                json,
            } => {
                let session = open_session(&flags, &source, &select)?;
                print_tree(&session, json)
            }
            Command::Job {
                source,
                select,
                owner,
                repo,
                url,
                email,
            } => {
                let session = open_session(&flags, &source, &select)?;
                let url = url.unwrap_or_else(|| format!("https://github.com/{owner}/{repo}"));
                let job = session
                    .ingestion_job(&owner, &repo, &url, email.as_deref(), &flags)
                    .context("building ingestion job")?;
                println!("{}", serde_json::to_string_pretty(&job)?);
                Ok(())
            }
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    use clap::Parser;
    cli::run(cli::Cli::parse())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!(
        "Built without the `cli` feature; nothing to run. \
Enable it with `--features cli`, or use the `docpick` library directly."
    );
}
