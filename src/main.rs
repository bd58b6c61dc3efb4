use clap::{Parser, Subcommand};
use mingit::areas::repository::Repository;
use mingit::artifacts::objects::commit::Author;
use mingit::commands::plumbing::cat_file::CatFileMode;
use mingit::errors::Error;
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "MINGIT_LOG";

#[derive(Parser)]
#[command(
    name = "mingit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal content-addressed version control tool",
    long_about = "This is a minimal version control tool, written in Rust. \
    It stores content-addressed objects, stages files in an index and keeps \
    a linear commit history that can be checked out and logged.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "Path of the file to stage")]
        file: String,
    },
    #[command(name = "status", about = "Show staged and untracked files")]
    Status,
    #[command(
        name = "commit",
        about = "Create a new commit from the staged files",
        long_about = "This command creates a new commit on top of the current one. \
        Without a message, it is read from standard input."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Restore the files of a commit and move the current branch to it",
        long_about = "This command writes every file of the given commit into the working directory. \
        Files that are not part of the commit are left untouched."
    )]
    Checkout {
        #[arg(index = 1, help = "Full digest of the commit to check out")]
        commit: String,
    },
    #[command(name = "log", about = "Show the commit history")]
    Log,
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "cat-file", about = "Print the content, kind or size of an object")]
    CatFile {
        #[arg(short = 't', conflicts_with = "size", help = "Print the object kind")]
        kind: bool,
        #[arg(short = 's', help = "Print the object size")]
        size: bool,
        #[arg(index = 1, help = "The object digest")]
        sha: String,
    },
    #[command(name = "write-tree", about = "Write the working directory as a tree object")]
    WriteTree,
    #[command(name = "ls-tree", about = "List the entries of a tree object")]
    LsTree {
        #[arg(index = 1, help = "Digest of a tree or commit")]
        sha: String,
    },
    #[command(name = "commit-tree", about = "Create a commit object for a tree")]
    CommitTree {
        #[arg(index = 1, help = "Digest of the tree")]
        tree: String,
        #[arg(short, long, default_value = "", help = "The commit message")]
        message: String,
        #[arg(short, long, help = "Digest of the parent commit")]
        parent: Option<String>,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.map(Into::into).unwrap_or(pwd);
            let mut repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            repository.init()?
        }
        Commands::Add { file } => open(&pwd)?.add(&file)?,
        Commands::Status => open(&pwd)?.status()?,
        Commands::Commit { message } => {
            let mut repository = open(&pwd)?;
            let message = match message {
                Some(message) => message,
                None => prompt_message()?,
            };

            repository.commit(&message, Author::load_from_env())?
        }
        Commands::Checkout { commit } => open(&pwd)?.checkout(&commit)?,
        Commands::Log => open(&pwd)?.log()?,
        Commands::HashObject { write, file } => open(&pwd)?.hash_object(&file, write)?,
        Commands::CatFile { kind, size, sha } => {
            let mode = match (kind, size) {
                (true, _) => CatFileMode::Type,
                (_, true) => CatFileMode::Size,
                _ => CatFileMode::Pretty,
            };

            open(&pwd)?.cat_file(&sha, mode)?
        }
        Commands::WriteTree => open(&pwd)?.write_tree()?,
        Commands::LsTree { sha } => open(&pwd)?.ls_tree(&sha)?,
        Commands::CommitTree {
            tree,
            message,
            parent,
        } => open(&pwd)?.commit_tree(&tree, &message, parent.as_deref(), Author::load_from_env())?,
    }

    Ok(())
}

fn open(path: &Path) -> mingit::errors::Result<Repository> {
    Repository::open(path, Box::new(std::io::stdout()))
}

fn prompt_message() -> anyhow::Result<String> {
    eprint!("Commit message: ");
    std::io::stderr().flush()?;

    let mut message = String::new();
    std::io::stdin().lock().read_line(&mut message)?;

    let message = message.strip_suffix('\n').unwrap_or(&message);
    Ok(message.strip_suffix('\r').unwrap_or(message).to_string())
}

/// 1 for bad input or missing things, 2 for storage failures
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(|err| err.exit_code() as u8)
        .unwrap_or(2)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
