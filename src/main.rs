use clap::{Parser, Subcommand};
use rapidlink::facts::{FactsError, FileFacts};
use rapidlink::link::{self, LinkFormat};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "rapidlink",
    about = "Compute and convert Baidu rapid-upload links, fully offline",
    long_about = "Compute and convert Baidu rapid-upload links, fully offline.\n\n\
        A rapid-upload link encodes a file's name, byte length, full-content MD5\n\
        and first-256-KiB MD5. This tool never talks to any server: the file must\n\
        already be uploaded for a link to work, and an expired link cannot be\n\
        revived here.\n\n\
        Formats: baidupcs-go, pandownload, rapid-upload-link, rapid-upload-link-short\n\
        (the short form omits the slice MD5 and cannot be a conversion source).",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute links for a file, or for every file under a directory
    Create {
        /// File or directory to hash
        path: PathBuf,
        /// One or more target formats
        #[arg(required = true, num_args = 1..)]
        formats: Vec<String>,
    },
    /// Convert an existing link into one or more other formats
    Convert {
        /// Source link in any non-short format
        link: String,
        /// One or more target formats
        #[arg(required = true, num_args = 1..)]
        formats: Vec<String>,
    },
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {

        // ── Create ───────────────────────────────────────────────────────────
        Commands::Create { path, formats } => {
            let formats = link::resolve_formats(&formats)?;
            create_links(&path, &formats)?;
        }

        // ── Convert ──────────────────────────────────────────────────────────
        Commands::Convert { link: input, formats } => {
            let formats = link::resolve_formats(&formats)?;
            let facts = link::parse(&input)?;
            print_links(&facts, &formats);
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn create_links(path: &Path, formats: &[LinkFormat]) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(FactsError::NotFound(path.to_path_buf()).into());
    }

    if path.is_file() {
        let facts = FileFacts::from_path(path)?;
        println!("{}", facts.name);
        print_links(&facts, formats);
        return Ok(());
    }

    // One file failing must not abort its siblings.
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("  skipped: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match FileFacts::from_path(entry.path()) {
            Ok(facts) => {
                println!("{}", facts.name);
                print_links(&facts, formats);
                println!();
            }
            Err(err) => eprintln!("  skipped {}: {err}", entry.path().display()),
        }
    }

    Ok(())
}

fn print_links(facts: &FileFacts, formats: &[LinkFormat]) {
    for format in formats {
        println!("  {:<26} {}", format.label(), link::render(facts, *format));
    }
}
