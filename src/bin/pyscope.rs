//! Command-line interface for pyscope
//!
//! Usage:
//!   pyscope tokens `<path>` [--format `<format>`]   - Dump the extracted token stream
//!   pyscope tree `<path>` [--format `<format>`]     - Dump the decorated token tree
//!   pyscope hash `<path>` [--algorithm `<name>`]    - Print a content digest
//!   pyscope index `<root>` --store `<file>`         - Update the persisted file-hash index
//!   pyscope list-formats                          - List available output formats

use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pyscope::index::hash::{file_digest, HashAlgorithm};
use pyscope::index::ignore::IgnoreSet;
use pyscope::index::store::IndexStore;
use pyscope::index::walker::iterate_files;
use pyscope::processor::{process_file, ProcessingSpec};

fn main() {
    env_logger::init();

    let matches = Command::new("pyscope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A structural token-tree indexer for Python source")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Dump the extracted token stream of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('simple' or 'json')")
                        .default_value("simple"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Dump the decorated token tree of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('treeviz' or 'json')")
                        .default_value("treeviz"),
                ),
        )
        .subcommand(
            Command::new("hash")
                .about("Print a content digest of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("algorithm")
                        .long("algorithm")
                        .short('a')
                        .help("Digest algorithm ('sha256' or 'sha512')")
                        .default_value("sha256"),
                ),
        )
        .subcommand(
            Command::new("index")
                .about("Update the persisted file-hash index for a directory tree")
                .arg(
                    Arg::new("root")
                        .help("Root of the tree to index")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("store")
                        .long("store")
                        .short('s')
                        .help("Path of the index file")
                        .required(true),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .short('e')
                        .help("Directory or file name to exclude (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("ignore-file")
                        .long("ignore-file")
                        .help("Gitignore-style file with exclusion rules"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("tokens", sub)) => {
            let path = sub.get_one::<String>("path").expect("required arg");
            let format = sub.get_one::<String>("format").expect("defaulted arg");
            handle_process_command(path, &format!("tokens-{}", format));
        }
        Some(("tree", sub)) => {
            let path = sub.get_one::<String>("path").expect("required arg");
            let format = sub.get_one::<String>("format").expect("defaulted arg");
            handle_process_command(path, &format!("tree-{}", format));
        }
        Some(("hash", sub)) => {
            let path = sub.get_one::<String>("path").expect("required arg");
            let algorithm = sub.get_one::<String>("algorithm").expect("defaulted arg");
            handle_hash_command(path, algorithm);
        }
        Some(("index", sub)) => {
            let root = sub.get_one::<String>("root").expect("required arg");
            let store = sub.get_one::<String>("store").expect("required arg");
            let excluded: Vec<String> = sub
                .get_many::<String>("exclude")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            let ignore_file = sub.get_one::<String>("ignore-file");
            handle_index_command(root, store, &excluded, ignore_file.map(String::as_str));
        }
        Some(("list-formats", _)) => {
            for format in ProcessingSpec::available_formats() {
                println!("{}", format);
            }
        }
        _ => unreachable!(),
    }
}

fn handle_process_command(path: &str, format: &str) {
    let spec = match ProcessingSpec::from_string(format) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    match process_file(path, &spec) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn handle_hash_command(path: &str, algorithm: &str) {
    let result = HashAlgorithm::from_str(algorithm)
        .and_then(|algorithm| file_digest(Path::new(path), algorithm));
    match result {
        Ok(digest) => println!("{}", digest),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn handle_index_command(root: &str, store: &str, excluded: &[String], ignore_file: Option<&str>) {
    let root = PathBuf::from(root);
    let ignores = match ignore_file {
        Some(path) => match IgnoreSet::from_file(Path::new(path)) {
            Ok(set) => set,
            Err(e) => {
                eprintln!("Error: could not read {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => IgnoreSet::default(),
    };

    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.clone());
    let files = iterate_files(&root, |name, full| {
        if excluded.iter().any(|e| e == name) {
            return true;
        }
        if ignores.is_empty() {
            return false;
        }
        let relative = full
            .strip_prefix(&canonical_root)
            .unwrap_or(full)
            .to_string_lossy()
            .replace('\\', "/");
        ignores.is_ignored(&relative, full.is_dir())
    });
    log::info!("found {} files under {}", files.len(), root.display());

    match IndexStore::new(store).update_repository(&root, &files) {
        Ok(summary) => {
            println!(
                "{} added, {} updated, {} removed, {} unchanged",
                summary.added, summary.updated, summary.removed, summary.unchanged
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
