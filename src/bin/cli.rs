// Shelfmark - Personal Reading List Manager
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Desktop front end for the reading-list core
//!
//! Pure presentation: every subcommand translates into a single search or
//! store call. Business rules (uniqueness, ordering, confirmation gating,
//! persistence) live in the library.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use shelfmark::storage::{Book, FileSnapshotStore, ReadingList, RemoveOutcome, Status};
use shelfmark::{CatalogClient, SearchPage, ShelfError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelfmark-cli")]
#[command(about = "Shelfmark CLI - search the catalog and manage your reading list", long_about = None)]
struct Cli {
    /// Snapshot file to use instead of the platform default
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the book catalog
    Search {
        /// Free-text query
        query: String,
        /// 1-based result page
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Search and add one result to the backlog
    Add {
        /// Free-text query
        query: String,
        /// 1-based position of the result to add (as printed by search)
        #[arg(long)]
        pick: usize,
        /// 1-based result page the pick refers to
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show the reading list
    List {
        /// Only show one status group (backlog, in-progress, done)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Move a book to another status group
    Move {
        /// Book key as shown by list
        key: String,
        /// Target group (backlog, in-progress, done)
        status: String,
    },
    /// Reorder a book inside its status group
    Reorder {
        /// Group to reorder (backlog, in-progress, done)
        status: String,
        /// Current 0-based position within the group
        from: usize,
        /// Target 0-based position within the group
        to: usize,
    },
    /// Remove a book from the list
    Remove {
        /// Book key as shown by list
        key: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();

    let cli = Cli::parse();
    let snapshot = match cli.data_file {
        Some(path) => FileSnapshotStore::new(path),
        None => FileSnapshotStore::at_default_path(),
    };
    let mut list = ReadingList::open(snapshot);

    match cli.command {
        Commands::Search { query, page } => {
            let results = run_search(&query, page).await?;
            print_results(&results);
        }
        Commands::Add { query, pick, page } => {
            let results = run_search(&query, page).await?;
            if pick == 0 || pick > results.candidates.len() {
                bail!(
                    "pick must be between 1 and {} for this page",
                    results.candidates.len()
                );
            }
            let candidate = results.candidates[pick - 1].clone();
            match list.add_book(candidate) {
                Ok(book) => println!("Added '{}' to the backlog ({})", book.title, book.key),
                Err(err) => bail!("{}", err.user_message()),
            }
            warn_if_unsaved(&list);
        }
        Commands::List { status } => {
            let filter = match status.as_deref() {
                Some(raw) => Some(parse_status(raw)?),
                None => None,
            };
            print_list(&list, filter);
        }
        Commands::Move { key, status } => {
            let status = parse_status(&status)?;
            if list.move_book(&key, status) {
                println!("Moved {} to {}", key, status);
            } else {
                bail!("{}", ShelfError::not_found(&key).user_message());
            }
            warn_if_unsaved(&list);
        }
        Commands::Reorder { status, from, to } => {
            let status = parse_status(&status)?;
            match list.reorder_books(status, from, to) {
                Ok(()) => println!("Reordered {} group: {} -> {}", status, from, to),
                Err(err) => bail!("{}", err.user_message()),
            }
            warn_if_unsaved(&list);
        }
        Commands::Remove { key, yes } => {
            let outcome = list
                .remove_book(&key, |book| yes || prompt_for_removal(book))
                .map_err(|err| anyhow::anyhow!("{}", err.user_message()))?;
            match outcome {
                RemoveOutcome::Removed(book) => println!("Removed '{}'", book.title),
                RemoveOutcome::Declined => println!("Kept it."),
            }
            warn_if_unsaved(&list);
        }
    }

    Ok(())
}

async fn run_search(query: &str, page: u32) -> anyhow::Result<SearchPage> {
    let client = CatalogClient::new().context("failed to build catalog client")?;
    client
        .search(query, page)
        .await
        .map_err(|err| anyhow::anyhow!("{}", err.user_message()))
}

fn parse_status(raw: &str) -> anyhow::Result<Status> {
    Status::parse(raw)
        .with_context(|| format!("unknown status '{raw}' (expected backlog, in-progress or done)"))
}

/// Ask on stdin whether the book should really go
fn prompt_for_removal(book: &Book) -> bool {
    print!("Are you sure you want to remove '{}'? [y/N] ", book.title);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn print_results(results: &SearchPage) {
    if results.total == 0 {
        println!("No results.");
        return;
    }

    println!(
        "Showing {} - {} out of {} results (page {} of {})",
        results.first_index(),
        results.last_index(),
        results.total,
        results.page,
        results.total_pages()
    );

    for (i, candidate) in results.candidates.iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({}, {} pages)  [{}]",
            i + 1,
            candidate.title,
            if candidate.author_name.is_empty() {
                "unknown author".to_string()
            } else {
                candidate.author_name.join(", ")
            },
            candidate
                .first_publish_year
                .map_or("year?".to_string(), |y| y.to_string()),
            candidate
                .number_of_pages_median
                .map_or("-".to_string(), |p| p.to_string()),
            candidate.key,
        );
    }

    if results.has_next() {
        println!("More: --page {}", results.page + 1);
    }
}

fn print_list<S: shelfmark::SnapshotStore>(list: &ReadingList<S>, filter: Option<Status>) {
    if list.is_empty() {
        println!("Your reading list is empty.");
        return;
    }

    for status in Status::ALL {
        if filter.is_some_and(|f| f != status) {
            continue;
        }
        let group = list.status_group(status);
        println!("{} ({})", status, group.len());
        for (i, book) in group.iter().enumerate() {
            println!(
                "  {:>3}. {} - {}  [{}]",
                i,
                book.title,
                book.authors_joined(),
                book.key
            );
        }
    }
}

fn warn_if_unsaved<S: shelfmark::SnapshotStore>(list: &ReadingList<S>) {
    if let Some(err) = list.last_snapshot_error() {
        eprintln!("Warning: {}", err.user_message());
    }
}
