use crate::models::reading::ReadingRequest;
use crate::models::storage::Book;
use crate::services::catalog::BookService;
use crate::utils::ids::parse_book_id_args;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Book catalog with a batch reading simulator
#[derive(Parser, Debug)]
#[command(name = "catalog-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Runs the HTTP server when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve,

    /// List every book in the catalog
    List,

    /// Search books by title
    Search {
        /// Part of the title to look for
        title: String,
    },

    /// Simulate reading several books at once
    Simulate {
        /// Book IDs, separated by spaces and/or commas
        #[arg(required = true)]
        book_ids: Vec<String>,

        /// Time budget for the whole batch, in milliseconds
        #[arg(long)]
        budget_ms: Option<u64>,
    },
}

fn write_books(books: &[Book], out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{} books found", books.len())?;
    for book in books {
        writeln!(
            out,
            "ID: {}, Title: {}, Author: {}, Genre: {}",
            book.id, book.title, book.author, book.genre
        )?;
    }
    Ok(())
}

pub async fn list_books(service: &BookService, out: &mut impl Write) -> CliResult {
    let books = service.get_books().await?;
    write_books(&books, out)?;
    Ok(())
}

pub async fn search_books(service: &BookService, title: &str, out: &mut impl Write) -> CliResult {
    let books = service.search_books_by_name(title).await?;
    if books.is_empty() {
        writeln!(out, "No books found.")?;
        return Ok(());
    }
    write_books(&books, out)?;
    Ok(())
}

pub async fn simulate_reading(
    service: &BookService,
    book_ids: &[String],
    budget_ms: Option<u64>,
    out: &mut impl Write,
) -> CliResult {
    let budget = budget_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| service.default_budget());
    let request = ReadingRequest::new(parse_book_id_args(book_ids), budget);

    for outcome in service.simulate_multiple_readings(request).await? {
        writeln!(out, "{}", outcome)?;
    }
    Ok(())
}
