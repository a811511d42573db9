use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::ids::BookId;
use crate::infrastructure::client::BookshelfClient;
use crate::infrastructure::client::books::NewBookPayload;

#[derive(Debug, Subcommand)]
pub enum BookCommands {
    /// Recommend a new book
    Add(AddBookCommand),
    /// List recommendations from everyone, newest first
    List(ListBooksCommand),
    /// List your own recommendations
    Mine,
    /// Delete one of your recommendations
    Delete(DeleteBookCommand),
}

pub async fn run(client: &BookshelfClient, cmd: BookCommands) -> Result<()> {
    match cmd {
        BookCommands::Add(c) => add_book(client, c).await,
        BookCommands::List(c) => list_books(client, c).await,
        BookCommands::Mine => print_json(&client.books().list_mine().await?),
        BookCommands::Delete(c) => delete_book(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct AddBookCommand {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub caption: String,
    /// Whole number from 1 to 5
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=5))]
    pub rating: i64,
    /// Image URL or `data:image/...;base64,` URI
    #[arg(long)]
    pub image: String,
}

pub async fn add_book(client: &BookshelfClient, command: AddBookCommand) -> Result<()> {
    let payload = NewBookPayload {
        title: command.title,
        caption: command.caption,
        rating: command.rating,
        image: command.image,
    };
    let book = client.books().create(&payload).await?;
    print_json(&book)
}

#[derive(Debug, Args)]
pub struct ListBooksCommand {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

pub async fn list_books(client: &BookshelfClient, command: ListBooksCommand) -> Result<()> {
    let page = client.books().list(command.page, command.limit).await?;
    print_json(&page)
}

#[derive(Debug, Args)]
pub struct DeleteBookCommand {
    #[arg(long)]
    pub id: i64,
}

pub async fn delete_book(client: &BookshelfClient, command: DeleteBookCommand) -> Result<()> {
    let message = client.books().delete(BookId::new(command.id)).await?;
    eprintln!("{message}");
    Ok(())
}
