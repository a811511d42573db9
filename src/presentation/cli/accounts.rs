use anyhow::Result;
use clap::Args;

use super::print_json;
use crate::infrastructure::client::BookshelfClient;

#[derive(Debug, Args)]
pub struct RegisterCommand {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct LoginCommand {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

pub async fn register(client: &BookshelfClient, command: RegisterCommand) -> Result<()> {
    let session = client
        .auth()
        .register(&command.username, &command.email, &command.password)
        .await?;
    print_json(&session)
}

pub async fn login(client: &BookshelfClient, command: LoginCommand) -> Result<()> {
    let session = client
        .auth()
        .login(&command.email, &command.password)
        .await?;
    print_json(&session)
}
