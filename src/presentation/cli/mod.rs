pub mod accounts;
pub mod books;

use std::net::{IpAddr, SocketAddr};

use accounts::{LoginCommand, RegisterCommand};
use books::BookCommands;
use clap::{Args, Parser, Subcommand};

use crate::infrastructure::media::{CLOUDINARY_API_URL, CloudinaryConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "Share book recommendations", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Create an account and print the session token
    Register(RegisterCommand),

    /// Log in and print the session token
    Login(LoginCommand),

    /// Manage book recommendations
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://bookshelf.db?mode=rwc"
    )]
    pub database_url: String,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true, value_parser = non_empty_secret)]
    pub jwt_secret: String,

    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    pub cloudinary_cloud_name: String,

    #[arg(long, env = "CLOUDINARY_API_KEY")]
    pub cloudinary_api_key: String,

    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    pub cloudinary_api_secret: String,

    #[arg(long, env = "CLOUDINARY_API_URL", default_value = CLOUDINARY_API_URL)]
    pub cloudinary_api_url: String,
}

impl ServeCommand {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn cloudinary(&self) -> CloudinaryConfig {
        CloudinaryConfig {
            api_url: self.cloudinary_api_url.clone(),
            cloud_name: self.cloudinary_cloud_name.clone(),
            api_key: self.cloudinary_api_key.clone(),
            api_secret: self.cloudinary_api_secret.clone(),
        }
    }
}

/// Rejects empty or whitespace-only secrets.
fn non_empty_secret(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("secret must not be empty".to_string());
    }
    Ok(value.to_string())
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
