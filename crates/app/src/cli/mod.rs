use clap::{Parser, Subcommand};

mod db;
mod user;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
