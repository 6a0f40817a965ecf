use clap::{Args, Subcommand};
use storefront_app::auth::Role;

mod set_role;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Grant the admin role
    Promote(set_role::SetRoleArgs),

    /// Return an admin to the customer role
    Demote(set_role::SetRoleArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Promote(args) => set_role::run(args, Role::Admin).await,
        UserSubcommand::Demote(args) => set_role::run(args, Role::Customer).await,
    }
}
