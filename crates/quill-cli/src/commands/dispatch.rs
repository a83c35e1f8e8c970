use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Chat(args) => commands::chat::handle(&args, ctx, flags).await,
        Commands::Show { id } => commands::show::handle(&id, ctx, flags).await,
        Commands::List => commands::list::handle(ctx, flags).await,
        Commands::Refresh => commands::refresh::handle(ctx, flags).await,
    }
}
