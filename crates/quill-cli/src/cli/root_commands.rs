use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send one message to a research workspace
    Chat(ChatArgs),
    /// Print a workspace's full state
    Show {
        /// Workspace ID
        id: String,
    },
    /// List indexed workspaces, most recently updated first
    List,
    /// Run one refresh pass over every ongoing workspace
    Refresh,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Message text (omit with --generate-plan)
    #[arg(required_unless_present = "generate_plan")]
    pub message: Option<String>,

    /// Workspace ID (omit to start a new workspace)
    #[arg(short = 'w', long)]
    pub workspace: Option<String>,

    /// Finish clarification and build the research plan
    #[arg(long, conflicts_with = "message")]
    pub generate_plan: bool,
}
