//! Command intents recognized in the `ongoing` phase.

/// A command recognized in an `ongoing`-phase message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Progress,
    ListSources,
    MoreSources,
}

impl Command {
    /// Matching order. The first command with a matching trigger wins.
    pub const ALL: [Self; 3] = [Self::Progress, Self::ListSources, Self::MoreSources];

    /// Substrings of the lower-cased message that select this command.
    #[must_use]
    pub const fn triggers(self) -> &'static [&'static str] {
        match self {
            Self::Progress => &["progress", "summary", "status", "where are we"],
            Self::ListSources => &[
                "show sources",
                "list sources",
                "show papers",
                "list papers",
                "my sources",
                "what papers",
            ],
            Self::MoreSources => &[
                "add more sources",
                "more sources",
                "more papers",
                "find more",
                "search more",
            ],
        }
    }
}

/// The command `message` asks for, if any.
#[must_use]
pub fn match_command(message: &str) -> Option<Command> {
    let lowered = message.to_lowercase();
    Command::ALL
        .into_iter()
        .find(|command| command.triggers().iter().any(|t| lowered.contains(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("What's my progress?", Some(Command::Progress))]
    #[case("Give me a summary", Some(Command::Progress))]
    #[case("Show sources", Some(Command::ListSources))]
    #[case("can you LIST PAPERS please", Some(Command::ListSources))]
    #[case("add more sources", Some(Command::MoreSources))]
    #[case("Find more on attention", Some(Command::MoreSources))]
    #[case("How do GNNs handle missing sensor data?", None)]
    #[case("Which sources discuss transformers?", None)]
    fn matches_triggers(#[case] message: &str, #[case] expected: Option<Command>) {
        assert_eq!(match_command(message), expected);
    }

    #[test]
    fn earlier_commands_short_circuit() {
        // Contains both a progress trigger and a more-sources trigger.
        assert_eq!(
            match_command("status, then find more"),
            Some(Command::Progress)
        );
    }
}
