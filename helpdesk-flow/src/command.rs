/// Slash commands understood in every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Reset,
    Cancel,
    Help,
    /// Any other `/word`; carries the lower-cased name.
    Unknown(String),
}

impl Command {
    /// Parses a leading `/command`, ignoring a `@botname` suffix and any
    /// trailing arguments. Plain text returns `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default().to_lowercase();
        Some(match name.as_str() {
            "start" => Command::Start,
            "reset" => Command::Reset,
            "cancel" => Command::Cancel,
            "help" => Command::Help,
            _ => Command::Unknown(name),
        })
    }

    /// The bot name after `@` in a leading command, if any.
    pub fn addressee(text: &str) -> Option<&str> {
        let rest = text.trim_start().strip_prefix('/')?;
        let word = rest.split_whitespace().next()?;
        let (_, to) = word.split_once('@')?;
        Some(to)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Reset => "reset",
            Command::Cancel => "cancel",
            Command::Help => "help",
            Command::Unknown(name) => name,
        }
    }
}
