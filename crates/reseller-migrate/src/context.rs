use core::fmt::Display;

/// Holds the context for the current run. Used for prefixing logs.
#[derive(Default, Debug)]
pub struct Context {
    /// The ticket the migration is for.
    pub ticket: Option<String>,
    /// The account being processed.
    pub account: Option<String>,
    /// The current context
    pub current_context: &'static str,
}

impl Context {
    /// A context for a ticket with no account selected.
    pub fn for_ticket(ticket: &str) -> Self {
        Self {
            ticket: Some(ticket.to_string()),
            ..Self::default()
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(ticket) = &self.ticket {
            write!(f, "[{ticket}] ")?;
        }

        if let Some(account) = &self.account {
            write!(f, "[{account}] ")?;
        }

        write!(f, "[{}] ", self.current_context)?;

        Ok(())
    }
}
