use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    Context, Session,
    panel::{ControlPanel, PanelError},
};

/// What the migration ticket needs to know about an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFacts {
    /// The account's username.
    pub user: String,

    /// The domain of the account's first virtual host.
    pub domain: String,

    /// The PHP version serving that domain.
    pub php_version: String,

    /// The number of inodes the account uses.
    pub inode_usage: u64,
}

/// Query the PHP and quota details of the session's account.
pub fn collect_facts(
    context: &mut Context,
    panel: &dyn ControlPanel,
    session: &Session,
) -> Result<AccountFacts, FactsError> {
    context.current_context = "Collect Facts";

    let vhost = panel
        .php_versions(session)?
        .into_iter()
        .next()
        .ok_or(FactsError::NoVhost)?;
    let quota = panel.quota_info(session)?;

    let facts = AccountFacts {
        user: session.account().to_string(),
        domain: vhost.vhost,
        php_version: vhost.version,
        inode_usage: quota.inodes_used,
    };

    info!(
        "{context}{} runs {} using {} inodes",
        facts.domain, facts.php_version, facts.inode_usage
    );

    Ok(facts)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FactsError {
    #[error("Panel request failed: {0}")]
    Panel(#[from] PanelError),

    #[error("The account has no virtual hosts")]
    NoVhost,
}
