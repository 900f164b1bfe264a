use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::imap::ImapConnector;
use crate::domain::SearchQuery;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{MailConnector, MailSession};

/// Log in to the mailbox, count waiting alerts and log out.
pub async fn execute_mailbox<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path.as_ref())?;
    let connector = ImapConnector::new(config.mailbox.clone())?;

    output::section("Mailbox Check");
    output::action("Connecting", connector.host());
    let mut session = connector.connect().await?;

    let result = count_pending(&mut session, &config.mailbox.sender).await;
    session.close().await;
    let pending = result?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.mailbox",
            "host": config.mailbox.host,
            "folder": config.mailbox.folder,
            "pending": pending,
            "status": "ok",
        }));
        return Ok(());
    }

    output::action_done("Connected", connector.host());
    output::field("Folder", &config.mailbox.folder);
    output::field("Unread", format!("{pending} from {}", config.mailbox.sender));
    if pending > 1 {
        output::hint("only the newest unread alert is delivered; older ones are marked read");
    }

    Ok(())
}

async fn count_pending<S: MailSession>(session: &mut S, sender: &str) -> Result<usize> {
    session.probe().await?;
    let ids = session.search(&SearchQuery::unseen_from(sender)).await?;
    Ok(ids.len())
}
