//! Route, command and status constants
//!
//! Centralized registry for HTTP routes, admin commands and the status
//! codes printed in the prediction channel.

/// HTTP routes
pub mod routes {
    pub const INDEX: &str = "/";
    pub const HEALTH: &str = "/health";
    pub const STATUS: &str = "/status";

    pub const ALL: &[&str] = &[INDEX, HEALTH, STATUS];
}

/// Admin slash commands
pub mod commands {
    pub const START: &str = "/start";
    pub const HELP: &str = "/help";
    pub const STATUS: &str = "/status";
    pub const SET_OFFSET: &str = "/setoffset";
    pub const TRANSFER_ON: &str = "/transfert";
    pub const TRANSFER_OFF: &str = "/stoptransfert";
    pub const CHECK_CHANNELS: &str = "/checkchannels";
    pub const DEBUG: &str = "/debug";

    pub const ALL: &[&str] = &[
        START,
        HELP,
        STATUS,
        SET_OFFSET,
        TRANSFER_ON,
        TRANSFER_OFF,
        CHECK_CHANNELS,
        DEBUG,
    ];
}

/// Status codes shown in the prediction channel
pub mod status {
    pub const PENDING: &str = "⏳⏳";
    pub const WON_0: &str = "✅0️⃣";
    pub const WON_1: &str = "✅1️⃣";
    pub const WON_2: &str = "✅2️⃣";
    pub const LOST: &str = "❌";

    pub const WON_SUFFIX: &str = "GAGNÉ";
    pub const LOST_SUFFIX: &str = "PERDU";
}

/// Prediction offset bounds (N + a)
pub mod offset {
    pub const DEFAULT: u32 = 2;
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;
}

/// Dedup window before the seen-set is cleared
pub const DEDUP_CAPACITY: usize = 200;
/// Characters of the message text that enter the dedup key
pub const DEDUP_PREFIX_CHARS: usize = 50;

pub const SERVICE_NAME: &str = "baccarat-oracle";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registries_are_unique() {
        let routes: HashSet<_> = routes::ALL.iter().collect();
        assert_eq!(routes.len(), routes::ALL.len());
        let commands: HashSet<_> = commands::ALL.iter().collect();
        assert_eq!(commands.len(), commands::ALL.len());
        assert!(commands::ALL.iter().all(|c| c.starts_with('/') && c.to_ascii_lowercase() == *c));
    }
}
