//! Local user profile supplied by the auth layer

use serde::{Deserialize, Serialize};

use crate::contact::TradeRole;

/// Label used by manufacturers when no profile name is configured
pub const MANUFACTURER_LABEL: &str = "ABC Electronics";

/// Label used by every other role when no profile name is configured
pub const DEFAULT_COMPANY_LABEL: &str = "Your Company";

/// The signed-in user
///
/// `display_name` is written as the sender of every outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub role: TradeRole,
}

impl UserProfile {
    /// Create a profile with an explicit name
    pub fn new(display_name: impl Into<String>, role: TradeRole) -> Self {
        Self {
            display_name: display_name.into(),
            role,
        }
    }

    /// Profile with the dashboard's placeholder company name for a role
    pub fn for_role(role: TradeRole) -> Self {
        let display_name = match role {
            TradeRole::Manufacturer => MANUFACTURER_LABEL,
            _ => DEFAULT_COMPANY_LABEL,
        };
        Self::new(display_name, role)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::for_role(TradeRole::Manufacturer)
    }
}
