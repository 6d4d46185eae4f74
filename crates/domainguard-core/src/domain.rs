//! Well-known security domains, actions, and the hops that connect them.

use crate::policy::Hop;

pub const AUTHENTICATION: &str = "domain2_authentication";
pub const TOKEN_POLICY: &str = "domain3_token_policy";
pub const TOKEN_ENFORCER: &str = "domain3_token_enforcer";
pub const REFERENCE_MONITOR: &str = "domain3_reference_monitor";

pub const ACTION_ISSUE_TOKEN: &str = "issue_token";
pub const ACTION_VALIDATE_TOKEN: &str = "validate_token";

/// Auth Gateway asking the token-policy domain to mint a token.
pub const LOGIN_ISSUE: Hop = Hop::new(AUTHENTICATION, TOKEN_POLICY, ACTION_ISSUE_TOKEN);

/// Token Enforcer delegating issuance to the Reference Monitor.
pub const ENFORCER_ISSUE: Hop = Hop::new(TOKEN_ENFORCER, REFERENCE_MONITOR, ACTION_ISSUE_TOKEN);

/// Token Enforcer delegating validation to the Reference Monitor.
pub const ENFORCER_VALIDATE: Hop =
    Hop::new(TOKEN_ENFORCER, REFERENCE_MONITOR, ACTION_VALIDATE_TOKEN);
