// Authentication: JWT issue/verify, login, and the bearer-token middleware.
// Tokens are stateless — validity is signature + expiry only, no revocation.

pub mod handlers;
pub mod middleware;
pub mod tokens;
