pub mod claims;
pub mod jwt;
pub mod password;
pub mod session;

pub use claims::{AccountClaims, Role};
pub use session::{
    session_middleware, RequireAccount, RequireEmployee, Session, SessionService,
};
