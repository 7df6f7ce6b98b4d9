pub mod bearer;
pub mod certificate;
pub mod decision;
pub mod error;
pub mod factory;
pub mod jwks;
pub mod pem;
pub mod token_authorizer;

pub use decision::{Decision, Effect};
pub use error::VerificationError;
pub use factory::build_token_authorizer;
pub use token_authorizer::{TokenAuthorizer, VerificationSettings, VerifiedToken};
