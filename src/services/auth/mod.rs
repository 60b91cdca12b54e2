pub mod authority;
pub mod claims;
pub mod converter;
pub mod credentials;
pub mod decoder;
pub mod directory;
pub mod error;
pub mod factory;
pub mod manager;
pub mod session;

pub use authority::{Authorities, GrantedAuthoritiesConverter, GrantedAuthority};
pub use claims::ClaimSet;
pub use converter::{JwtAuthentication, JwtAuthenticationConverter};
pub use credentials::{BearerToken, Credentials};
pub use decoder::{DecodeError, EchoEmailDecoder, JwtDecoder, TokenDecoder};
pub use directory::{StaticUserDirectory, UserDirectory, UserRecord};
pub use error::AuthError;
pub use factory::build_authentication_manager;
pub use manager::AuthenticationManager;
pub use session::AuthenticatedSession;
