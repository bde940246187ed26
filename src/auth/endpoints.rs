/// Google OAuth endpoints and scope constants.
///
/// The client file normally carries `auth_uri` / `token_uri`; these are the
/// fallbacks when it does not.
pub const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Out-of-band redirect: Google shows the code and the operator pastes it back.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Full read/write access to the Photos library.
pub const PHOTOS_LIBRARY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary";
