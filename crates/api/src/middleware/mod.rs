pub mod internal_auth;
