//! Auth Handlers

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod signup;
pub(crate) mod update_me;
pub(crate) mod update_password;
pub(crate) mod verify_email;
