//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! `login`, `register`, `verify_email` and `setup_user` are the gate's step
//! pages. `home`, `bookshelf` and `settings` are protected and only ever
//! rendered inside `ProtectedRoute`. `password_reset` is open to everyone.

pub mod bookshelf;
pub mod home;
pub mod login;
pub mod password_reset;
pub mod register;
pub mod settings;
pub mod setup_user;
pub mod verify_email;
