//! Command implementations. Each command runs under
//! [`ufo_core::application::LifecycleRunner`].

pub mod init;
