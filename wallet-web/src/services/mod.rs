//! Browser integrations

pub mod ethereum;
