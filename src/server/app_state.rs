use crate::{configs::Config, resolver::Resolver};

/// Top-level application state.
pub struct AppState {
    pub resolver: Resolver,
    pub config: Config,
}
