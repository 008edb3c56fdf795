//! Error types for world and graphics operations.

use ecosim_data::ComponentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// The entity was never spawned or has already been despawned.
    #[error("No such entity")]
    NoSuchEntity,

    #[error("Entity has no {0} component")]
    MissingComponent(&'static str),

    #[error("Invalid component: {0}")]
    Component(#[from] ComponentError),

    /// Failure reported by the graphics or windowing backend.
    #[error("Graphics error: {0}")]
    Graphics(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn graphics<S: Into<String>>(msg: S) -> Self {
        Self::Graphics(msg.into())
    }

    /// Maps a `hecs` lookup failure, naming the component that was requested.
    pub(crate) fn from_hecs<C>(err: hecs::ComponentError) -> Self {
        match err {
            hecs::ComponentError::NoSuchEntity => Self::NoSuchEntity,
            hecs::ComponentError::MissingComponent(_) => {
                Self::MissingComponent(short_type_name::<C>())
            }
        }
    }
}

impl From<hecs::NoSuchEntity> for SimError {
    fn from(_: hecs::NoSuchEntity) -> Self {
        Self::NoSuchEntity
    }
}

fn short_type_name<C>() -> &'static str {
    let full = std::any::type_name::<C>();
    full.rsplit("::").next().unwrap_or(full)
}
