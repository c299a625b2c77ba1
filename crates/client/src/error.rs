//! Client error model.

use goat_core::{DecodeError, ResourceId};
use thiserror::Error;

use crate::transport::TransportError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Every registry call either returns a complete result or exactly one of
/// these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A GET returned neither 200 nor, for pollable endpoints, 202.
    #[error("request failed ({status}): {body}")]
    RequestFailed { status: u16, body: String },

    /// A create POST returned something other than 201.
    #[error("create failed ({status}): {body}")]
    CreateFailed { status: u16, body: String },

    /// The poll bound ran out while the registry kept deferring.
    #[error("registry still pending after {attempts} attempts (last status {last_status})")]
    PollTimeout { attempts: u32, last_status: u16 },

    /// The caller cancelled an in-progress poll.
    #[error("poll cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    /// `create` was called on a resource the registry already assigned an id to.
    #[error("`{resource}` already created with id {id}")]
    AlreadyCreated {
        resource: &'static str,
        id: ResourceId,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
