use std::fmt::Debug;

use thiserror::Error;

/// Errors reported by graph store operations and algorithms.
///
/// Vertex ids are carried in their `Debug` rendering so the error type stays
/// independent of the graph's id parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex {id} not found")]
    NotFound { id: String },

    #[error("vertex {id} already exists")]
    DuplicateId { id: String },

    #[error("no path from {from} to {to}")]
    Unreachable { from: String, to: String },

    #[error("graph is disconnected: spanning tree has {accepted} of {required} edges")]
    DisconnectedGraph { accepted: usize, required: usize },

    #[error("spanning tree length overflows after {accepted} edges")]
    LengthOverflow { accepted: usize },
}

impl GraphError {
    pub fn not_found<I: Debug>(id: &I) -> Self {
        GraphError::NotFound {
            id: format!("{:?}", id),
        }
    }

    pub fn duplicate_id<I: Debug>(id: &I) -> Self {
        GraphError::DuplicateId {
            id: format!("{:?}", id),
        }
    }

    pub fn unreachable<I: Debug>(from: &I, to: &I) -> Self {
        GraphError::Unreachable {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
