//! Prelude module for vlmrun-nodes.

pub use crate::error::{Error, Result};
pub use crate::item::{BinaryData, Item};
pub use crate::node::{ExecuteOptions, VlmRunNode};
pub use crate::operation::{Operation, Resource};
pub use crate::parameters::{NodeParameters, NodeRequest};
