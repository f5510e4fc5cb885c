//! model - 组件模型
//!
//! 组件信息、架构结构图与校验和

mod info;
mod structure;

pub use info::{HasInfo, Info, KIND_COMPONENT};
pub use structure::{hash, Component, ModelError, Result, Structure};
