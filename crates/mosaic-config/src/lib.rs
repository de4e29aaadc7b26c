#![allow(clippy::must_use_candidate)]

//! Configuration for Mosaic
//!
//! Default model ids per task kind, the `config/models.json` resolver, and
//! credential discovery for the hosted fal.ai and `OpenAI` services

mod env;
pub mod fal;
pub mod models;
pub mod openai;
mod resolver;

pub use fal::*;
pub use models::*;
pub use openai::*;
pub use resolver::{DEFAULT_MODELS_PATH, MODELS_PATH_ENV, ModelResolver};
