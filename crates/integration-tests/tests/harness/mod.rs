#![allow(dead_code)]

pub mod mock_fal;
pub mod mock_openai;
