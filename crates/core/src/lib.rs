mod assets;
mod provider;

pub mod completion;
pub mod config;
pub mod credential;
pub mod relay;

#[cfg(test)]
mod test_utils;

pub use crate::assets::get_data_dir;
pub use crate::provider::openai::OpenAIBaseModel;
