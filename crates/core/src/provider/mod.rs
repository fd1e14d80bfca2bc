pub mod openai;
mod openai_types;

#[cfg(test)]
pub(crate) mod test_provider;
