pub mod annotation;
pub mod article;
pub mod dashboard;
pub mod filter;
pub mod refresh;

#[cfg(test)]
pub(crate) mod test_support;
