pub mod http;

#[cfg(test)]
pub(crate) mod mock_http;
