pub mod poi_client;

#[cfg(test)]
pub mod stub;
