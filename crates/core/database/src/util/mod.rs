pub mod normalise;
pub mod reference;

#[cfg(test)]
pub mod test_fixtures;
