pub mod assemble;
pub mod profile;
pub mod word;

#[cfg(test)]
mod test;
