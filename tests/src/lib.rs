#[cfg(test)]
mod discovery;
#[cfg(test)]
mod utils;
