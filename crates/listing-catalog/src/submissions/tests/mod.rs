pub(crate) mod common;
mod lifecycle;
