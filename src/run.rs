mod cli;
mod report;
mod util;

pub(crate) use cli::{as_cli, shellexpand};
