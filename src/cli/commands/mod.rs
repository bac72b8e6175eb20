//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod change_password;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod info;
pub mod init;
pub mod list;
pub mod search;
pub mod show;
