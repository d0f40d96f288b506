mod add;
mod check;
mod get;
mod info;
mod init;
mod update;

pub use add::cmd_add;
pub use check::cmd_check;
pub use get::cmd_get;
pub use info::cmd_info;
pub use init::cmd_init;
pub use update::cmd_update;
