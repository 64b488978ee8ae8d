pub mod check;
pub mod config;
pub mod generate;
pub mod init;
pub mod log;
pub mod template;
pub mod test_email;
