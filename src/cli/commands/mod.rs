pub mod bins;
pub mod config;
pub mod driver;
pub mod export;
pub mod init;
pub mod log;
pub mod login;
pub mod logout;
pub mod register;
pub mod seed;
pub mod whoami;
