pub mod hash;
pub mod init;
pub mod replay;
