// 后端服务模块

pub mod fs;
pub mod sftp;
pub mod storage;
