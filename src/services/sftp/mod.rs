// SFTP 后端服务

mod connector;
mod editor;
mod error;
mod handle;
mod service;

pub use connector::SshSftpConnector;
pub use editor::{ensure_parent_dir, get_temp_edit_dir, open_in_external_editor, temp_file_path};
pub use error::SftpError;
pub use handle::{RemoteFileHandle, SftpConnector};
pub use service::SftpService;
