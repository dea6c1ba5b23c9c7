pub mod attachment_intake;
pub mod config_service;
pub mod paths;
pub mod secret_service;

pub use attachment_intake::{read_attachment, read_attachments};
pub use config_service::ConfigService;
pub use paths::InkwellPaths;
pub use secret_service::SecretServiceImpl;
