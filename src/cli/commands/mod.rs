pub mod duplicate;
pub mod inspect;
pub mod preview;
pub mod request;
pub mod settings;
pub mod validate;

pub use duplicate::handle_duplicate_command;
pub use inspect::handle_inspect_command;
pub use preview::handle_preview_command;
pub use settings::handle_settings_command;
pub use validate::handle_validate_command;
