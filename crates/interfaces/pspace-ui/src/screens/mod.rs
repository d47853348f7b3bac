pub mod dialogs;
pub mod new_space;
pub mod settings;
pub mod space;
