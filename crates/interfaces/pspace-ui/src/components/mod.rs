pub mod forms;
pub mod header;
pub mod sidebar;
