pub mod config;
pub mod doctor;
pub mod search;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}
