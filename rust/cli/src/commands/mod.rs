//! Command handler modules for the bjtrain CLI.
//!
//! Each subcommand lives in its own module with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers: helper functions specific to that command
//! - Dependency injection: output streams (`&mut dyn Write`) passed as parameters
//! - Error propagation: all errors propagated via the `CliError` enum

pub mod deal;
pub mod doctor;
pub mod levels;
pub mod table;
pub mod train;

pub use deal::handle_deal_command;
pub use doctor::handle_doctor_command;
pub use levels::handle_levels_command;
pub use table::handle_table_command;
pub use train::handle_train_command;
