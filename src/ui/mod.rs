//! Ratatui front-end: three tabbed tables with popup forms for adding rows,
//! a delete confirmation and a book search bar.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
